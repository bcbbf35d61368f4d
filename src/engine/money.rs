use super::Decimal;
use serde::Serializer;

/// Fractional digits kept for every balance and amount.
pub(crate) const MONEY_SCALE: u32 = 2;

/// Largest value a 12-digit, 2-decimal column can hold: `9999999999.99`.
pub const MAX_BALANCE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, MONEY_SCALE);

/// Serialize Decimal with exactly 2 decimal places
pub(crate) fn serialize_money<S: Serializer>(
    value: &Decimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

/// Rescale to the ledger's fixed two fractional digits.
/// Callers only pass values that already have at most two.
pub(crate) fn to_money(value: Decimal) -> Decimal {
    let mut value = value;
    value.rescale(MONEY_SCALE);
    value
}

/// Whether `value` can be stored in a balance column.
pub(crate) fn fits_column(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= MAX_BALANCE && value.normalize().scale() <= MONEY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_balance_is_twelve_digits() {
        assert_eq!(MAX_BALANCE, dec!(9999999999.99));
    }

    #[test]
    fn test_to_money_pads_to_two_places() {
        assert_eq!(to_money(dec!(5)).to_string(), "5.00");
        assert_eq!(to_money(dec!(1.5)).to_string(), "1.50");
    }

    #[test]
    fn test_fits_column() {
        assert!(fits_column(Decimal::ZERO));
        assert!(fits_column(MAX_BALANCE));
        assert!(fits_column(dec!(10.100)));
        assert!(!fits_column(dec!(-0.01)));
        assert!(!fits_column(MAX_BALANCE + dec!(0.01)));
        assert!(!fits_column(dec!(0.001)));
    }
}
