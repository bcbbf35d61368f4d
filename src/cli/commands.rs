pub(crate) use clap::Parser;
use std::time::Duration;

use bank_ledger::StoreConfig;

#[derive(Parser, Debug)]
#[command(
    name = "bank-ledger",
    author,
    version,
    about = "A personal banking ledger served over HTTP",
    long_about = None,
    after_help = "AUTHENTICATION:\n    Requests other than POST /register must carry the caller's username in the\n    X-Authenticated-User header, as set by the identity provider in front of\n    this service.\n\n    bank-ledger --bind 0.0.0.0:8000 --user alice --user bob"
)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "BANK_LEDGER_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// How long an operation waits for an account lock before failing
    #[arg(
        long,
        env = "BANK_LEDGER_LOCK_TIMEOUT_MS",
        value_name = "MILLIS",
        default_value_t = 5000
    )]
    pub lock_timeout_ms: u64,

    /// Users whose accounts are opened at startup
    #[arg(
        long = "user",
        env = "BANK_LEDGER_USERS",
        value_name = "USERNAME",
        value_delimiter = ','
    )]
    pub users: Vec<String>,
}

impl Args {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["bank-ledger"]).unwrap();
        assert_eq!(args.bind, "127.0.0.1:8000");
        assert_eq!(args.store_config().lock_timeout, Duration::from_secs(5));
        assert!(args.users.is_empty());
    }

    #[test]
    fn test_repeated_and_delimited_users() {
        let args =
            Args::try_parse_from(["bank-ledger", "--user", "alice", "--user", "bob,carol"]).unwrap();
        assert_eq!(args.users, vec!["alice", "bob", "carol"]);
    }
}
