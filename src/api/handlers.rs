use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{AmountRequest, BalanceResponse, RegisterRequest, TransferRequest};
use super::errors;
use super::identity::Caller;
use super::AppState;
use crate::{Deposit, Error, Transfer, Withdrawal};

type ApiResult = Result<Response, Response>;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(errors::rejection_to_response)?;
    let engine = state.engine().clone();
    let account = run_blocking(move || engine.open_account(&body.username)).await?;
    Ok((StatusCode::CREATED, Json(account)).into_response())
}

pub async fn account_detail(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult {
    let engine = state.engine().clone();
    let account = run_blocking(move || engine.account(caller.account_id)).await?;
    Ok(Json(account).into_response())
}

pub async fn deposit(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(errors::rejection_to_response)?;
    log::trace!("Deposit of {} requested by {}", body.amount, caller.username);
    let deposit = Deposit::new(caller.account_id, body.amount).map_err(reject)?;

    let engine = state.engine().clone();
    let new_balance = run_blocking(move || engine.deposit(deposit)).await?;
    Ok(Json(BalanceResponse::new("Deposit successful", new_balance)).into_response())
}

pub async fn withdraw(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(errors::rejection_to_response)?;
    log::trace!("Withdrawal of {} requested by {}", body.amount, caller.username);
    let withdrawal = Withdrawal::new(caller.account_id, body.amount).map_err(reject)?;

    let engine = state.engine().clone();
    let new_balance = run_blocking(move || engine.withdraw(withdrawal)).await?;
    Ok(Json(BalanceResponse::new("Withdrawal successful", new_balance)).into_response())
}

pub async fn transfer(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(errors::rejection_to_response)?;
    log::trace!(
        "Transfer of {} to {} requested by {}",
        body.amount,
        body.recipient_username,
        caller.username
    );
    let transfer =
        Transfer::new(caller.account_id, &body.recipient_username, body.amount).map_err(reject)?;

    let engine = state.engine().clone();
    let new_balance = run_blocking(move || engine.transfer(transfer)).await?;
    Ok(Json(BalanceResponse::new("Transfer successful", new_balance)).into_response())
}

pub async fn transaction_history(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult {
    let engine = state.engine().clone();
    let transactions = run_blocking(move || engine.history(caller.account_id)).await?;
    Ok(Json(transactions).into_response())
}

fn reject(err: impl Into<Error>) -> Response {
    errors::error_to_response(&err.into())
}

/// Engine calls can wait on row locks, so they run off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(|e| errors::error_to_response(&e)),
        Err(e) => {
            log::warn!("Ledger task did not complete: {e}");
            Err(errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal error",
            ))
        }
    }
}
