use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::{Error, ErrorKind};

pub fn error_to_response(err: &Error) -> Response {
    let kind = err.kind();
    let (status, message) = match kind {
        ErrorKind::InvalidAmount => (StatusCode::BAD_REQUEST, "invalid amount"),
        ErrorKind::InvalidUsername => (StatusCode::BAD_REQUEST, "invalid username"),
        ErrorKind::InsufficientFunds => (StatusCode::BAD_REQUEST, "insufficient funds"),
        ErrorKind::SelfTransfer => (StatusCode::BAD_REQUEST, "cannot transfer to yourself"),
        ErrorKind::BalanceLimitExceeded => (StatusCode::BAD_REQUEST, "balance limit exceeded"),
        ErrorKind::UsernameTaken => (StatusCode::BAD_REQUEST, "username already taken"),
        ErrorKind::RecipientNotFound => (StatusCode::NOT_FOUND, "recipient not found"),
        ErrorKind::AccountNotFound => (StatusCode::UNAUTHORIZED, "no account for caller"),
        ErrorKind::StorageUnavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "ledger temporarily unavailable",
        ),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
    };
    if status.is_server_error() {
        log::warn!("Request failed with {status}: {err}");
    }
    json_error(status, kind.as_str(), message)
}

pub fn rejection_to_response(rejection: JsonRejection) -> Response {
    log::debug!("Rejected request body: {rejection}");
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_request",
        rejection.body_text(),
    )
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}
