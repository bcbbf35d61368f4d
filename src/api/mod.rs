//! HTTP boundary.
//!
//! Maps already-authenticated requests onto [`LedgerEngine`] calls and
//! engine results onto JSON responses. No balance logic lives here.

mod dto;
mod errors;
mod handlers;
mod identity;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::LedgerEngine;

pub use dto::{AmountRequest, BalanceResponse, RegisterRequest, TransferRequest};
pub use identity::{Caller, CALLER_HEADER};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    engine: LedgerEngine,
}

impl AppState {
    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }
}

/// Build the full router over an engine.
///
/// `/register` is open; every other route requires the caller identity
/// header set by the upstream identity provider.
pub fn router(engine: LedgerEngine) -> Router {
    let state = AppState { engine };

    let authenticated = Router::new()
        .route("/account", get(handlers::account_detail))
        .route("/deposit", post(handlers::deposit))
        .route("/withdraw", post(handlers::withdraw))
        .route("/transfer", post(handlers::transfer))
        .route("/transactions", get(handlers::transaction_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity::require_caller,
        ));

    Router::new()
        .route("/register", post(handlers::register))
        .merge(authenticated)
        .with_state(state)
}
