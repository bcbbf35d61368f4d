use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use super::errors;
use super::AppState;
use crate::AccountId;

/// Header carrying the authenticated username, set by the identity provider
/// in front of this service.
pub const CALLER_HEADER: &str = "x-authenticated-user";

/// The authenticated caller, resolved to their account.
#[derive(Debug, Clone)]
pub struct Caller {
    pub username: String,
    pub account_id: AccountId,
}

pub async fn require_caller(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let username = req
        .headers()
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "missing caller identity",
            )
        })?
        .to_string();

    let account_id = state
        .engine()
        .resolve_caller(&username)
        .map_err(|e| errors::error_to_response(&e))?;

    req.extensions_mut().insert(Caller {
        username,
        account_id,
    });
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerEngine;
    use axum::{body::Body, extract::Extension, routing::get, Router};
    use tower::ServiceExt;

    fn whoami_router(engine: LedgerEngine) -> Router {
        let state = AppState { engine };
        Router::new()
            .route(
                "/whoami",
                get(|Extension(caller): Extension<Caller>| async move {
                    format!("{}:{}", caller.username, caller.account_id)
                }),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_caller,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_caller_carries_trimmed_username_and_account() {
        let engine = LedgerEngine::default();
        let id = engine.open_account("alice").unwrap().id();

        let request = axum::http::Request::builder()
            .uri("/whoami")
            .header(CALLER_HEADER, "  alice ")
            .body(Body::empty())
            .unwrap();
        let response = whoami_router(engine).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes, format!("alice:{id}").as_bytes());
    }

    #[tokio::test]
    async fn test_blank_header_is_unauthenticated() {
        let request = axum::http::Request::builder()
            .uri("/whoami")
            .header(CALLER_HEADER, "   ")
            .body(Body::empty())
            .unwrap();
        let response = whoami_router(LedgerEngine::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
