//! Bearer token authentication

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::features::FeatureState;

/// Reject requests without a valid `Authorization: Bearer <token>` header
///
/// On success the token's [`crate::auth::Claims`] are stored as a request
/// extension for downstream handlers.
pub async fn require_bearer(
    State(state): State<FeatureState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state.tokens.parse(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized(e.to_string())
    })?;

    tracing::debug!(user = %claims.username, "Authenticated request");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use crate::features::shared::test_helpers::memory_state;
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get};
    use axum::{Extension, Router};
    use tower::ServiceExt;

    async fn whoami(Extension(claims): Extension<Claims>) -> String {
        format!("{}:{}", claims.id, claims.username)
    }

    fn app() -> (Router, String) {
        let state = memory_state();
        let token = state.tokens.sign(7, "admin").unwrap();
        let router = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(state.clone(), require_bearer))
            .with_state(state);
        (router, token)
    }

    #[tokio::test]
    async fn test_claims_reach_handler() {
        let (router, token) = app();
        let request = axum::http::Request::builder()
            .uri("/whoami")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"7:admin");
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let (router, _) = app();
        let request = axum::http::Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
