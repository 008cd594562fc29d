pub mod response;

use crate::config::CorsConfig;
use crate::error::AppError;
use crate::features::{self, FeatureState};
use crate::middleware::{self as mw, REQUEST_ID_HEADER};
use axum::{
    extract::State,
    http::{HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

/// Build the full application router
///
/// Layers, innermost first: cache and security headers, CORS, request id,
/// tracing, compression, panic recovery.
pub fn create_router(state: FeatureState, cors: &CorsConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .merge(features::router(state.clone()))
        .nest("/sd", health_routes().with_state(state))
        .fallback(fallback)
        .layer(middleware::from_fn(mw::headers::no_cache));

    mw::headers::security_headers()
        .into_iter()
        .fold(router, |router, layer| router.layer(layer))
        .layer(mw::cors_layer(cors))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(mw::tracing_layer())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(mw::handle_panic))
}

fn health_routes() -> Router<FeatureState> {
    Router::new()
        .route("/health", get(health))
        .route("/db", get(db_health))
}

/// Liveness probe
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: the user store must answer
async fn db_health(State(state): State<FeatureState>) -> Result<impl IntoResponse, AppError> {
    state.users.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Database health check failed");
        AppError::Internal(e.to_string())
    })?;

    Ok((StatusCode::OK, "OK"))
}

async fn fallback() -> AppError {
    AppError::NotFound("The incorrect API route.".to_string())
}
