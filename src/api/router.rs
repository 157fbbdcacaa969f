//! HTTP router for the triage API.
//!
//! `GET /` sits at the root; everything else is nested under the configured
//! prefix (default `/api/v1`). Unknown paths get the JSON 404 body.
//!
//! Layers (outermost → innermost):
//! 1. Access log → 2. `Cache-Control: no-store` (prefixed routes only) → Handler

use axum::http::{header, HeaderValue, Method, Uri};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints::{patients, predict, root};
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::models::{DiabetesInput, HeartDiseaseInput, KidneyDiseaseInput, LiverDiseaseInput};

/// Build the full application router from a prepared context.
pub fn api_router(ctx: ApiContext) -> Router {
    let prefix = ctx.api_prefix.to_string();

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    // Both `/patients` and `/patients/` are registered explicitly.
    let versioned = Router::new()
        .route("/patients", get(patients::list).post(patients::create))
        .route("/patients/", get(patients::list).post(patients::create))
        .route("/patients/:patient_id", get(patients::detail))
        .route(
            "/ml/predict/heart-disease",
            post(predict::assess::<HeartDiseaseInput>),
        )
        .route(
            "/ml/predict/liver-disease",
            post(predict::assess::<LiverDiseaseInput>),
        )
        .route(
            "/ml/predict/kidney-disease",
            post(predict::assess::<KidneyDiseaseInput>),
        )
        .route("/ml/predict/diabetes", post(predict::assess::<DiabetesInput>))
        .route("/ml/models", get(predict::models))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(root::welcome))
        .nest(&prefix, versioned)
        .fallback(not_found)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_request))
}

/// Allow browser callers from `origins`. An empty list leaves the router
/// unchanged; unparsable origins are skipped with a warning.
pub fn with_cors(router: Router, origins: &[String]) -> Router {
    if origins.is_empty() {
        return router;
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    router.layer(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
