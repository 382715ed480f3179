pub mod dogs;

use std::any::Any;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{errors::JsonApiError, metrics, openapi::ApiDoc, state::ServerState};

const PANIC_MESSAGE: &str = "Unexpected error while handling the request";

/// Marks a response produced from a handler panic; the request path is filled in on the way out.
#[derive(Clone, Copy)]
struct HandlerPanicked;

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    tracing::error!(panic = %detail, "handler panicked");
    let mut res = JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, PANIC_MESSAGE, "").into_response();
    res.extensions_mut().insert(HandlerPanicked);
    res
}

async fn attach_panic_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;
    if res.extensions().get::<HandlerPanicked>().is_some() {
        return JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, PANIC_MESSAGE, path).into_response();
    }
    res
}

/// Turn handler panics into the standard 500 error body instead of a dropped connection.
pub fn with_panic_recovery(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(attach_panic_path))
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_text() -> impl IntoResponse {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: roster endpoints plus health, metrics and the API document
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route("/api-docs/openapi.json", get(openapi_json));

    let roster = Router::new()
        .route("/api/dogs", get(dogs::list).post(dogs::create))
        .route("/api/dogs/dogs", get(dogs::list_all))
        .route("/api/dogs/:id", get(dogs::get).put(dogs::update).delete(dogs::delete))
        .with_state(state);

    with_panic_recovery(public.merge(roster))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and friends at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
