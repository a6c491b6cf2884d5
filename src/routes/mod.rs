//! Router assembly.

pub mod common;
pub mod entity;


pub use common::common_routes;
pub use entity::entity_routes;

use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: common probes plus `/users` and `/products`.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.health.clone()))
        .merge(entity_routes("/users", state.users()))
        .merge(entity_routes("/products", state.products()))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// A panicking handler fails its own request with 500; the process keeps serving.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}
