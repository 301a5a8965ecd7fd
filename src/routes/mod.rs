//! Router assembly: book CRUD, health endpoints, middleware.

mod books;
mod common;

pub use books::book_routes;
pub use common::{common_routes, common_routes_with_ready};

use crate::state::AppState;
use axum::Router;
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Full application router with request tracing and a body size limit.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(book_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
}
