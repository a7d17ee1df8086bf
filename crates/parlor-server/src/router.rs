//! Router assembly.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Builds the full application router with middleware.
///
/// Shared by the binary and the integration tests so both exercise the
/// same stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::lobby::router())
        .merge(routes::game::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
