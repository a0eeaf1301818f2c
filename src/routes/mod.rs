//! HTTP routes grouped by area.

use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check endpoint.
pub mod health;
/// Day-by-day match history.
pub mod history;
/// Stored match results.
pub mod matches;
/// Player directory.
pub mod players;
/// Live match scoring.
pub mod session;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(players::router())
        .merge(matches::router())
        .merge(session::router())
        .merge(history::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
