use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::history::HistoryPage,
    error::{AppError, ErrorBody},
    services::history_service,
    state::SharedState,
};

/// Day-by-day history browsing routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/history", get(current_day))
        .route("/history/older", post(older_day))
        .route("/history/newer", post(newer_day))
}

/// Reload the history and show today, or the most recent day with matches.
#[utoipa::path(
    get,
    path = "/history",
    tag = "history",
    responses(
        (status = 200, description = "Selected day", body = HistoryPage),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn current_day(State(state): State<SharedState>) -> Result<Json<HistoryPage>, AppError> {
    Ok(Json(history_service::current_page(&state).await?))
}

/// Step to the next older day.
#[utoipa::path(
    post,
    path = "/history/older",
    tag = "history",
    responses((status = 200, description = "Next older day, or the same one at the end", body = HistoryPage))
)]
pub async fn older_day(State(state): State<SharedState>) -> Result<Json<HistoryPage>, AppError> {
    Ok(Json(history_service::older(&state).await?))
}

/// Step to the next newer day.
#[utoipa::path(
    post,
    path = "/history/newer",
    tag = "history",
    responses((status = 200, description = "Next newer day, or the same one at the start", body = HistoryPage))
)]
pub async fn newer_day(State(state): State<SharedState>) -> Result<Json<HistoryPage>, AppError> {
    Ok(Json(history_service::newer(&state).await?))
}
