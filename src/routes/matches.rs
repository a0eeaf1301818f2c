use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::matches::{ClearMatchesResponse, CreateMatchRequest, MatchResponse},
    error::{AppError, ErrorBody, JsonBody},
    services::match_service,
    state::SharedState,
};

/// Stored match routes.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/matches",
        get(list_matches).post(create_match).delete(clear_matches),
    )
}

/// List every stored match, newest first, with the players involved.
#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    responses(
        (status = 200, description = "Stored matches", body = [MatchResponse]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchResponse>>, AppError> {
    Ok(Json(match_service::list_matches(&state).await?))
}

/// Record a finished match directly.
#[utoipa::path(
    post,
    path = "/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match recorded", body = MatchResponse),
        (status = 400, description = "Inconsistent match result", body = ErrorBody)
    )
)]
pub async fn create_match(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), AppError> {
    let created = match_service::create_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete the whole match history.
#[utoipa::path(
    delete,
    path = "/matches",
    tag = "matches",
    responses(
        (status = 200, description = "History cleared", body = ClearMatchesResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn clear_matches(
    State(state): State<SharedState>,
) -> Result<Json<ClearMatchesResponse>, AppError> {
    Ok(Json(match_service::clear_matches(&state).await?))
}
