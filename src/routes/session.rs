use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::{
        matches::MatchResponse,
        session::{ScorePointRequest, SelectPlayerRequest, SessionResponse},
    },
    error::{AppError, ErrorBody, JsonBody},
    services::session_service,
    state::SharedState,
};

/// Routes driving the single live match.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/players", put(select_player))
        .route("/session/start", post(start_match))
        .route("/session/point", post(score_point))
        .route("/session/finalize", post(finalize_match))
        .route("/session/abandon", post(abandon_match))
}

/// Current state of the live match.
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses((status = 200, description = "Live match", body = SessionResponse))
)]
pub async fn get_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    Json(session_service::snapshot(&state).await)
}

/// Put a player in a slot, or empty it. A player already sitting in the other
/// slot is moved out of it.
#[utoipa::path(
    put,
    path = "/session/players",
    tag = "session",
    request_body = SelectPlayerRequest,
    responses(
        (status = 200, description = "Slot updated", body = SessionResponse),
        (status = 400, description = "Unknown player", body = ErrorBody),
        (status = 409, description = "Match already started", body = ErrorBody)
    )
)]
pub async fn select_player(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<SelectPlayerRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(session_service::select_player(&state, payload).await?))
}

/// Start the clock once both players are seated.
#[utoipa::path(
    post,
    path = "/session/start",
    tag = "session",
    responses(
        (status = 200, description = "Match started", body = SessionResponse),
        (status = 400, description = "Players missing or identical", body = ErrorBody),
        (status = 409, description = "Not in setup", body = ErrorBody)
    )
)]
pub async fn start_match(
    State(state): State<SharedState>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(session_service::start(&state).await?))
}

/// Add a point. Ignored unless the match is being played.
#[utoipa::path(
    post,
    path = "/session/point",
    tag = "session",
    request_body = ScorePointRequest,
    responses(
        (status = 200, description = "Score after the point", body = SessionResponse),
        (status = 400, description = "Malformed body", body = ErrorBody)
    )
)]
pub async fn score_point(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<ScorePointRequest>,
) -> Json<SessionResponse> {
    Json(session_service::score_point(&state, payload).await)
}

/// Store the finished match and reset the session for the next one.
#[utoipa::path(
    post,
    path = "/session/finalize",
    tag = "session",
    responses(
        (status = 201, description = "Match stored", body = MatchResponse),
        (status = 409, description = "Match not finished", body = ErrorBody),
        (status = 500, description = "Storage failure; the result is kept for a retry", body = ErrorBody)
    )
)]
pub async fn finalize_match(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<MatchResponse>), AppError> {
    let stored = session_service::finalize(&state).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Drop the live match without storing it.
#[utoipa::path(
    post,
    path = "/session/abandon",
    tag = "session",
    responses((status = 200, description = "Session reset", body = SessionResponse))
)]
pub async fn abandon_match(State(state): State<SharedState>) -> Json<SessionResponse> {
    Json(session_service::abandon(&state).await)
}
