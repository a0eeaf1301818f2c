use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::player::{CreatePlayerRequest, PlayerResponse},
    error::{AppError, ErrorBody, JsonBody},
    services::player_service,
    state::SharedState,
};

/// Player directory routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/players", get(list_players).post(create_player))
}

/// List registered players, newest first.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses(
        (status = 200, description = "Registered players", body = [PlayerResponse]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    Ok(Json(player_service::list_players(&state).await?))
}

/// Register a new player. Names are unique regardless of case.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player registered", body = PlayerResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody)
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    let player = player_service::create_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(player)))
}
