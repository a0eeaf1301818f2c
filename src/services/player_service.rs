//! Player directory operations.

use tracing::info;
use validator::Validate;

use crate::{
    dto::player::{CreatePlayerRequest, PlayerResponse},
    error::ServiceError,
    state::SharedState,
};

/// Return every registered player, newest first.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerResponse>, ServiceError> {
    let store = state.require_store().await?;
    let players = store.list_players().await?;
    Ok(players.into_iter().map(PlayerResponse::from).collect())
}

/// Register a player under its trimmed name.
pub async fn create_player(
    state: &SharedState,
    payload: CreatePlayerRequest,
) -> Result<PlayerResponse, ServiceError> {
    payload.validate()?;
    let store = state.require_store().await?;

    let name = payload.name.trim().to_owned();
    let player = store.create_player(name).await?;
    info!(player_id = %player.id, name = %player.name, "player registered");
    Ok(player.into())
}
