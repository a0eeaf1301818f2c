//! Live match operations.

use crate::{
    dto::{
        matches::MatchResponse,
        session::{ScorePointRequest, SelectPlayerRequest, SessionResponse},
    },
    error::ServiceError,
    services::{history_service, match_service},
    state::SharedState,
};

/// Return the current session.
pub async fn snapshot(state: &SharedState) -> SessionResponse {
    state.session().snapshot().await.into()
}

/// Assign or clear a slot. The player must be registered.
pub async fn select_player(
    state: &SharedState,
    payload: SelectPlayerRequest,
) -> Result<SessionResponse, ServiceError> {
    if let Some(player_id) = payload.player_id {
        let store = state.require_store().await?;
        let players = store.list_players().await?;
        if !players.iter().any(|player| player.id == player_id) {
            return Err(ServiceError::InvalidInput(format!(
                "unknown player {player_id}"
            )));
        }
    }

    let session = state
        .session()
        .select_player(payload.slot.into(), payload.player_id)
        .await?;
    Ok(session.into())
}

/// Start the match with the two selected players.
pub async fn start(state: &SharedState) -> Result<SessionResponse, ServiceError> {
    Ok(state.session().start().await?.into())
}

/// Add a point to one side. Outside of play the session is returned unchanged.
pub async fn score_point(state: &SharedState, payload: ScorePointRequest) -> SessionResponse {
    let (_, session) = state.session().score_point(payload.slot.into()).await;
    session.into()
}

/// Persist the finished match and reset the session.
///
/// When storing fails the session keeps its result so the call can be retried.
pub async fn finalize(state: &SharedState) -> Result<MatchResponse, ServiceError> {
    let entity = state
        .session()
        .finalize(|record| match_service::persist_finished(state, record))
        .await?;

    history_service::refresh(state).await;
    let names = history_service::player_names(state).await;
    Ok(MatchResponse::new(entity, &names))
}

/// Drop the current match in whatever phase it is.
pub async fn abandon(state: &SharedState) -> SessionResponse {
    state.session().abandon().await.into()
}
