//! Stored match operations: listing, direct recording and clearing.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{MatchEntity, NewMatch},
    dto::matches::{ClearMatchesResponse, CreateMatchRequest, MatchResponse, player_index},
    error::ServiceError,
    services::history_service,
    state::{SharedState, session::MatchRules},
};

/// Return every stored match, newest first, with player names resolved.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchResponse>, ServiceError> {
    let store = state.require_store().await?;
    let players = store.list_players().await?;
    let matches = store.list_matches().await?;

    let index = player_index(&players);
    Ok(matches
        .into_iter()
        .map(|entity| MatchResponse::new(entity, &index))
        .collect())
}

/// Record a complete match result supplied by the client.
pub async fn create_match(
    state: &SharedState,
    payload: CreateMatchRequest,
) -> Result<MatchResponse, ServiceError> {
    payload.validate()?;
    let record = NewMatch::from(payload);
    check_result(&record, state.rules())?;

    let store = state.require_store().await?;
    let players = store.list_players().await?;
    for id in [record.player_one_id, record.player_two_id] {
        if !players.iter().any(|player| player.id == id) {
            return Err(ServiceError::InvalidInput(format!("unknown player {id}")));
        }
    }

    let entity = store.create_match(record).await?;
    log_recorded(&entity);
    history_service::refresh(state).await;

    Ok(MatchResponse::new(entity, &player_index(&players)))
}

/// Delete the whole match history. Players are kept.
pub async fn clear_matches(state: &SharedState) -> Result<ClearMatchesResponse, ServiceError> {
    let store = state.require_store().await?;
    let deleted = store.clear_matches().await?;
    info!(deleted, "match history cleared");
    history_service::refresh(state).await;

    Ok(ClearMatchesResponse {
        message: "match history cleared".into(),
        deleted,
    })
}

/// Persist a match produced by the live session.
pub async fn persist_finished(
    state: &SharedState,
    record: NewMatch,
) -> Result<MatchEntity, ServiceError> {
    let store = state.require_store().await?;
    let entity = store.create_match(record).await?;
    log_recorded(&entity);
    Ok(entity)
}

/// Reject scores that the configured rules could not have produced, or a
/// winner that does not hold the higher score.
fn check_result(record: &NewMatch, rules: MatchRules) -> Result<(), ServiceError> {
    let (one, two) = (record.player_one_score, record.player_two_score);
    if !rules.is_terminal(one, two) {
        return Err(ServiceError::InvalidInput(format!(
            "score {one}-{two} is not a finished match (first to {} with a {} point lead)",
            rules.points_to_win, rules.win_margin
        )));
    }

    let leader: Uuid = if one > two {
        record.player_one_id
    } else {
        record.player_two_id
    };
    if record.winner_id != leader {
        return Err(ServiceError::InvalidInput(
            "winner must hold the higher score".into(),
        ));
    }
    Ok(())
}

fn log_recorded(entity: &MatchEntity) {
    info!(
        match_id = %entity.id,
        winner_id = %entity.winner_id,
        player_one_score = entity.player_one_score,
        player_two_score = entity.player_two_score,
        duration_in_seconds = entity.duration_in_seconds,
        "match recorded"
    );
}
