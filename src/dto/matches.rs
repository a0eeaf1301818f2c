//! DTOs describing stored matches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{MatchEntity, NewMatch, PlayerEntity},
    dto::{format_system_time, player::PlayerSummary},
    state::history::format_duration,
};

/// Complete result of a match recorded outside of the live session.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    /// First player.
    pub player_one_id: Uuid,
    /// Second player, distinct from the first.
    pub player_two_id: Uuid,
    /// Must be one of the two players.
    pub winner_id: Uuid,
    /// Points of the first player.
    pub player_one_score: u32,
    /// Points of the second player.
    pub player_two_score: u32,
    /// Length of the match.
    pub duration_in_seconds: u64,
}

impl Validate for CreateMatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.player_one_id == self.player_two_id {
            let mut err = ValidationError::new("players_distinct");
            err.message = Some("players must differ".into());
            errors.add("playerTwoId", err);
        }

        if self.winner_id != self.player_one_id && self.winner_id != self.player_two_id {
            let mut err = ValidationError::new("winner_in_match");
            err.message = Some("winner must be one of the players".into());
            errors.add("winnerId", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<CreateMatchRequest> for NewMatch {
    fn from(value: CreateMatchRequest) -> Self {
        Self {
            player_one_id: value.player_one_id,
            player_two_id: value.player_two_id,
            winner_id: value.winner_id,
            player_one_score: value.player_one_score,
            player_two_score: value.player_two_score,
            duration_in_seconds: value.duration_in_seconds,
        }
    }
}

/// Stored match with the players it involved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// Match identifier.
    pub id: Uuid,
    /// RFC 3339 time the result was stored.
    pub created_at: String,
    /// First player.
    pub player_one_id: Uuid,
    /// Second player.
    pub player_two_id: Uuid,
    /// Winning player.
    pub winner_id: Uuid,
    /// `None` when the player is no longer registered.
    pub player_one: Option<PlayerSummary>,
    /// Second player summary.
    pub player_two: Option<PlayerSummary>,
    /// Winner summary.
    pub winner: Option<PlayerSummary>,
    /// Points of the first player.
    pub player_one_score: u32,
    /// Points of the second player.
    pub player_two_score: u32,
    /// Length of the match.
    pub duration_in_seconds: u64,
    /// Duration rendered as `MM:SS`.
    pub duration_label: String,
}

impl MatchResponse {
    /// Build the response, resolving player names through `players`.
    pub fn new(entity: MatchEntity, players: &HashMap<Uuid, PlayerSummary>) -> Self {
        let lookup = |id: &Uuid| players.get(id).cloned();
        Self {
            id: entity.id,
            created_at: format_system_time(entity.created_at),
            player_one: lookup(&entity.player_one_id),
            player_two: lookup(&entity.player_two_id),
            winner: lookup(&entity.winner_id),
            player_one_id: entity.player_one_id,
            player_two_id: entity.player_two_id,
            winner_id: entity.winner_id,
            player_one_score: entity.player_one_score,
            player_two_score: entity.player_two_score,
            duration_label: format_duration(entity.duration_in_seconds),
            duration_in_seconds: entity.duration_in_seconds,
        }
    }
}

/// Index players by id for [`MatchResponse::new`].
pub fn player_index(players: &[PlayerEntity]) -> HashMap<Uuid, PlayerSummary> {
    players
        .iter()
        .map(|player| (player.id, PlayerSummary::from(player)))
        .collect()
}

/// Outcome of clearing the match history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearMatchesResponse {
    /// Confirmation text.
    pub message: String,
    /// Number of matches removed.
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(one: Uuid, two: Uuid, winner: Uuid) -> CreateMatchRequest {
        CreateMatchRequest {
            player_one_id: one,
            player_two_id: two,
            winner_id: winner,
            player_one_score: 11,
            player_two_score: 5,
            duration_in_seconds: 300,
        }
    }

    #[test]
    fn accepts_a_winner_from_the_match() {
        let (one, two) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(request(one, two, one).validate().is_ok());
        assert!(request(one, two, two).validate().is_ok());
    }

    #[test]
    fn rejects_same_player_twice() {
        let one = Uuid::new_v4();
        let errors = request(one, one, one).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("playerTwoId"));
    }

    #[test]
    fn rejects_outside_winner() {
        let errors = request(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("winnerId"));
    }
}
