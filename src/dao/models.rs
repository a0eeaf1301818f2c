use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Registered club member that can take part in matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Trimmed display name, unique regardless of case.
    pub name: String,
    /// Registration timestamp.
    pub created_at: SystemTime,
}

impl PlayerEntity {
    /// Build a freshly registered player with a new identifier.
    pub fn register(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: SystemTime::now(),
        }
    }

    /// Key used to detect duplicate names.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Normalise a player name for case-insensitive comparisons.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Result of a finished match, ready to be handed to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMatch {
    /// Player that occupied the first slot.
    pub player_one_id: Uuid,
    /// Player that occupied the second slot.
    pub player_two_id: Uuid,
    /// Either `player_one_id` or `player_two_id`.
    pub winner_id: Uuid,
    /// Final score of the first player.
    pub player_one_score: u32,
    /// Final score of the second player.
    pub player_two_score: u32,
    /// Time spent playing.
    pub duration_in_seconds: u64,
}

impl NewMatch {
    /// Stamp the candidate with an identifier and creation time.
    pub fn into_entity(self) -> MatchEntity {
        MatchEntity {
            id: Uuid::new_v4(),
            created_at: SystemTime::now(),
            player_one_id: self.player_one_id,
            player_two_id: self.player_two_id,
            winner_id: self.winner_id,
            player_one_score: self.player_one_score,
            player_two_score: self.player_two_score,
            duration_in_seconds: self.duration_in_seconds,
        }
    }
}

/// Persisted match record. Never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key of the match.
    pub id: Uuid,
    /// Moment the result was stored.
    pub created_at: SystemTime,
    /// Player that occupied the first slot.
    pub player_one_id: Uuid,
    /// Player that occupied the second slot.
    pub player_two_id: Uuid,
    /// Either `player_one_id` or `player_two_id`.
    pub winner_id: Uuid,
    /// Final score of the first player.
    pub player_one_score: u32,
    /// Final score of the second player.
    pub player_two_score: u32,
    /// Time spent playing.
    pub duration_in_seconds: u64,
}
