//! DTOs for the player directory.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::PlayerEntity,
    dto::{format_system_time, validation::validate_player_name},
};

/// Payload registering a new player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePlayerRequest {
    /// Display name; surrounding whitespace is dropped.
    #[validate(custom(function = "validate_player_name"))]
    pub name: String,
}

/// Registered player as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    /// Player identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// RFC 3339 registration time.
    pub created_at: String,
}

impl From<PlayerEntity> for PlayerResponse {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: format_system_time(value.created_at),
        }
    }
}

/// Short player reference embedded in matches.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerSummary {
    /// Player identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

impl From<&PlayerEntity> for PlayerSummary {
    fn from(value: &PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}
