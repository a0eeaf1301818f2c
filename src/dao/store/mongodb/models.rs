use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::models::{MatchEntity, PlayerEntity};

/// Collection holding registered players.
pub const PLAYER_COLLECTION_NAME: &str = "players";
/// Collection holding finished matches.
pub const MATCH_COLLECTION_NAME: &str = "matches";

/// Player as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    /// Lower-cased name backing the unique index.
    name_key: String,
    created_at: DateTime,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name_key: value.name_key(),
            name: value.name,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MongoPlayerDocument> for PlayerEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoPlayerDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(PLAYER_COLLECTION_NAME, &value.id)?,
            name: value.name,
            created_at: value.created_at.to_system_time(),
        })
    }
}

/// Match as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: String,
    created_at: DateTime,
    player_one_id: String,
    player_two_id: String,
    winner_id: String,
    player_one_score: u32,
    player_two_score: u32,
    duration_in_seconds: u64,
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id.to_string(),
            created_at: DateTime::from_system_time(value.created_at),
            player_one_id: value.player_one_id.to_string(),
            player_two_id: value.player_two_id.to_string(),
            winner_id: value.winner_id.to_string(),
            player_one_score: value.player_one_score,
            player_two_score: value.player_two_score,
            duration_in_seconds: value.duration_in_seconds,
        }
    }
}

impl TryFrom<MongoMatchDocument> for MatchEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoMatchDocument) -> Result<Self, Self::Error> {
        let parse = |raw: &str| parse_id(MATCH_COLLECTION_NAME, raw);
        Ok(Self {
            id: parse(&value.id)?,
            created_at: value.created_at.to_system_time(),
            player_one_id: parse(&value.player_one_id)?,
            player_two_id: parse(&value.player_two_id)?,
            winner_id: parse(&value.winner_id)?,
            player_one_score: value.player_one_score,
            player_two_score: value.player_two_score,
            duration_in_seconds: value.duration_in_seconds,
        })
    }
}

/// Filter matching a player by lower-cased name.
pub fn name_key_filter(key: &str) -> Document {
    doc! { "name_key": key }
}

/// Sort order putting the most recent documents first.
pub fn newest_first() -> Document {
    doc! { "created_at": -1 }
}

fn parse_id(collection: &'static str, raw: &str) -> Result<Uuid, MongoDaoError> {
    Uuid::parse_str(raw).map_err(|_| MongoDaoError::InvalidId {
        collection,
        value: raw.to_owned(),
    })
}
