/// Single JSON document backend.
pub mod file;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::StorageConfig;
use crate::dao::models::{MatchEntity, NewMatch, PlayerEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for players and finished matches.
pub trait ScoreStore: Send + Sync {
    /// All registered players, newest first.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Register a player; fails with a conflict when the name is taken (ignoring case).
    fn create_player(&self, name: String) -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    /// Remove every player, returning how many were deleted.
    fn clear_players(&self) -> BoxFuture<'static, StorageResult<u64>>;
    /// Persist a finished match and return it with its identifier.
    fn create_match(&self, record: NewMatch) -> BoxFuture<'static, StorageResult<MatchEntity>>;
    /// All stored matches, newest first.
    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;
    /// Remove every match, returning how many were deleted.
    fn clear_matches(&self) -> BoxFuture<'static, StorageResult<u64>>;
    /// Probe the backend without changing anything.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the connection or reload the backing data.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Open the backend selected by the configuration.
pub async fn open_store(config: &StorageConfig) -> StorageResult<Arc<dyn ScoreStore>> {
    match config {
        StorageConfig::File { path } => {
            let store = file::FileScoreStore::open(path.clone()).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "mongo-store")]
        StorageConfig::Mongo { uri, database } => {
            let config = mongodb::MongoConfig::from_uri(uri, database.as_deref()).await?;
            let store = mongodb::MongoScoreStore::connect(config).await?;
            tracing::info!(database = ?database, "connected to MongoDB store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongo-store"))]
        StorageConfig::Mongo { .. } => Err(crate::dao::storage::StorageError::unavailable(
            "MongoDB storage requested".into(),
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "built without the `mongo-store` feature",
            ),
        )),
    }
}
