use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::open_database,
    error::{MongoDaoError, MongoResult},
    models::{
        MATCH_COLLECTION_NAME, MongoMatchDocument, MongoPlayerDocument, PLAYER_COLLECTION_NAME,
        name_key_filter, newest_first,
    },
};
use crate::dao::{
    models::{MatchEntity, NewMatch, PlayerEntity},
    storage::{StorageError, StorageResult},
    store::ScoreStore,
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Store keeping players and matches in two MongoDB collections.
#[derive(Clone)]
pub struct MongoScoreStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) = open_database(&self.config).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoScoreStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = open_database(&config).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let players = self.player_collection().await;
        let name_index = IndexModel::builder()
            .keys(doc! {"name_key": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_name_key_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        players
            .create_index(name_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "name_key",
                source,
            })?;

        let matches = self.match_collection().await;
        let created_index = IndexModel::builder()
            .keys(newest_first())
            .options(
                IndexOptions::builder()
                    .name(Some("match_created_at_idx".to_owned()))
                    .build(),
            )
            .build();

        matches
            .create_index(created_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MATCH_COLLECTION_NAME,
                index: "created_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database()
            .await
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME)
    }

    async fn match_collection(&self) -> Collection<MongoMatchDocument> {
        self.database()
            .await
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
    }

    async fn list_players(&self) -> MongoResult<Vec<PlayerEntity>> {
        let list_error = |source| MongoDaoError::List {
            collection: PLAYER_COLLECTION_NAME,
            source,
        };
        let documents: Vec<MongoPlayerDocument> = self
            .player_collection()
            .await
            .find(doc! {})
            .sort(newest_first())
            .await
            .map_err(list_error)?
            .try_collect()
            .await
            .map_err(list_error)?;

        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_player(&self, name: String) -> StorageResult<PlayerEntity> {
        let player = PlayerEntity::register(name);
        let collection = self.player_collection().await;

        let existing = collection
            .find_one(name_key_filter(&player.name_key()))
            .await
            .map_err(|source| MongoDaoError::SavePlayer {
                name: player.name.clone(),
                source,
            })?;
        if existing.is_some() {
            return Err(StorageError::Conflict { name: player.name });
        }

        match collection
            .insert_one(MongoPlayerDocument::from(player.clone()))
            .await
        {
            Ok(_) => Ok(player),
            // Lost a race against a concurrent insert of the same name.
            Err(err) if is_duplicate_key(&err) => Err(StorageError::Conflict { name: player.name }),
            Err(source) => Err(MongoDaoError::SavePlayer {
                name: player.name,
                source,
            }
            .into()),
        }
    }

    async fn create_match(&self, record: NewMatch) -> MongoResult<MatchEntity> {
        let entity = record.into_entity();
        self.match_collection()
            .await
            .insert_one(MongoMatchDocument::from(entity.clone()))
            .await
            .map_err(|source| MongoDaoError::SaveMatch {
                id: entity.id,
                source,
            })?;
        Ok(entity)
    }

    async fn list_matches(&self) -> MongoResult<Vec<MatchEntity>> {
        let list_error = |source| MongoDaoError::List {
            collection: MATCH_COLLECTION_NAME,
            source,
        };
        let documents: Vec<MongoMatchDocument> = self
            .match_collection()
            .await
            .find(doc! {})
            .sort(newest_first())
            .await
            .map_err(list_error)?
            .try_collect()
            .await
            .map_err(list_error)?;

        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn clear_players(&self) -> MongoResult<u64> {
        let result = self
            .player_collection()
            .await
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::Clear {
                collection: PLAYER_COLLECTION_NAME,
                source,
            })?;
        Ok(result.deleted_count)
    }

    async fn clear_matches(&self) -> MongoResult<u64> {
        let result = self
            .match_collection()
            .await
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::Clear {
                collection: MATCH_COLLECTION_NAME,
                source,
            })?;
        Ok(result.deleted_count)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl ScoreStore for MongoScoreStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players().await.map_err(Into::into) })
    }

    fn create_player(&self, name: String) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_player(name).await })
    }

    fn clear_players(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.clear_players().await.map_err(Into::into) })
    }

    fn create_match(&self, record: NewMatch) -> BoxFuture<'static, StorageResult<MatchEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_match(record).await.map_err(Into::into) })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches().await.map_err(Into::into) })
    }

    fn clear_matches(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.clear_matches().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
