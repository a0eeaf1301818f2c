use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

use super::error::{FileDaoError, FileResult};
use crate::dao::{
    models::{MatchEntity, NewMatch, PlayerEntity, name_key},
    storage::{StorageError, StorageResult},
    store::ScoreStore,
};

/// Whole content of the store file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    players: Vec<PlayerEntity>,
    #[serde(default)]
    matches: Vec<MatchEntity>,
}

/// Store keeping players and matches in a single JSON document on disk.
///
/// Every mutation rewrites the document through a temporary file followed by a
/// rename, and the in-memory copy is only updated once the write succeeded.
#[derive(Clone)]
pub struct FileScoreStore {
    inner: Arc<FileInner>,
}

struct FileInner {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl FileScoreStore {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> FileResult<Self> {
        let path = path.into();
        let document = read_document(&path).await?;
        info!(
            path = %path.display(),
            players = document.players.len(),
            matches = document.matches.len(),
            "opened file store"
        );

        Ok(Self {
            inner: Arc::new(FileInner {
                path,
                document: Mutex::new(document),
            }),
        })
    }

    async fn read<T>(&self, view: impl FnOnce(&StoreDocument) -> T) -> T {
        let guard = self.inner.document.lock().await;
        view(&guard)
    }

    /// Apply `change` to a copy of the document, persist it, then commit it in memory.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreDocument) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut guard = self.inner.document.lock().await;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        write_document(&self.inner.path, &next).await?;
        *guard = next;
        Ok(value)
    }

    async fn create_player(&self, name: String) -> StorageResult<PlayerEntity> {
        self.mutate(move |doc| {
            let key = name_key(&name);
            if doc.players.iter().any(|player| player.name_key() == key) {
                return Err(StorageError::Conflict { name });
            }
            let player = PlayerEntity::register(name);
            doc.players.push(player.clone());
            Ok(player)
        })
        .await
    }

    async fn create_match(&self, record: NewMatch) -> StorageResult<MatchEntity> {
        self.mutate(move |doc| {
            let entity = record.into_entity();
            doc.matches.push(entity.clone());
            Ok(entity)
        })
        .await
    }

    async fn clear_players(&self) -> StorageResult<u64> {
        self.mutate(|doc| Ok(doc.players.drain(..).count() as u64))
            .await
    }

    async fn clear_matches(&self) -> StorageResult<u64> {
        self.mutate(|doc| Ok(doc.matches.drain(..).count() as u64))
            .await
    }

    async fn reload(&self) -> FileResult<()> {
        let document = read_document(&self.inner.path).await?;
        let mut guard = self.inner.document.lock().await;
        *guard = document;
        Ok(())
    }

    async fn check_directory(&self) -> FileResult<()> {
        let Some(parent) = parent_dir(&self.inner.path) else {
            return Ok(());
        };
        match fs::metadata(parent).await {
            Ok(_) => Ok(()),
            // The directory is created lazily on the first write.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileDaoError::Read {
                path: parent.to_path_buf(),
                source,
            }),
        }
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

async fn read_document(path: &Path) -> FileResult<StoreDocument> {
    match fs::read(path).await {
        Ok(bytes) if bytes.is_empty() => Ok(StoreDocument::default()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| FileDaoError::Decode {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(StoreDocument::default()),
        Err(source) => Err(FileDaoError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn write_document(path: &Path, document: &StoreDocument) -> FileResult<()> {
    let payload =
        serde_json::to_vec_pretty(document).map_err(|source| FileDaoError::Encode { source })?;

    if let Some(parent) = parent_dir(path) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| FileDaoError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, payload)
        .await
        .map_err(|source| FileDaoError::Write {
            path: tmp_path.clone(),
            source,
        })?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|source| FileDaoError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), "store file written");
    Ok(())
}

impl ScoreStore for FileScoreStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .read(|doc| doc.players.iter().rev().cloned().collect())
                .await)
        })
    }

    fn create_player(&self, name: String) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_player(name).await })
    }

    fn clear_players(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.clear_players().await })
    }

    fn create_match(&self, record: NewMatch) -> BoxFuture<'static, StorageResult<MatchEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_match(record).await })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .read(|doc| doc.matches.iter().rev().cloned().collect())
                .await)
        })
    }

    fn clear_matches(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.clear_matches().await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check_directory().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.reload().await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_match() -> NewMatch {
        let one = Uuid::new_v4();
        NewMatch {
            player_one_id: one,
            player_two_id: Uuid::new_v4(),
            winner_id: one,
            player_one_score: 11,
            player_two_score: 4,
            duration_in_seconds: 300,
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileScoreStore::open(dir.path().join("scores.json"))
            .await
            .unwrap();

        assert!(store.list_players().await.unwrap().is_empty());
        assert!(store.list_matches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_names_conflict_ignoring_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileScoreStore::open(dir.path().join("scores.json"))
            .await
            .unwrap();

        store.create_player("Alice".into()).await.unwrap();
        let err = ScoreStore::create_player(&store, "alice".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { name } if name == "alice"));
        assert_eq!(store.list_players().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.json");
        let store = FileScoreStore::open(&path).await.unwrap();

        store.create_player("Alice".into()).await.unwrap();
        store.create_player("Bob".into()).await.unwrap();
        let stored = ScoreStore::create_match(&store, sample_match())
            .await
            .unwrap();

        let reopened = FileScoreStore::open(&path).await.unwrap();
        let players = reopened.list_players().await.unwrap();
        let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Alice"]);
        assert_eq!(reopened.list_matches().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn matches_are_listed_newest_first_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileScoreStore::open(dir.path().join("scores.json"))
            .await
            .unwrap();

        let first = ScoreStore::create_match(&store, sample_match())
            .await
            .unwrap();
        let second = ScoreStore::create_match(&store, sample_match())
            .await
            .unwrap();

        let listed = store.list_matches().await.unwrap();
        assert_eq!(listed, vec![second, first]);

        assert_eq!(ScoreStore::clear_matches(&store).await.unwrap(), 2);
        assert!(store.list_matches().await.unwrap().is_empty());
        assert_eq!(ScoreStore::clear_matches(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let err = FileScoreStore::open(&path).await.err().unwrap();
        assert!(matches!(err, FileDaoError::Decode { .. }));
    }
}
