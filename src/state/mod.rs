/// One-second ticker driving the live match clock.
pub mod clock;
/// Match history bucketed by calendar day.
pub mod history;
/// Live match paired with its clock.
pub mod live;
/// Match state machine and scoring rules.
pub mod session;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, watch};

use crate::{
    config::AppConfig,
    dao::{models::MatchEntity, store::ScoreStore},
    error::ServiceError,
    state::{history::MatchHistory, live::SessionDriver, session::MatchRules},
};

/// Reference-counted handle shared by every request handler.
pub type SharedState = Arc<AppState>;

/// Central application state: the storage handle, the live match and the
/// history browser.
pub struct AppState {
    store: RwLock<Option<Arc<dyn ScoreStore>>>,
    degraded: watch::Sender<bool>,
    session: SessionDriver,
    history: Mutex<MatchHistory<MatchEntity>>,
    rules: MatchRules,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: &AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            session: SessionDriver::new(config.rules, config.tick_period),
            history: Mutex::new(MatchHistory::new(config.history_offset)),
            rules: config.rules,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn ScoreStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Store handle for a request, failing while the service is degraded.
    pub async fn require_store(&self) -> Result<Arc<dyn ScoreStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn ScoreStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// The single live match.
    pub fn session(&self) -> &SessionDriver {
        &self.session
    }

    /// Day-by-day browser over stored matches.
    pub fn history(&self) -> &Mutex<MatchHistory<MatchEntity>> {
        &self.history
    }

    /// Win condition configured for this process.
    pub fn rules(&self) -> MatchRules {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::store::file::FileScoreStore;

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = AppState::new(&AppConfig::default());
        let mut watcher = state.degraded_watcher();
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_store().await,
            Err(ServiceError::Degraded)
        ));

        let dir = tempfile::tempdir().unwrap();
        let store = FileScoreStore::open(dir.path().join("store.json"))
            .await
            .unwrap();
        state.set_store(Arc::new(store)).await;

        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(state.require_store().await.is_ok());

        state.clear_store().await;
        assert!(state.is_degraded());
        assert!(state.store().await.is_none());
    }
}
