use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::NewMatch,
    state::{
        clock::SessionClock,
        session::{MatchRules, MatchSession, ScoreOutcome, SessionError, Slot},
    },
};

/// Owner of the live match: pairs every session transition with the
/// start/stop of its clock.
pub struct SessionDriver {
    session: Arc<Mutex<MatchSession>>,
    clock: Mutex<Option<SessionClock>>,
    tick_period: Duration,
}

impl SessionDriver {
    /// Create a driver holding a fresh session.
    pub fn new(rules: MatchRules, tick_period: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(MatchSession::new(rules))),
            clock: Mutex::new(None),
            tick_period,
        }
    }

    /// Copy of the current session state.
    pub async fn snapshot(&self) -> MatchSession {
        self.session.lock().await.clone()
    }

    /// Assign (or clear) a slot during setup.
    pub async fn select_player(
        &self,
        slot: Slot,
        player: Option<Uuid>,
    ) -> Result<MatchSession, SessionError> {
        let mut session = self.session.lock().await;
        session.select_player(slot, player)?;
        Ok(session.clone())
    }

    /// Start the match and its clock.
    pub async fn start(&self) -> Result<MatchSession, SessionError> {
        let mut session = self.session.lock().await;
        session.start()?;

        let mut clock = self.clock.lock().await;
        *clock = Some(SessionClock::start(&self.session, self.tick_period));
        info!(
            player_one = ?session.player(Slot::One),
            player_two = ?session.player(Slot::Two),
            "match started"
        );
        Ok(session.clone())
    }

    /// Register a point; stops the clock when it decides the match.
    pub async fn score_point(&self, slot: Slot) -> (ScoreOutcome, MatchSession) {
        let mut session = self.session.lock().await;
        let outcome = session.score_point(slot);

        match outcome {
            ScoreOutcome::Won(winner) => {
                self.stop_clock().await;
                info!(
                    ?winner,
                    score_one = session.score(Slot::One),
                    score_two = session.score(Slot::Two),
                    elapsed_seconds = session.elapsed_seconds(),
                    "match won"
                );
            }
            ScoreOutcome::Ignored => debug!(?slot, phase = ?session.phase(), "point ignored"),
            ScoreOutcome::Scored => {}
        }

        (outcome, session.clone())
    }

    /// Persist the finished match through `persist`, resetting the session only
    /// when it succeeds.
    ///
    /// The session stays locked while `persist` runs, so no point, tick or
    /// second finalize can interleave with the hand-off.
    pub async fn finalize<F, Fut, T, E>(&self, persist: F) -> Result<T, E>
    where
        F: FnOnce(NewMatch) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<SessionError>,
    {
        let mut session = self.session.lock().await;
        let stored = session.finalize(persist).await?;
        self.stop_clock().await;
        Ok(stored)
    }

    /// Abandon the current session in any phase.
    pub async fn abandon(&self) -> MatchSession {
        let mut session = self.session.lock().await;
        session.reset();
        self.stop_clock().await;
        session.clone()
    }

    /// Whether a clock task is currently attached to the session.
    pub async fn clock_running(&self) -> bool {
        self.clock
            .lock()
            .await
            .as_ref()
            .is_some_and(SessionClock::is_running)
    }

    async fn stop_clock(&self) {
        if let Some(clock) = self.clock.lock().await.take() {
            clock.stop();
        }
    }
}
