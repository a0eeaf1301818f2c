use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::debug;

use crate::state::session::MatchSession;

/// Default spacing between two clock ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task adding one second to a playing session every period.
///
/// The task stops on its own once the session leaves the playing phase or is
/// dropped, and is aborted when the clock itself is stopped or dropped.
pub struct SessionClock {
    handle: JoinHandle<()>,
}

impl SessionClock {
    /// Spawn the ticking task. The first tick fires one full period after start.
    pub fn start(session: &Arc<Mutex<MatchSession>>, period: Duration) -> Self {
        let weak = Arc::downgrade(session);
        let handle = tokio::spawn(run(weak, period));
        Self { handle }
    }

    /// Whether the ticking task is still alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the ticking task.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(session: Weak<Mutex<MatchSession>>, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(session) = session.upgrade() else {
            break;
        };

        let mut guard = session.lock().await;
        if !guard.tick() {
            debug!(phase = ?guard.phase(), "session left playing phase; clock stopping");
            break;
        }
    }
}
