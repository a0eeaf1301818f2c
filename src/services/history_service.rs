//! Day-by-day match history browsing.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::models::MatchEntity,
    dto::{
        history::HistoryPage,
        matches::{MatchResponse, player_index},
        player::PlayerSummary,
    },
    error::ServiceError,
    state::{SharedState, history::MatchHistory},
};

/// Reload the history from the store and return the selected day.
///
/// The selection jumps back to today, or to the most recent day with matches.
pub async fn current_page(state: &SharedState) -> Result<HistoryPage, ServiceError> {
    let store = state.require_store().await?;
    let matches = store.list_matches().await?;
    {
        let mut history = state.history().lock().await;
        let today = history.today();
        history.reload(matches, today);
    }
    page(state).await
}

/// Step to the next older day and return it.
pub async fn older(state: &SharedState) -> Result<HistoryPage, ServiceError> {
    state.history().lock().await.go_to_previous();
    page(state).await
}

/// Step to the next newer day and return it.
pub async fn newer(state: &SharedState) -> Result<HistoryPage, ServiceError> {
    state.history().lock().await.go_to_next();
    page(state).await
}

/// Rebuild the history after the stored matches changed.
///
/// Failures are logged and the previous buckets kept.
pub async fn refresh(state: &SharedState) {
    let Some(store) = state.store().await else {
        debug!("no store installed; history not refreshed");
        return;
    };
    match store.list_matches().await {
        Ok(matches) => {
            let mut history = state.history().lock().await;
            let today = history.today();
            history.reload(matches, today);
        }
        Err(err) => warn!(error = %err, "failed to refresh match history"),
    }
}

async fn page(state: &SharedState) -> Result<HistoryPage, ServiceError> {
    let names = player_names(state).await;
    let history = state.history().lock().await;
    Ok(build_page(&history, &names))
}

/// Player names for the page; left empty while the store is unreachable.
pub(crate) async fn player_names(state: &SharedState) -> HashMap<Uuid, PlayerSummary> {
    let Some(store) = state.store().await else {
        return HashMap::new();
    };
    match store.list_players().await {
        Ok(players) => player_index(&players),
        Err(err) => {
            warn!(error = %err, "failed to load players for history page");
            HashMap::new()
        }
    }
}

fn build_page(
    history: &MatchHistory<MatchEntity>,
    names: &HashMap<Uuid, PlayerSummary>,
) -> HistoryPage {
    HistoryPage {
        label: history.label(history.today()),
        date: history.selected_date().map(|date| date.to_string()),
        day_count: history.day_count(),
        can_go_older: history.can_go_previous(),
        can_go_newer: history.can_go_next(),
        matches: history
            .selected_records()
            .iter()
            .cloned()
            .map(|entity| MatchResponse::new(entity, names))
            .collect(),
    }
}
