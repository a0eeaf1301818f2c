use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::matches::MatchResponse;

/// One calendar day of the match history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    /// "Today", "Yesterday", a long date, or "No matches".
    pub label: String,
    /// Selected day as `YYYY-MM-DD`, absent when there are no matches.
    pub date: Option<String>,
    /// Number of days holding matches.
    pub day_count: usize,
    /// Whether an older day exists.
    pub can_go_older: bool,
    /// Whether a newer day exists.
    pub can_go_newer: bool,
    /// Matches of the selected day, newest first.
    pub matches: Vec<MatchResponse>,
}
