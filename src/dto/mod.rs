use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Health check payloads.
pub mod health;
/// History page payloads.
pub mod history;
/// Stored match payloads.
pub mod matches;
/// Player directory payloads.
pub mod player;
/// Live match payloads.
pub mod session;
/// Custom field validators.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
