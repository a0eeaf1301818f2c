//! Application-level configuration loading: match rules, clock period, history
//! calendar offset and storage backend selection.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use time::UtcOffset;
use tracing::{info, warn};

use crate::state::{
    clock::DEFAULT_TICK_PERIOD,
    session::{DEFAULT_POINTS_TO_WIN, DEFAULT_WIN_MARGIN, MatchRules},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SQUASH_SCORE_CONFIG_PATH";
/// File used by the JSON store when nothing else is configured.
pub const DEFAULT_STORE_PATH: &str = "data/squash-score.json";
/// MongoDB instance used when neither the config nor `MONGO_URI` name one.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Where players and matches are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Single JSON document on local disk.
    File {
        /// Location of the document.
        path: PathBuf,
    },
    /// MongoDB database.
    Mongo {
        /// Connection string.
        uri: String,
        /// Database name, backend default when absent.
        database: Option<String>,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Win condition applied to every live match.
    pub rules: MatchRules,
    /// Spacing between two clock ticks of the live match.
    pub tick_period: Duration,
    /// Offset used to split match history into calendar days.
    pub history_offset: UtcOffset,
    /// Persistence backend.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        points_to_win = app_config.rules.points_to_win,
                        win_margin = app_config.rules.win_margin,
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    /// Let `MONGO_URI` / `MONGO_DB` override a configured MongoDB backend.
    fn with_env_overrides(mut self) -> Self {
        if let StorageConfig::Mongo { uri, database } = &mut self.storage {
            if let Some(value) = non_empty_env("MONGO_URI") {
                *uri = value;
            }
            if let Some(value) = non_empty_env("MONGO_DB") {
                *database = Some(value);
            }
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules: MatchRules::default(),
            tick_period: DEFAULT_TICK_PERIOD,
            history_offset: local_offset(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    rules: Option<RawRules>,
    tick_millis: Option<u64>,
    utc_offset_minutes: Option<i32>,
    storage: Option<RawStorage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRules {
    points_to_win: u32,
    win_margin: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawStorage {
    File {
        path: Option<PathBuf>,
    },
    Mongo {
        uri: Option<String>,
        database: Option<String>,
    },
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let rules = value.rules.map(rules_or_default).unwrap_or_default();

        let tick_period = match value.tick_millis {
            Some(0) => {
                warn!("tickMillis must be positive; using default clock period");
                DEFAULT_TICK_PERIOD
            }
            Some(millis) => Duration::from_millis(millis),
            None => DEFAULT_TICK_PERIOD,
        };

        let history_offset = value
            .utc_offset_minutes
            .and_then(|minutes| match UtcOffset::from_whole_seconds(minutes.saturating_mul(60)) {
                Ok(offset) => Some(offset),
                Err(err) => {
                    warn!(minutes, error = %err, "invalid utcOffsetMinutes; using local offset");
                    None
                }
            })
            .unwrap_or_else(local_offset);

        let storage = match value.storage {
            Some(RawStorage::File { path }) => StorageConfig::File {
                path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            },
            Some(RawStorage::Mongo { uri, database }) => StorageConfig::Mongo {
                uri: uri.unwrap_or_else(|| DEFAULT_MONGO_URI.to_owned()),
                database,
            },
            None => StorageConfig::default(),
        };

        Self {
            rules,
            tick_period,
            history_offset,
            storage,
        }
    }
}

fn rules_or_default(raw: RawRules) -> MatchRules {
    if raw.points_to_win == 0 || raw.win_margin == 0 {
        warn!(
            points_to_win = raw.points_to_win,
            win_margin = raw.win_margin,
            default_points = DEFAULT_POINTS_TO_WIN,
            default_margin = DEFAULT_WIN_MARGIN,
            "match rules must be positive; using defaults"
        );
        return MatchRules::default();
    }
    MatchRules {
        points_to_win: raw.points_to_win,
        win_margin: raw.win_margin,
    }
}

/// Offset of the host, or UTC when it cannot be determined safely.
fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or_else(|err| {
        warn!(error = %err, "cannot determine local UTC offset; history days use UTC");
        UtcOffset::UTC
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AppConfig {
        serde_json::from_str::<RawConfig>(json).unwrap().into()
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse("{}");
        assert_eq!(config.rules, MatchRules::default());
        assert_eq!(config.tick_period, DEFAULT_TICK_PERIOD);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn reads_every_section() {
        let config = parse(
            r#"{
                "rules": { "pointsToWin": 15, "winMargin": 1 },
                "tickMillis": 250,
                "utcOffsetMinutes": 120,
                "storage": { "kind": "mongo", "uri": "mongodb://db:27017", "database": "club" }
            }"#,
        );

        assert_eq!(
            config.rules,
            MatchRules {
                points_to_win: 15,
                win_margin: 1
            }
        );
        assert_eq!(config.tick_period, Duration::from_millis(250));
        assert_eq!(config.history_offset.whole_minutes(), 120);
        assert_eq!(
            config.storage,
            StorageConfig::Mongo {
                uri: "mongodb://db:27017".into(),
                database: Some("club".into())
            }
        );
    }

    #[test]
    fn rejects_degenerate_values() {
        let config = parse(r#"{ "rules": { "pointsToWin": 11, "winMargin": 0 }, "tickMillis": 0 }"#);
        assert_eq!(config.rules, MatchRules::default());
        assert_eq!(config.tick_period, DEFAULT_TICK_PERIOD);
    }

    #[test]
    fn file_storage_path_defaults() {
        let config = parse(r#"{ "storage": { "kind": "file" } }"#);
        assert_eq!(config.storage, StorageConfig::default());
    }
}
