//! Configuration module
//!
//! Everything is read from environment variables once at startup and then
//! passed around explicitly. `from_lookup` takes any variable source so
//! tests never touch the process environment.

use std::env;
use std::path::PathBuf;

use crate::dsn::ConnectionTarget;

/// Default artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Most recent rows pulled for one training run
pub const DEFAULT_ROW_LIMIT: i64 = 20_000;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "anomaly_server=debug,anomaly_core=info,tower_http=debug";

/// Read a variable, treating empty values as unset
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn model_path<F: Fn(&str) -> Option<String>>(lookup: &F) -> PathBuf {
    non_empty(lookup, "MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

fn log_json<F: Fn(&str) -> Option<String>>(lookup: &F) -> bool {
    non_empty(lookup, "LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"))
}

/// Scoring server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Model artifact loaded at startup
    pub model_path: PathBuf,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        Self {
            port: non_empty(&lookup, "PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8001),

            model_path: model_path(&lookup),

            log_json: log_json(&lookup),
        }
    }
}

/// Offline trainer configuration
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Where the feature rows live
    pub target: ConnectionTarget,

    /// Where the fitted artifact is written
    pub model_path: PathBuf,

    /// Upper bound on rows fetched, most recent first
    pub row_limit: i64,

    pub log_json: bool,
}

impl TrainerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        Self {
            target: ConnectionTarget::resolve(&lookup),

            model_path: model_path(&lookup),

            row_limit: non_empty(&lookup, "TRAIN_ROW_LIMIT")
                .and_then(|l| l.parse().ok())
                .filter(|l: &i64| *l > 0)
                .unwrap_or(DEFAULT_ROW_LIMIT),

            log_json: log_json(&lookup),
        }
    }
}
