use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Config file the persistence backend reads when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "mapper_mini/config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniConfig {
    /// Locates the persistence backend. Opaque to the resolver.
    pub config_path: PathBuf,
    pub environment: Option<String>,
    /// Upper bound on concurrently open sessions; unbounded when `None`.
    pub max_sessions: Option<usize>,
}

impl Default for MiniConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            environment: None,
            max_sessions: None,
        }
    }
}

impl MiniConfig {
    /// # Errors
    ///
    /// Returns the offending variable name if `MAPPER_MINI_MAX_SESSIONS` is
    /// not a positive integer.
    pub fn from_env() -> Result<Self, String> {
        let max_sessions = match env::var("MAPPER_MINI_MAX_SESSIONS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("MAPPER_MINI_MAX_SESSIONS: invalid value {raw:?}"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            config_path: env::var("MAPPER_MINI_CONFIG")
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from),
            environment: env::var("MAPPER_MINI_ENVIRONMENT").ok(),
            max_sessions,
        })
    }
}
