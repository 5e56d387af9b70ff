//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{EventsError, EventsResult};

static DEFAULT_API_URL: &str = "http://localhost:8000/api/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "CLUB_EVENTS";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration at ~/.config/club-events/config.toml
///
/// Every key can also be set through a `CLUB_EVENTS_`-prefixed environment
/// variable (e.g. `CLUB_EVENTS_API_URL`), which wins over the file.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the events API, including the `/api/` prefix
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token sent with every request, if set
    pub auth_token: Option<String>,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Google calendar to read aggregated events from (server default if unset)
    pub calendar_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: default_api_url(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            calendar_id: None,
        }
    }
}

impl ClientConfig {
    pub fn config_path() -> EventsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventsError::Config("Could not determine config directory".into()))?
            .join("club-events");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented default on first run),
    /// then apply environment overrides.
    pub fn load() -> EventsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> EventsResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| EventsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventsError::Config(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventsResult<()> {
        let contents = format!(
            "\
# club-events configuration

# Base URL of the events API:
# api_url = \"{DEFAULT_API_URL}\"

# Token sent as `Authorization: Bearer <token>`:
# auth_token = \"...\"

# Request timeout in seconds:
# timeout_secs = {DEFAULT_TIMEOUT_SECS}

# Google calendar used for aggregated events:
# calendar_id = \"club@group.calendar.google.com\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
