/// CLI configuration
use crate::error::{CliError, Result};
use itired_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "itired.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Platform base URL; without one the session runs offline
    #[serde(default)]
    pub url: Option<String>,

    /// `session` cookie of a logged-in browser session
    #[serde(default)]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Volume preference and recently-played history
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Offline track catalogue (JSON)
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        default_storage()
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `itired.toml` in the working
    /// directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (ITIRED_SERVER__URL, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("ITIRED")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.server.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CliError::Config(format!(
                    "Server URL must start with http:// or https:// (got {})",
                    url
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.player.default_volume) {
            return Err(CliError::Config(format!(
                "player.default_volume must be within 0.0-1.0 (got {})",
                self.player.default_volume
            )));
        }

        Ok(())
    }

    /// Whether a platform is configured
    pub fn is_online(&self) -> bool {
        self.server.url.is_some()
    }
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        store_path: default_store_path(),
        catalog_path: None,
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/player.json")
}
