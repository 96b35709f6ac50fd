//! Store configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use surveystat_core::traits::SurveyRepository;

use crate::json::JsonRepository;
use crate::rest::RestRepository;

/// Where surveys and responses are read from.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// A dataset file or directory on disk.
    Json {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
    /// A PostgREST-compatible HTTP API (e.g. Supabase).
    Rest {
        base_url: String,
        #[serde(default)]
        api_key: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Json { data_dir } => {
                f.debug_struct("Json").field("data_dir", data_dir).finish()
            }
            StoreConfig::Rest {
                base_url,
                api_key: _,
                timeout_secs,
            } => f
                .debug_struct("Rest")
                .field("base_url", base_url)
                .field("api_key", &"***")
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_timeout() -> u64 {
    30
}

/// Top-level surveystat configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveystatConfig {
    /// Backing store for surveys and responses.
    #[serde(default)]
    pub store: StoreConfig,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Output directory for snapshots and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./surveystat-results")
}

impl Default for SurveystatConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            bind: default_bind(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_store_config(config: StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Json { data_dir } => StoreConfig::Json {
            data_dir: PathBuf::from(resolve_env_vars(&data_dir.to_string_lossy())),
        },
        StoreConfig::Rest {
            base_url,
            api_key,
            timeout_secs,
        } => StoreConfig::Rest {
            base_url: resolve_env_vars(&base_url),
            api_key: resolve_env_vars(&api_key),
            timeout_secs,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `surveystat.toml` in the current directory
/// 2. `~/.config/surveystat/config.toml`
///
/// Environment variable overrides: `SURVEYSTAT_DATA_DIR` (switches to the
/// JSON store), `SURVEYSTAT_API_KEY` (REST store only).
pub fn load_config() -> Result<SurveystatConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SurveystatConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("surveystat.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SurveystatConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SurveystatConfig::default(),
    };

    apply_env_overrides(&mut config);
    config.store = resolve_store_config(config.store);
    Ok(config)
}

fn apply_env_overrides(config: &mut SurveystatConfig) {
    if let Ok(dir) = std::env::var("SURVEYSTAT_DATA_DIR") {
        config.store = StoreConfig::Json {
            data_dir: PathBuf::from(dir),
        };
    }

    if let Ok(key) = std::env::var("SURVEYSTAT_API_KEY") {
        if let StoreConfig::Rest { api_key, .. } = &mut config.store {
            *api_key = key;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("surveystat"))
}

/// Create a repository instance from its configuration.
pub fn create_repository(config: &StoreConfig) -> Result<Box<dyn SurveyRepository>> {
    match config {
        StoreConfig::Json { data_dir } => Ok(Box::new(JsonRepository::new(data_dir))),
        StoreConfig::Rest {
            base_url,
            api_key,
            timeout_secs,
        } => Ok(Box::new(RestRepository::new(
            base_url,
            api_key,
            *timeout_secs,
        )?)),
    }
}
