//! Configuration system for kartei.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{KarteiError, KarteiResult};

/// Item store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single JSON document, compatible with the existing `user_data.json`.
    #[default]
    Json,
    /// SQLite database keyed by learner and title.
    Sqlite,
    /// Volatile in-process map.
    Memory,
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// File path for the json and sqlite backends.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Json,
            path: kartei_dir().join("user_data.json"),
        }
    }
}

/// How the next card is chosen among due items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First due item in stored order.
    #[default]
    FirstDue,
    /// Uniformly random due item.
    RandomDue,
}

/// Minimum item counts before free practice conversations unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeThresholds {
    pub min_vocabulary: usize,
    pub min_grammar: usize,
}

impl Default for PracticeThresholds {
    fn default() -> Self {
        Self {
            min_vocabulary: 100,
            min_grammar: 100,
        }
    }
}

/// Per-learner request budget for the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,
    /// Requests allowed per window and learner.
    pub max_requests: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 10,
        }
    }
}

/// Main kartei configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KarteiConfig {
    pub store: StoreConfig,
    pub selection: SelectionPolicy,
    pub practice: PracticeThresholds,
    pub rate_limit: RateLimitConfig,
}

fn kartei_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".kartei"))
        .unwrap_or_else(|| PathBuf::from(".kartei"))
}

impl KarteiConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> KarteiResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| KarteiError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| KarteiError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| KarteiError::Configuration(e.to_string())),
            _ => Err(KarteiError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> KarteiResult<Self> {
        Self::default().merge_env()
    }

    /// Overlay environment variables onto this configuration.
    ///
    /// Reads:
    /// - `KARTEI_STORE_BACKEND` (`json` | `sqlite` | `memory`)
    /// - `KARTEI_STORE_PATH`
    /// - `KARTEI_SELECTION` (`first_due` | `random_due`)
    /// - `KARTEI_MIN_VOCABULARY`, `KARTEI_MIN_GRAMMAR`
    /// - `KARTEI_RATE_LIMIT_WINDOW_SECS`, `KARTEI_RATE_LIMIT_MAX`
    pub fn merge_env(mut self) -> KarteiResult<Self> {
        if let Ok(backend) = std::env::var("KARTEI_STORE_BACKEND") {
            self.store.backend = match backend.to_lowercase().as_str() {
                "json" => StoreBackend::Json,
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                other => {
                    return Err(KarteiError::Configuration(format!(
                        "unknown store backend '{}'",
                        other
                    )))
                }
            };
        }

        if let Ok(path) = std::env::var("KARTEI_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        if let Ok(selection) = std::env::var("KARTEI_SELECTION") {
            self.selection = match selection.to_lowercase().as_str() {
                "first_due" => SelectionPolicy::FirstDue,
                "random_due" => SelectionPolicy::RandomDue,
                other => {
                    return Err(KarteiError::Configuration(format!(
                        "unknown selection policy '{}'",
                        other
                    )))
                }
            };
        }

        if let Some(n) = env_number("KARTEI_MIN_VOCABULARY")? {
            self.practice.min_vocabulary = n as usize;
        }
        if let Some(n) = env_number("KARTEI_MIN_GRAMMAR")? {
            self.practice.min_grammar = n as usize;
        }
        if let Some(n) = env_number("KARTEI_RATE_LIMIT_WINDOW_SECS")? {
            self.rate_limit.window_secs = n.max(1);
        }
        if let Some(n) = env_number("KARTEI_RATE_LIMIT_MAX")? {
            self.rate_limit.max_requests = n;
        }

        Ok(self)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> KarteiConfigBuilder {
        KarteiConfigBuilder::default()
    }
}

fn env_number(key: &str) -> KarteiResult<Option<u64>> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| KarteiError::Configuration(format!("{} must be a number: {}", key, e))),
        _ => Ok(None),
    }
}

/// Builder for KarteiConfig.
#[derive(Default)]
pub struct KarteiConfigBuilder {
    config: KarteiConfig,
}

impl KarteiConfigBuilder {
    /// Set the store backend and path.
    pub fn store(mut self, backend: StoreBackend, path: impl Into<PathBuf>) -> Self {
        self.config.store = StoreConfig {
            backend,
            path: path.into(),
        };
        self
    }

    /// Set the selection policy.
    pub fn selection(mut self, policy: SelectionPolicy) -> Self {
        self.config.selection = policy;
        self
    }

    /// Set practice thresholds.
    pub fn practice(mut self, min_vocabulary: usize, min_grammar: usize) -> Self {
        self.config.practice = PracticeThresholds {
            min_vocabulary,
            min_grammar,
        };
        self
    }

    /// Set the per-learner rate limit.
    pub fn rate_limit(mut self, window_secs: u64, max_requests: u64) -> Self {
        self.config.rate_limit = RateLimitConfig {
            window_secs: window_secs.max(1),
            max_requests,
        };
        self
    }

    /// Build the configuration.
    pub fn build(self) -> KarteiConfig {
        self.config
    }
}
