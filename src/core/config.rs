//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.atlas/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_SUGGESTION_LIMIT};
use crate::core::debounce::DEFAULT_DEBOUNCE;
use crate::core::session::DEFAULT_LOGIN_LATENCY;
use crate::core::storage::default_storage_path;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub login_latency_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub suggestion_limit: Option<usize>,
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Absolute, or relative to `~/.atlas/`.
    pub path: Option<String>,
}

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub suggestion_limit: usize,
    pub debounce: Duration,
    pub login_latency: Duration,
    /// `None` when no home directory could be found; callers fall back to memory.
    pub storage_path: Option<PathBuf>,
    pub log_level: LevelFilter,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.atlas/`.
pub fn atlas_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".atlas"))
}

/// Returns the path to `~/.atlas/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    atlas_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.atlas/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AtlasConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AtlasConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AtlasConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AtlasConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AtlasConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AtlasConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Atlas Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"
# login_latency_ms = 500             # Simulated sign-in delay

# [api]
# base_url = "https://restcountries.com/v3.1"   # Or set ATLAS_API_BASE_URL
# suggestion_limit = 5
# debounce_ms = 300                  # Type-ahead quiet period before searching

# [storage]
# path = "storage.json"              # Relative to ~/.atlas/, or set ATLAS_STORAGE_PATH
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_api_url` is from the `--api-url` flag (None = not specified).
pub fn resolve(config: &AtlasConfig, cli_api_url: Option<&str>) -> ResolvedConfig {
    // API base URL: CLI → env → config → default
    let api_base_url = cli_api_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("ATLAS_API_BASE_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Storage path: env → config (relative to ~/.atlas/) → default
    let storage_path = std::env::var("ATLAS_STORAGE_PATH")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            config.storage.path.as_ref().map(|p| {
                let p = PathBuf::from(p);
                match atlas_dir() {
                    Some(dir) if p.is_relative() => dir.join(p),
                    _ => p,
                }
            })
        })
        .or_else(default_storage_path);

    ResolvedConfig {
        api_base_url,
        suggestion_limit: config
            .api
            .suggestion_limit
            .unwrap_or(DEFAULT_SUGGESTION_LIMIT),
        debounce: config
            .api
            .debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE),
        login_latency: config
            .general
            .login_latency_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOGIN_LATENCY),
        storage_path,
        log_level: resolve_log_level(config),
    }
}

fn resolve_log_level(config: &AtlasConfig) -> LevelFilter {
    match config.general.log_level.as_deref() {
        None => DEFAULT_LOG_LEVEL,
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AtlasConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = AtlasConfig::default();
        let resolved = resolve(&config, Some(DEFAULT_BASE_URL));
        assert_eq!(resolved.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(resolved.debounce, Duration::from_millis(300));
        assert_eq!(resolved.login_latency, Duration::from_millis(500));
        assert_eq!(resolved.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = AtlasConfig {
            general: GeneralConfig {
                log_level: Some("debug".to_string()),
                login_latency_ms: Some(0),
            },
            api: ApiConfig {
                base_url: None,
                suggestion_limit: Some(8),
                debounce_ms: Some(150),
            },
            storage: StorageConfig {
                path: Some("/tmp/atlas-test/storage.json".to_string()),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.suggestion_limit, 8);
        assert_eq!(resolved.debounce, Duration::from_millis(150));
        assert_eq!(resolved.login_latency, Duration::ZERO);
        assert_eq!(resolved.log_level, LevelFilter::Debug);
        if std::env::var("ATLAS_STORAGE_PATH").is_err() {
            assert_eq!(
                resolved.storage_path,
                Some(PathBuf::from("/tmp/atlas-test/storage.json"))
            );
        }
    }

    #[test]
    fn test_resolve_cli_api_url_wins() {
        let config = AtlasConfig {
            api: ApiConfig {
                base_url: Some("http://config.example".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://cli.example"));
        assert_eq!(resolved.api_base_url, "http://cli.example");
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = AtlasConfig {
            general: GeneralConfig {
                log_level: Some("chatty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_log_level(&config), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
log_level = "warn"
login_latency_ms = 250

[api]
base_url = "http://localhost:8080/v3.1"
suggestion_limit = 3
debounce_ms = 200

[storage]
path = "custom.json"
"#;
        let config: AtlasConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("warn"));
        assert_eq!(config.general.login_latency_ms, Some(250));
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("http://localhost:8080/v3.1")
        );
        assert_eq!(config.api.suggestion_limit, Some(3));
        assert_eq!(config.storage.path.as_deref(), Some("custom.json"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[api]
debounce_ms = 100
"#;
        let config: AtlasConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.debounce_ms, Some(100));
        assert!(config.api.base_url.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.api.base_url.is_none());
        assert!(path.exists());

        // The generated file is all comments, so it parses back to defaults
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.general.log_level.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
