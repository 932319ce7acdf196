//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$ATTACHBOX_CONFIG` (environment variable)
//! 2. `~/.config/attachbox/config.toml` (Linux/macOS)
//!    `%APPDATA%\attachbox\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Largest number of rows a chest-style container can have.
pub const MAX_BOX_ROWS: u32 = 6;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Attachment box settings.
    pub boxes: BoxesConfig,
    /// Title overrides for the two box kinds.
    pub titles: TitlesConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Language code ("en", "ja"). Detected from the environment when unset.
    pub lang: Option<String>,
}

/// Attachment box settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxesConfig {
    /// Rows of 9 slots in an edit-mode box.
    pub rows: u32,
    /// Drop an attachment box from the cache once its last viewer synced it.
    pub evict_on_close: bool,
    /// Keep the viewer's active box after a successful sync.
    pub retain_view_after_sync: bool,
}

/// Title overrides. `%number` in `attachment` is replaced by the mail index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlesConfig {
    pub editmode: Option<String>,
    pub attachment: Option<String>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
            lang: None,
        }
    }
}

impl Default for BoxesConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            evict_on_close: true,
            retain_view_after_sync: false,
        }
    }
}

impl BoxesConfig {
    /// Configured rows clamped to what the host can display.
    pub fn effective_rows(&self) -> u32 {
        self.rows.clamp(1, MAX_BOX_ROWS)
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    match config_file_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Config::default(),
    }
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "Loaded config");
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config, using defaults"
                );
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read config file, using defaults"
            );
            Config::default()
        }
    }
}

/// Save configuration to an explicit path, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("ATTACHBOX_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("attachbox").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("attachbox")
}
