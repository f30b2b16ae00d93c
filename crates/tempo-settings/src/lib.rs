//! # tempo-settings
//!
//! Configuration management with layered sources for the tempo client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`TempoSettings::default()`]
//! 2. **User file** — `~/.tempo/settings.json` (merged over defaults)
//! 3. **Environment variables** — `TEMPO_*` overrides (highest priority)
//!
//! The global singleton is reloadable: embedders that rewrite the settings
//! file call [`reload_settings_from_path`] to swap the cached value so all
//! subsequent [`get_settings`] calls return fresh data.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings load errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON for the expected shape.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Replay playback settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplaySettings {
    /// Delay between autoplay steps, in milliseconds.
    pub playback_interval_ms: u64,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            playback_interval_ms: 1000,
        }
    }
}

/// Chat buffer settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    /// Maximum retained chat entries; oldest evicted first.
    pub buffer_cap: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { buffer_cap: 500 }
    }
}

/// Transport endpoint settings (consumed by the embedding transport
/// implementation, not by the core).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportSettings {
    /// Server endpoint URL.
    pub server_url: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            server_url: "wss://localhost:9000".into(),
        }
    }
}

/// Root settings document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TempoSettings {
    /// Replay playback section.
    pub replay: ReplaySettings,
    /// Chat buffer section.
    pub chat: ChatSettings,
    /// Transport section.
    pub transport: TransportSettings,
}

/// Default on-disk location: `~/.tempo/settings.json`.
#[must_use]
pub fn settings_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".tempo")
        .join("settings.json")
}

/// Load settings from the default path with env overrides applied.
pub fn load_settings() -> Result<TempoSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env overrides applied.
///
/// A missing file is not an error; defaults are used for that layer.
pub fn load_settings_from_path(path: &Path) -> Result<TempoSettings> {
    let mut settings = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)?
    } else {
        TempoSettings::default()
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn apply_env_overrides(settings: &mut TempoSettings) {
    if let Some(v) = env_parse::<u64>("TEMPO_PLAYBACK_INTERVAL_MS") {
        settings.replay.playback_interval_ms = v;
    }
    if let Some(v) = env_parse::<usize>("TEMPO_CHAT_BUFFER_CAP") {
        settings.chat.buffer_cap = v;
    }
    if let Ok(v) = std::env::var("TEMPO_SERVER_URL") {
        settings.transport.server_url = v;
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparseable env override");
            None
        }
    }
}

/// Global settings singleton.
///
/// Uses `RwLock<Option<Arc<TempoSettings>>>` instead of `OnceLock` so the
/// cached value can be swapped after a reload. Reads are cheap (shared
/// lock + `Arc::clone`); writes only happen on reload.
static SETTINGS: RwLock<Option<Arc<TempoSettings>>> = RwLock::new(None);

/// Get the global settings instance.
///
/// On first call, loads from disk with env overrides; afterwards returns
/// the cached value. If loading fails, returns compiled defaults.
pub fn get_settings() -> Arc<TempoSettings> {
    {
        let guard = SETTINGS.read().expect("settings lock poisoned");
        if let Some(ref s) = *guard {
            return Arc::clone(s);
        }
    }

    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    // Double-check after acquiring the write lock.
    if let Some(ref s) = *guard {
        return Arc::clone(s);
    }

    let settings = Arc::new(match load_settings() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            TempoSettings::default()
        }
    });
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Initialize the global settings with a specific value.
///
/// Replaces any previously cached settings. Useful for tests and embedders
/// that resolve configuration themselves.
pub fn init_settings(settings: TempoSettings) {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(Arc::new(settings));
}

/// Reload settings from a specific file path, swapping the global cache.
pub fn reload_settings_from_path(path: &Path) {
    let new = Arc::new(match load_settings_from_path(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, ?path, "failed to reload settings, falling back to defaults");
            TempoSettings::default()
        }
    });
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(new);
    tracing::info!(?path, "settings reloaded from disk");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
