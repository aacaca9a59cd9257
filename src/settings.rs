//! Game settings
//!
//! Native builds read a JSON file, web builds read the page query string.
//! Missing fields take their defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::BACKGROUND_TILE_HEIGHT;
use crate::host::Color;

/// Environment variable naming the settings file (native only)
pub const SETTINGS_ENV: &str = "ENDLESS_RUNNER_SETTINGS";
/// Settings file looked up in the working directory when the variable is unset
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Errors while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid query parameter {key}={value}")]
    InvalidQuery { key: String, value: String },

    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),

    #[error("Value out of range: {field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

/// Colors used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub player: Color,
    pub obstacle: Color,
    /// Alternating stripe tones of the background tile
    pub background: [Color; 2],
    /// Screen clear color
    pub clear: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            player: Color::CYAN,
            obstacle: Color::RED,
            background: [
                Color::rgba(0.08, 0.09, 0.14, 1.0),
                Color::rgba(0.12, 0.13, 0.2, 1.0),
            ],
            clear: Color::BLACK,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; time-based when unset
    pub seed: Option<u64>,
    /// off, error, warn, info, debug or trace
    pub log_level: String,
    /// Upper bound on the frame delta the host reports (seconds)
    pub max_frame_dt: f32,
    /// Height of one background tile (pixels)
    pub background_tile_height: f32,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            log_level: "info".to_string(),
            max_frame_dt: 0.1,
            background_tile_height: BACKGROUND_TILE_HEIGHT,
            palette: Palette::default(),
        }
    }
}

impl Settings {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a JSON settings file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Defaults overridden by `seed` and `log` from a raw URL query string
    /// (with or without the leading `?`). Values are taken verbatim.
    pub fn from_query(query: &str) -> Result<Self, SettingsError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_params(
            query
                .split('&')
                .filter(|p| !p.is_empty())
                .map(|pair| pair.split_once('=').unwrap_or((pair, ""))),
        )
    }

    /// Defaults overridden by already-decoded `seed` and `log` parameters.
    /// Unrelated keys are ignored.
    pub fn from_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Result<Self, SettingsError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();

        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "seed" => {
                    let seed = value.parse().map_err(|_| SettingsError::InvalidQuery {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
                    settings.seed = Some(seed);
                }
                "log" => settings.log_level = value.to_string(),
                _ => {}
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.log_level_filter()?;
        if !(self.max_frame_dt > 0.0) {
            return Err(SettingsError::NotPositive {
                field: "max_frame_dt",
                value: self.max_frame_dt,
            });
        }
        if !(self.background_tile_height > 0.0) {
            return Err(SettingsError::NotPositive {
                field: "background_tile_height",
                value: self.background_tile_height,
            });
        }
        Ok(())
    }

    /// Parsed log level
    pub fn log_level_filter(&self) -> Result<log::LevelFilter, SettingsError> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| SettingsError::UnknownLogLevel(self.log_level.clone()))
    }

    /// Configured seed, or `fallback` when none was given
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Clamp a host-measured frame delta
    pub fn clamp_frame_dt(&self, dt: f32) -> f32 {
        dt.max(0.0).min(self.max_frame_dt)
    }

    /// Load from the file named by `ENDLESS_RUNNER_SETTINGS`, else from
    /// `settings.json` if present, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, SettingsError> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let path = Path::new(DEFAULT_SETTINGS_FILE);
        if path.exists() {
            return Self::from_file(path);
        }
        Ok(Self::default())
    }

    /// Load from the page URL query string
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, SettingsError> {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params = web_sys::UrlSearchParams::new_with_str(&query).map_err(|_| {
            SettingsError::InvalidQuery {
                key: "search".to_string(),
                value: query.clone(),
            }
        })?;
        Self::from_params(
            ["seed", "log"]
                .into_iter()
                .filter_map(|key| params.get(key).map(|value| (key, value))),
        )
    }
}
