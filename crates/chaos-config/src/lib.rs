//! Application configuration for the chaos background.
//!
//! The config file is TOML. It picks a [`Preset`] and may override any field
//! parameter in a `[field]` table; overrides are layered key by key on top of
//! the preset, so a file only needs to name what it changes:
//!
//! ```toml
//! preset = "chaos"
//! seed = 7
//! fps = 30
//!
//! [field.background]
//! color = "#203040"
//!
//! [field.noise]
//! mode = "every-frame"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chaos_core::{FieldConfig, Preset};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHAOS_CONFIG";

const DEFAULT_FPS: u32 = 60;
const DEFAULT_PIXEL_SIZE: f64 = 4.0;
/// Accepted `pixel_size` range; values outside are clamped.
const PIXEL_SIZE_RANGE: (f64, f64) = (0.5, 64.0);

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid [field] overrides: {0}")]
    Field(#[from] toml::de::Error),
    #[error("failed to encode preset {preset}: {source}")]
    Preset {
        preset: Preset,
        source: toml::ser::Error,
    },
}

/// Contents of the config file as written by the user.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    preset: Preset,
    seed: Option<u64>,
    fps: Option<u32>,
    pixel_size: Option<f64>,
    log_level: Option<String>,
    field: toml::Table,
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Preset the field parameters start from.
    pub preset: Preset,
    /// Fixed random seed; entropy is used when absent.
    pub seed: Option<u64>,
    /// Target frames per second.
    pub fps: u32,
    /// Logical pixels covered by one device pixel (half a terminal cell).
    pub pixel_size: f64,
    /// `tracing` filter directive; logging is off when absent.
    pub log_level: Option<String>,
    /// Field parameters: the preset with the user's overrides applied.
    pub field: FieldConfig,
    overrides: toml::Table,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            seed: None,
            fps: DEFAULT_FPS,
            pixel_size: DEFAULT_PIXEL_SIZE,
            log_level: None,
            field: FieldConfig::default(),
            overrides: toml::Table::new(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::from_raw(raw).map_err(|e| match e {
            ConfigError::Field(source) => source,
            other => <toml::de::Error as serde::de::Error>::custom(other),
        })
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let field = layer(raw.preset, &raw.field)?;
        Ok(Self {
            preset: raw.preset,
            seed: raw.seed,
            fps: raw.fps.unwrap_or(DEFAULT_FPS).max(1),
            pixel_size: raw
                .pixel_size
                .filter(|p| p.is_finite() && *p > 0.0)
                .map_or(DEFAULT_PIXEL_SIZE, |p| {
                    p.clamp(PIXEL_SIZE_RANGE.0, PIXEL_SIZE_RANGE.1)
                }),
            log_level: raw.log_level,
            field,
            overrides: raw.field,
        })
    }

    /// Switch to another preset, keeping the user's overrides on top of it.
    pub fn with_preset(&self, preset: Preset) -> Result<Self, ConfigError> {
        Ok(Self {
            preset,
            field: layer(preset, &self.overrides)?,
            ..self.clone()
        })
    }

    /// Time budget for one frame.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Device pixels per logical pixel.
    pub fn pixel_ratio(&self) -> f64 {
        1.0 / self.pixel_size
    }
}

/// Apply `overrides` on top of the parameters of `preset`.
fn layer(preset: Preset, overrides: &toml::Table) -> Result<FieldConfig, ConfigError> {
    let base = preset.config();
    if overrides.is_empty() {
        return Ok(base);
    }
    let encoded =
        toml::Value::try_from(&base).map_err(|source| ConfigError::Preset { preset, source })?;
    let toml::Value::Table(mut table) = encoded else {
        return Ok(base);
    };
    merge(&mut table, overrides);
    Ok(toml::Value::Table(table).try_into::<FieldConfig>()?)
}

/// Recursively merge `overrides` into `base`; leaves replace, tables merge.
fn merge(base: &mut toml::Table, overrides: &toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge(existing, nested)
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Location of the config file: `$CHAOS_CONFIG`, else the platform config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "chaos").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from [`config_path`], falling back to defaults when no file exists.
pub fn load() -> Result<AppConfig, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::debug!("no config directory available, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load configuration from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let raw: RawConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let config = AppConfig::from_raw(raw)?;
    tracing::debug!(path = %path.display(), preset = %config.preset, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::{BackgroundMode, NoiseMode, Rgb, TraceShapeMode};

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.field, FieldConfig::default());
    }

    #[test]
    fn test_overrides_layer_over_preset() {
        let config = AppConfig::from_toml(
            r##"
            preset = "portfolio"
            seed = 42
            fps = 30

            [field.background]
            color = "#000000"

            [field.noise]
            enabled = true
            mode = "every-frame"
            "##,
        )
        .unwrap();

        assert_eq!(config.preset, Preset::Portfolio);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
        assert_eq!(config.field.background.color, Rgb::BLACK);
        // Untouched keys in an overridden section keep the preset's value.
        assert_eq!(config.field.background.mode, BackgroundMode::Opaque);
        assert_eq!(config.field.trail.shape, TraceShapeMode::Direct);
        assert!(config.field.noise.enabled);
        assert_eq!(config.field.noise.mode, NoiseMode::EveryFrame);
    }

    #[test]
    fn test_with_preset_keeps_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [field.connection]
            distance = 90.0
            "#,
        )
        .unwrap();
        assert_eq!(config.field.connection.distance, 90.0);

        let switched = config.with_preset(Preset::Portfolio).unwrap();
        assert_eq!(switched.preset, Preset::Portfolio);
        assert_eq!(switched.field.connection.distance, 90.0);
        assert_eq!(switched.field.node.density, 15_000.0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_toml("fps = 0\npixel_size = -1.0").unwrap();
        assert_eq!(config.fps, 1);
        assert_eq!(config.pixel_size, DEFAULT_PIXEL_SIZE);
    }

    #[test]
    fn test_pixel_size_is_bounded() {
        let config = AppConfig::from_toml("pixel_size = inf").unwrap();
        assert_eq!(config.pixel_size, DEFAULT_PIXEL_SIZE);
        let config = AppConfig::from_toml("pixel_size = nan").unwrap();
        assert_eq!(config.pixel_size, DEFAULT_PIXEL_SIZE);

        let config = AppConfig::from_toml("pixel_size = 1e6").unwrap();
        assert_eq!(config.pixel_size, PIXEL_SIZE_RANGE.1);
        let config = AppConfig::from_toml("pixel_size = 0.001").unwrap();
        assert_eq!(config.pixel_size, PIXEL_SIZE_RANGE.0);
        assert_eq!(config.pixel_ratio(), 2.0);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let result = AppConfig::from_toml(
            r#"
            [field.trail]
            color = "nope"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "seed = 3\n[field.node]\nmin_count = 12\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.field.node.min_count, 12);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "preset = \"nonexistent\"").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
