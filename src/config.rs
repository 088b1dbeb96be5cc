use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::Direction;

const APP_DIR_NAME: &str = "torus-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Fastest accepted tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Slowest accepted tick interval in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;

/// Default field side length.
pub const DEFAULT_FIELD_DIM: u16 = 20;

/// Smallest field that fits the snake plus the initial food.
pub const MIN_FIELD_DIM: u16 = 5;

/// Largest field the terminal frontend is expected to draw.
pub const MAX_FIELD_DIM: u16 = 100;

/// Food items placed when the game starts.
pub const INITIAL_FOOD_COUNT: usize = 3;

/// Direction the snake travels before any input arrives.
pub const DEFAULT_DIRECTION: Direction = Direction::Left;

/// Engine construction options.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Milliseconds between movement ticks.
    pub speed: u64,
    /// Side length of the square field.
    pub field_dim: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_TICK_INTERVAL_MS,
            field_dim: DEFAULT_FIELD_DIM,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new(speed: u64, field_dim: u16) -> Self {
        Self { speed, field_dim }
    }

    /// Checks both options against their accepted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.speed) {
            return Err(ConfigError::SpeedOutOfRange {
                value: self.speed,
                min: MIN_TICK_INTERVAL_MS,
                max: MAX_TICK_INTERVAL_MS,
            });
        }

        if !(MIN_FIELD_DIM..=MAX_FIELD_DIM).contains(&self.field_dim) {
            return Err(ConfigError::FieldDimOutOfRange {
                value: self.field_dim,
                min: MIN_FIELD_DIM,
                max: MAX_FIELD_DIM,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed)
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads the config file from its default location.
///
/// Returns the defaults when the file does not exist yet.
pub fn load_config() -> Result<GameConfig, ConfigError> {
    load_config_from_path(&config_path())
}

/// Loads and validates a config file.
///
/// A missing file yields [`GameConfig::default`]; an unreadable or malformed
/// file is an error so the caller can report it before the terminal switches
/// to raw mode.
pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(GameConfig::default()),
        Err(e) => return Err(e.into()),
    };

    let config: GameConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{DEFAULT_FIELD_DIM, DEFAULT_TICK_INTERVAL_MS, GameConfig, load_config_from_path};
    use crate::error::ConfigError;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!(config.speed, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(config.field_dim, DEFAULT_FIELD_DIM);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            GameConfig::new(0, 20).validate(),
            Err(ConfigError::SpeedOutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            GameConfig::new(200, 4).validate(),
            Err(ConfigError::FieldDimOutOfRange { value: 4, .. })
        ));
        assert!(GameConfig::new(200, 5).validate().is_ok());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let path = unique_test_path("missing");
        let loaded = load_config_from_path(&path).expect("missing file should return defaults");
        assert_eq!(loaded, GameConfig::default());
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let path = unique_test_path("partial");
        write_test_file(&path, r#"{ "speed": 120 }"#);

        let loaded = load_config_from_path(&path).expect("partial file should load");
        assert_eq!(loaded, GameConfig::new(120, DEFAULT_FIELD_DIM));

        cleanup_test_path(&path);
    }

    #[test]
    fn unknown_options_are_rejected() {
        let path = unique_test_path("unknown");
        write_test_file(&path, r#"{ "speed": 120, "walls": true }"#);

        assert!(matches!(
            load_config_from_path(&path),
            Err(ConfigError::Parse(_))
        ));

        cleanup_test_path(&path);
    }

    #[test]
    fn invalid_values_in_file_are_rejected() {
        let path = unique_test_path("invalid");
        write_test_file(&path, r#"{ "field_dim": 2 }"#);

        assert!(matches!(
            load_config_from_path(&path),
            Err(ConfigError::FieldDimOutOfRange { value: 2, .. })
        ));

        cleanup_test_path(&path);
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("torus-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
