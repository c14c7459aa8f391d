//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directories.working_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "directories.working_dir must not be empty".into(),
            ));
        }
        if self.resize.width_percent == 0 {
            return Err(ConfigError::ValidationError(
                "resize.width_percent must be > 0".into(),
            ));
        }
        if self.resize.height_percent == Some(0) {
            return Err(ConfigError::ValidationError(
                "resize.height_percent must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be one of {}",
                LOG_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}
