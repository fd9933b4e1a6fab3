//! Configuration validation rules.

use super::schema::Config;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level must be one of {} (got '{}')",
            LOG_LEVELS.join(", "),
            config.logging.level
        ));
    }
    let format = config.logging.format.trim().to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(format!(
            "logging.format must be one of {} (got '{}')",
            LOG_FORMATS.join(", "),
            config.logging.format
        ));
    }
    if config.logging.dir.trim().is_empty() {
        errors.push("logging.dir must not be empty".to_string());
    }
    if config.logging.retention_days == 0 {
        errors.push("logging.retention_days must be > 0".to_string());
    }
    for (module, level) in &config.logging.overrides {
        if !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "logging.overrides.{} has invalid level '{}'",
                module, level
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
