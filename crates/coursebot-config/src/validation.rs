// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive prices and well-formed currency codes.

use crate::diagnostic::ConfigError;
use crate::model::CoursebotConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CoursebotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.bot.log_level
            ),
        });
    }

    if config.course.title.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "course.title must not be empty".to_string(),
        });
    }

    if config.course.price_minor <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "course.price_minor must be positive, got {}",
                config.course.price_minor
            ),
        });
    }

    let currency = config.course.currency.as_str();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "course.currency must be a three-letter ISO 4217 code, got `{currency}`"
            ),
        });
    }

    if !(1..=6).contains(&config.course.tax_system_code) {
        errors.push(ConfigError::Validation {
            message: format!(
                "course.tax_system_code must be between 1 and 6, got {}",
                config.course.tax_system_code
            ),
        });
    }

    if !(1..=6).contains(&config.course.vat_code) {
        errors.push(ConfigError::Validation {
            message: format!(
                "course.vat_code must be between 1 and 6, got {}",
                config.course.vat_code
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = CoursebotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_price_fails_validation() {
        let mut config = CoursebotConfig::default();
        config.course.price_minor = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("price_minor"))
        ));
    }

    #[test]
    fn lowercase_currency_fails_validation() {
        let mut config = CoursebotConfig::default();
        config.course.currency = "rub".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("currency"))
        ));
    }

    #[test]
    fn out_of_range_vat_code_fails_validation() {
        let mut config = CoursebotConfig::default();
        config.course.vat_code = 9;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("vat_code"))
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = CoursebotConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = CoursebotConfig::default();
        config.bot.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = CoursebotConfig::default();
        config.course.price_minor = -1;
        config.course.currency = "x".to_string();
        config.storage.database_path = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
