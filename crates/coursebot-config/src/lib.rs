// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Coursebot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment
//! variable overrides, and diagnostic error rendering with typo
//! suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use coursebot_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Selling: {}", config.course.title);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::CoursebotConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to miette diagnostics with typo suggestions
///
/// Returns either a valid `CoursebotConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<CoursebotConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<CoursebotConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_inline_config_loads() {
        let config = load_and_validate_str(
            r#"
[bot]
token = "123:abc"

[course]
title = "Dog training for instructors"
price_minor = 1000000

[payments]
provider_token = "prov:xyz"

[group]
students_chat_id = -1001234
"#,
        )
        .expect("config should load");
        assert_eq!(config.course.price_minor, 1_000_000);
        assert_eq!(config.group.students_chat_id, Some(-1001234));
    }

    #[test]
    fn semantic_errors_surface_as_diagnostics() {
        let errors = load_and_validate_str(
            r#"
[course]
price_minor = -5
"#,
        )
        .unwrap_err();
        assert!(!errors.is_empty());
    }
}
