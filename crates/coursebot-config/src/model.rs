// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Coursebot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Coursebot configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the credentials required to actually serve (`bot.token`,
/// `payments.provider_token`, `group.students_chat_id`) are checked at
/// `serve` time, not at load time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CoursebotConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// The course being sold: title, description, price, fiscal codes.
    #[serde(default)]
    pub course: CourseConfig,

    /// Payment provider settings.
    #[serde(default)]
    pub payments: PaymentsConfig,

    /// Students group settings.
    #[serde(default)]
    pub group: GroupConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Media asset paths.
    #[serde(default)]
    pub media: MediaConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Chat transport bot token. `None` makes `serve` fail at startup.
    #[serde(default)]
    pub token: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The single course product on sale.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourseConfig {
    /// Course title, shown in menus and on the invoice.
    #[serde(default = "default_course_title")]
    pub title: String,

    /// Course description, shown in the about section and on the invoice.
    #[serde(default)]
    pub description: String,

    /// Lecturer bio, shown by the about-lecturer menu entry.
    #[serde(default)]
    pub lecturer_bio: String,

    /// Price in minor currency units (kopeks, cents).
    #[serde(default = "default_price_minor")]
    pub price_minor: i64,

    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Fiscal tax system code for the receipt.
    #[serde(default = "default_tax_system_code")]
    pub tax_system_code: u8,

    /// Fiscal VAT code for the receipt line item.
    #[serde(default = "default_vat_code")]
    pub vat_code: u8,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            title: default_course_title(),
            description: String::new(),
            lecturer_bio: String::new(),
            price_minor: default_price_minor(),
            currency: default_currency(),
            tax_system_code: default_tax_system_code(),
            vat_code: default_vat_code(),
        }
    }
}

fn default_course_title() -> String {
    "Online course".to_string()
}

fn default_price_minor() -> i64 {
    1_000_000
}

fn default_currency() -> String {
    "RUB".to_string()
}

fn default_tax_system_code() -> u8 {
    6
}

fn default_vat_code() -> u8 {
    1
}

/// Payment provider configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentsConfig {
    /// Invoice provider token. `None` makes `serve` fail at startup.
    #[serde(default)]
    pub provider_token: Option<String>,
}

/// Students group configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Chat id of the private students group invitations are issued for.
    /// `None` makes `serve` fail at startup.
    #[serde(default)]
    pub students_chat_id: Option<i64>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("coursebot").join("coursebot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("coursebot.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Media asset configuration.
///
/// Missing files degrade to text-only messages rather than failing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Cover image attached to welcome messages.
    #[serde(default)]
    pub cover_image: Option<String>,

    /// Lecturer photo attached to the about-lecturer message.
    #[serde(default)]
    pub lecturer_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = CoursebotConfig::default();
        assert!(config.bot.token.is_none());
        assert_eq!(config.bot.log_level, "info");
        assert_eq!(config.course.currency, "RUB");
        assert_eq!(config.course.price_minor, 1_000_000);
        assert!(config.storage.wal_mode);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[bot]
token = "t"
unknown_field = true
"#;
        assert!(toml::from_str::<CoursebotConfig>(toml_str).is_err());
    }

    #[test]
    fn course_section_deserializes() {
        let toml_str = r#"
[course]
title = "Dog training for instructors"
price_minor = 1000000
currency = "RUB"
tax_system_code = 6
vat_code = 1
"#;
        let config: CoursebotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.course.title, "Dog training for instructors");
        assert_eq!(config.course.price_minor, 1_000_000);
        assert_eq!(config.course.vat_code, 1);
    }
}
