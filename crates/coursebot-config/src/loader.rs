// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./coursebot.toml` > `~/.config/coursebot/coursebot.toml`
//! > `/etc/coursebot/coursebot.toml` with environment variable overrides via
//! the `COURSEBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CoursebotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/coursebot/coursebot.toml` (system-wide)
/// 3. `~/.config/coursebot/coursebot.toml` (user XDG config)
/// 4. `./coursebot.toml` (local directory)
/// 5. `COURSEBOT_*` environment variables
pub fn load_config() -> Result<CoursebotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CoursebotConfig::default()))
        .merge(Toml::file("/etc/coursebot/coursebot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("coursebot/coursebot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("coursebot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and for loading inline config content.
pub fn load_config_from_str(toml_content: &str) -> Result<CoursebotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CoursebotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CoursebotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CoursebotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `COURSEBOT_PAYMENTS_PROVIDER_TOKEN`
/// must map to `payments.provider_token`, not `payments.provider.token`.
fn env_provider() -> Env {
    Env::prefixed("COURSEBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: COURSEBOT_BOT_TOKEN -> "bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("course_", "course.", 1)
            .replacen("payments_", "payments.", 1)
            .replacen("group_", "group.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("media_", "media.", 1);
        mapped.into()
    })
}
