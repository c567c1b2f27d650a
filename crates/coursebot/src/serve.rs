// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coursebot serve` command implementation.
//!
//! Validates the credentials the bot cannot run without, opens the
//! entitlement store, and hands control to the Telegram dispatcher
//! until the process is stopped.

use std::sync::Arc;

use coursebot_config::model::CoursebotConfig;
use coursebot_core::CoursebotError;
use coursebot_storage::EntitlementStore;
use tracing::info;

pub async fn run_serve(config: CoursebotConfig) -> Result<(), CoursebotError> {
    init_tracing(&config.bot.log_level);

    check_credentials(&config)?;

    let store = Arc::new(EntitlementStore::open(&config.storage).await?);
    info!(
        course = %config.course.title,
        database = %config.storage.database_path,
        "coursebot starting"
    );

    let result = coursebot_telegram::serve(&config, store.clone()).await;

    // Checkpoint the WAL even when the dispatcher exits with an error.
    store.close().await?;
    result
}

/// Credentials without which the bot cannot operate. Checked up front
/// so misconfiguration fails at startup, not on the first update.
fn check_credentials(config: &CoursebotConfig) -> Result<(), CoursebotError> {
    let mut missing = Vec::new();
    if config.bot.token.as_deref().unwrap_or("").is_empty() {
        missing.push("bot.token");
    }
    if config.payments.provider_token.as_deref().unwrap_or("").is_empty() {
        missing.push("payments.provider_token");
    }
    if config.group.students_chat_id.is_none() {
        missing.push("group.students_chat_id");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoursebotError::Config(format!(
            "missing required configuration: {}",
            missing.join(", ")
        )))
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coursebot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> CoursebotConfig {
        let mut config = CoursebotConfig::default();
        config.bot.token = Some("123456:token".to_string());
        config.payments.provider_token = Some("provider:token".to_string());
        config.group.students_chat_id = Some(-100_123);
        config
    }

    #[test]
    fn complete_credentials_pass() {
        assert!(check_credentials(&configured()).is_ok());
    }

    #[test]
    fn missing_credentials_are_all_reported() {
        let err = check_credentials(&CoursebotConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bot.token"));
        assert!(message.contains("payments.provider_token"));
        assert!(message.contains("group.students_chat_id"));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let mut config = configured();
        config.bot.token = Some(String::new());
        let err = check_credentials(&config).unwrap_err();
        assert!(err.to_string().contains("bot.token"));
    }
}
