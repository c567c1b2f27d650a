// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Coursebot workspace.

use thiserror::Error;

use crate::types::UserId;

/// The primary error type used across all Coursebot crates.
///
/// Validation failures (malformed email or phone) are deliberately NOT
/// represented here: the validators return plain booleans and the
/// conversation layer recovers locally by re-prompting.
#[derive(Debug, Error)]
pub enum CoursebotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat transport errors (send failure, malformed update, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External provider errors (invoice gateway, group-invitation issuance).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A second payment was reported for a user who is already entitled.
    ///
    /// Repeat purchases are rejected rather than silently overwriting the
    /// first payment's audit trail. Redelivery of the same transaction is
    /// treated as an idempotent no-op upstream and never produces this.
    #[error("duplicate payment for user {user_id}")]
    DuplicatePayment { user_id: UserId },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
