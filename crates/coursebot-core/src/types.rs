// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared domain types used across the Coursebot workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// External chat identity of a user, as reported by the transport.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully collected customer contact details for receipt delivery.
///
/// Built incrementally by the purchase conversation and immutable once
/// assembled. All three fields are guaranteed non-empty: the email and
/// phone passed syntactic validation, and the name prompt rejects blank
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// A confirmed payment as reported by the external payment provider.
///
/// This is the input to entitlement recording; the durable counterpart
/// is [`PaymentRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub user_id: UserId,
    /// Chat display name (username), if the transport knows one.
    pub display_name: Option<String>,
    pub profile: CustomerProfile,
    /// Provider charge id, unique per payment.
    pub transaction_id: String,
    /// Amount in minor currency units (e.g. kopeks, cents).
    pub amount_minor: i64,
    pub currency: String,
}

/// Durable record of a completed course payment.
///
/// At most one record exists per user. Created exactly once at
/// confirmed-payment time and never mutated thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// UTC timestamp in RFC 3339 format, set by the store at insert time.
    pub paid_at: String,
    pub transaction_id: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// A persisted group-access invitation issued for a paid user.
///
/// At most one invitation exists per user; issuance is idempotent and
/// always returns the first-written token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessInvitation {
    pub user_id: UserId,
    /// Opaque provider-issued invite token (a chat invite link).
    pub invite_token: String,
    /// UTC timestamp in RFC 3339 format.
    pub issued_at: String,
}

/// The state of a purchase conversation, reported by the flow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum FlowState {
    /// No purchase conversation in progress.
    Idle,
    AwaitingEmail,
    AwaitingName,
    AwaitingPhone,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn flow_state_display_round_trips() {
        for state in [
            FlowState::Idle,
            FlowState::AwaitingEmail,
            FlowState::AwaitingName,
            FlowState::AwaitingPhone,
        ] {
            let s = state.to_string();
            assert_eq!(FlowState::from_str(&s).expect("should parse back"), state);
        }
    }

    #[test]
    fn user_id_serializes_as_integer() {
        let json = serde_json::to_string(&UserId(77)).expect("should serialize");
        assert_eq!(json, "77");
        let parsed: UserId = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(parsed, UserId(77));
    }
}
