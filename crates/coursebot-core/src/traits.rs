// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider traits implemented by the transport layer.
//!
//! The entitlement logic depends on these seams instead of concrete
//! transport types, so it can be exercised in tests with mocks.

use async_trait::async_trait;

use crate::error::CoursebotError;
use crate::types::UserId;

/// Issues single-use invitations to the restricted students group.
///
/// Implementations talk to the external group-membership provider. The
/// core treats issuance as "create"; idempotent reuse is handled by the
/// entitlement store, not by the provider.
#[async_trait]
pub trait GroupInviteProvider: Send + Sync {
    /// Requests a fresh one-time invitation token for the given user.
    async fn create_invite(&self, user_id: UserId) -> Result<String, CoursebotError>;
}
