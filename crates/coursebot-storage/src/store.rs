// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-level entitlement store over the typed query modules.

use coursebot_config::model::StorageConfig;
use coursebot_core::{AccessInvitation, CoursebotError, PaymentConfirmation, PaymentRecord, UserId};
use tracing::debug;

use crate::database::Database;
use crate::queries;

/// Durable record of completed payments and issued access invitations.
///
/// Safe for concurrent use across users: every operation goes through
/// the single writer thread, and the insert-if-absent invitation path is
/// atomic within one call, so racing issuance attempts for the same user
/// resolve to the first-written token.
pub struct EntitlementStore {
    db: Database,
}

impl EntitlementStore {
    /// Open the store at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, CoursebotError> {
        let db = Database::open_with_wal(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "entitlement store opened");
        Ok(Self { db })
    }

    /// Open the store at an explicit path with default PRAGMAs (tests, tools).
    pub async fn open_at(path: &str) -> Result<Self, CoursebotError> {
        let db = Database::open(path).await?;
        Ok(Self { db })
    }

    /// Record a confirmed payment.
    ///
    /// Rejects a second purchase by an already-entitled user with
    /// [`CoursebotError::DuplicatePayment`]; redelivery of the same
    /// transaction id succeeds without touching the stored row.
    pub async fn record_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<(), CoursebotError> {
        queries::payments::record_payment(&self.db, confirmation).await
    }

    /// Get the payment record for a user, if any.
    pub async fn payment(&self, user_id: UserId) -> Result<Option<PaymentRecord>, CoursebotError> {
        queries::payments::get_payment(&self.db, user_id).await
    }

    /// Check whether a user has completed payment.
    pub async fn has_paid(&self, user_id: UserId) -> Result<bool, CoursebotError> {
        queries::payments::has_paid(&self.db, user_id).await
    }

    /// Get the stored invitation for a user, if any.
    pub async fn invite(&self, user_id: UserId) -> Result<Option<AccessInvitation>, CoursebotError> {
        queries::invites::get_invite(&self.db, user_id).await
    }

    /// Store an invitation unless one exists; returns the stored row
    /// (the first-written token under concurrent issuance).
    pub async fn insert_invite_if_absent(
        &self,
        user_id: UserId,
        token: &str,
    ) -> Result<AccessInvitation, CoursebotError> {
        queries::invites::insert_invite_if_absent(&self.db, user_id, token).await
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), CoursebotError> {
        self.db.close().await
    }
}
