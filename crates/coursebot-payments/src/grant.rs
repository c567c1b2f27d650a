// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access grant resolution: payment recording and invitation issuance.
//!
//! The resolver owns the policy around entitlements: a confirmed payment
//! is recorded durably before any invitation work, issuance is idempotent
//! per user, and a failing invite provider degrades to "entitled, no link
//! yet" rather than losing the payment.

use std::sync::Arc;

use coursebot_core::{AccessInvitation, CoursebotError, GroupInviteProvider, PaymentConfirmation, UserId};
use coursebot_storage::EntitlementStore;
use tracing::{error, info, warn};

/// A user's current entitlement, as seen by menu rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementStatus {
    pub has_paid: bool,
    pub invite: Option<AccessInvitation>,
}

/// The outcome of processing a confirmed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment recorded; invitation issued or reused.
    Granted(AccessInvitation),
    /// Payment recorded but the invite provider failed; the user can
    /// retrieve the link later through the access menu.
    GrantedWithoutInvite,
    /// The user already holds an entitlement under a different
    /// transaction; the original record is untouched.
    AlreadyEntitled,
}

/// Resolves payments into durable entitlements and group invitations.
///
/// Dependencies are injected at construction; the resolver holds no
/// transport state of its own.
pub struct AccessGrantResolver {
    store: Arc<EntitlementStore>,
    invites: Arc<dyn GroupInviteProvider>,
}

impl AccessGrantResolver {
    pub fn new(store: Arc<EntitlementStore>, invites: Arc<dyn GroupInviteProvider>) -> Self {
        Self { store, invites }
    }

    /// The user's stored entitlement without side effects.
    pub async fn entitlement_status(
        &self,
        user_id: UserId,
    ) -> Result<EntitlementStatus, CoursebotError> {
        let has_paid = self.store.has_paid(user_id).await?;
        let invite = if has_paid {
            self.store.invite(user_id).await?
        } else {
            None
        };
        Ok(EntitlementStatus { has_paid, invite })
    }

    /// The user's entitlement, lazily issuing a missing invitation.
    ///
    /// A paid user whose invitation was never stored (provider failure at
    /// payment time) gets one issued here. Unpaid users never reach the
    /// provider.
    pub async fn access_status(
        &self,
        user_id: UserId,
    ) -> Result<EntitlementStatus, CoursebotError> {
        let status = self.entitlement_status(user_id).await?;
        if !status.has_paid || status.invite.is_some() {
            return Ok(status);
        }
        let invite = self.issue_or_reuse_invitation(user_id).await?;
        Ok(EntitlementStatus {
            has_paid: true,
            invite,
        })
    }

    /// Process a confirmed payment: record it, then issue an invitation.
    ///
    /// Recording happens first so a provider outage cannot lose the
    /// payment. Redelivery of the same transaction id is tolerated and
    /// converges on the stored invitation.
    pub async fn confirm_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentOutcome, CoursebotError> {
        match self.store.record_payment(confirmation).await {
            Ok(()) => {}
            Err(CoursebotError::DuplicatePayment { user_id }) => {
                warn!(user_id = user_id.0, "second purchase attempt rejected");
                return Ok(PaymentOutcome::AlreadyEntitled);
            }
            Err(e) => return Err(e),
        }
        info!(
            user_id = confirmation.user_id.0,
            transaction_id = %confirmation.transaction_id,
            "payment recorded"
        );

        match self.issue_or_reuse_invitation(confirmation.user_id).await? {
            Some(invite) => Ok(PaymentOutcome::Granted(invite)),
            None => Ok(PaymentOutcome::GrantedWithoutInvite),
        }
    }

    /// Idempotent invitation issuance.
    ///
    /// Reuses the stored invitation when present; otherwise asks the
    /// provider for a fresh token and stores it insert-if-absent, so
    /// concurrent issuance converges on the first-written token. Provider
    /// failures map to `Ok(None)`, never an error.
    pub async fn issue_or_reuse_invitation(
        &self,
        user_id: UserId,
    ) -> Result<Option<AccessInvitation>, CoursebotError> {
        if let Some(existing) = self.store.invite(user_id).await? {
            return Ok(Some(existing));
        }

        let token = match self.invites.create_invite(user_id).await {
            Ok(token) => token,
            Err(e) => {
                error!(user_id = user_id.0, error = %e, "invite provider failed");
                return Ok(None);
            }
        };

        let stored = self.store.insert_invite_if_absent(user_id, &token).await?;
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coursebot_core::CustomerProfile;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct MockInvites {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockInvites {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GroupInviteProvider for MockInvites {
        async fn create_invite(&self, user_id: UserId) -> Result<String, CoursebotError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CoursebotError::Provider {
                    message: "provider down".to_string(),
                    source: None,
                });
            }
            Ok(format!("https://t.me/+invite-{}-{}", user_id.0, n))
        }
    }

    async fn open_store(dir: &tempfile::TempDir) -> Arc<EntitlementStore> {
        let path = dir.path().join("grants.db");
        Arc::new(
            EntitlementStore::open_at(path.to_str().unwrap())
                .await
                .unwrap(),
        )
    }

    fn confirmation(user_id: i64, tx: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            user_id: UserId(user_id),
            display_name: Some("ivan".to_string()),
            profile: CustomerProfile {
                full_name: "Ivan Petrov".to_string(),
                email: "a@b.com".to_string(),
                phone: "+79211234567".to_string(),
            },
            transaction_id: tx.to_string(),
            amount_minor: 1_000_000,
            currency: "RUB".to_string(),
        }
    }

    #[tokio::test]
    async fn payment_grants_access_with_invitation() {
        let dir = tempdir().unwrap();
        let invites = MockInvites::new(false);
        let resolver = AccessGrantResolver::new(open_store(&dir).await, invites.clone());

        let outcome = resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();
        match outcome {
            PaymentOutcome::Granted(invite) => {
                assert_eq!(invite.user_id, UserId(1));
                assert!(invite.invite_token.starts_with("https://t.me/+invite-1-"));
            }
            other => panic!("expected Granted, got {other:?}"),
        }
        assert_eq!(invites.calls(), 1);
    }

    #[tokio::test]
    async fn issuance_is_idempotent_per_user() {
        let dir = tempdir().unwrap();
        let invites = MockInvites::new(false);
        let resolver = AccessGrantResolver::new(open_store(&dir).await, invites.clone());

        resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();
        let first = resolver.access_status(UserId(1)).await.unwrap().invite.unwrap();

        // Further status checks reuse the stored token, no new provider calls.
        let second = resolver.access_status(UserId(1)).await.unwrap().invite.unwrap();
        assert_eq!(first, second);
        assert_eq!(invites.calls(), 1);
    }

    #[tokio::test]
    async fn provider_failure_keeps_payment_durable() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let invites = MockInvites::new(true);
        let resolver = AccessGrantResolver::new(store.clone(), invites.clone());

        let outcome = resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();
        assert_eq!(outcome, PaymentOutcome::GrantedWithoutInvite);

        // The payment survived the provider outage.
        assert!(store.has_paid(UserId(1)).await.unwrap());
        assert!(store.invite(UserId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn access_status_issues_missing_invitation_lazily() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        // Payment recorded while the provider was down.
        let down = MockInvites::new(true);
        let resolver = AccessGrantResolver::new(store.clone(), down);
        resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();

        // Once the provider recovers, the access menu repairs the gap.
        let up = MockInvites::new(false);
        let resolver = AccessGrantResolver::new(store, up.clone());
        let status = resolver.access_status(UserId(1)).await.unwrap();
        assert!(status.has_paid);
        assert!(status.invite.is_some());
        assert_eq!(up.calls(), 1);
    }

    #[tokio::test]
    async fn unpaid_user_never_reaches_provider() {
        let dir = tempdir().unwrap();
        let invites = MockInvites::new(false);
        let resolver = AccessGrantResolver::new(open_store(&dir).await, invites.clone());

        let status = resolver.access_status(UserId(9)).await.unwrap();
        assert!(!status.has_paid);
        assert!(status.invite.is_none());
        assert_eq!(invites.calls(), 0);
    }

    #[tokio::test]
    async fn redelivered_transaction_converges_on_stored_invite() {
        let dir = tempdir().unwrap();
        let invites = MockInvites::new(false);
        let resolver = AccessGrantResolver::new(open_store(&dir).await, invites.clone());

        let first = resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();
        let second = resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(invites.calls(), 1);
    }

    #[tokio::test]
    async fn second_purchase_is_rejected_not_overwritten() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let invites = MockInvites::new(false);
        let resolver = AccessGrantResolver::new(store.clone(), invites);

        resolver.confirm_payment(&confirmation(1, "tx-1")).await.unwrap();
        let outcome = resolver.confirm_payment(&confirmation(1, "tx-2")).await.unwrap();
        assert_eq!(outcome, PaymentOutcome::AlreadyEntitled);

        // The original audit record stands.
        let record = store.payment(UserId(1)).await.unwrap().unwrap();
        assert_eq!(record.transaction_id, "tx-1");
    }
}
