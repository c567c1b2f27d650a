// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collected customer profiles for invoices awaiting provider
//! confirmation.

use coursebot_core::{CustomerProfile, UserId};
use dashmap::DashMap;

/// Profiles set aside between invoice issuance and the provider's
/// payment confirmation, keyed by user id.
///
/// At most one entry per user: issuing a new invoice replaces the old
/// entry, and starting or cancelling a purchase clears it. Abandoned
/// invoices therefore never accumulate beyond one entry per user.
#[derive(Default)]
pub struct PendingInvoices {
    profiles: DashMap<i64, CustomerProfile>,
}

impl PendingInvoices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the profile an invoice was issued with.
    pub fn set(&self, user_id: UserId, profile: CustomerProfile) {
        self.profiles.insert(user_id.0, profile);
    }

    /// Consume the profile when the provider confirms the payment.
    pub fn take(&self, user_id: UserId) -> Option<CustomerProfile> {
        self.profiles.remove(&user_id.0).map(|(_, profile)| profile)
    }

    /// Drop the user's entry, if any.
    pub fn clear(&self, user_id: UserId) {
        self.profiles.remove(&user_id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: &str) -> CustomerProfile {
        CustomerProfile {
            full_name: "Ivan Petrov".into(),
            email: email.into(),
            phone: "+79211234567".into(),
        }
    }

    #[test]
    fn take_consumes_the_entry() {
        let pending = PendingInvoices::new();
        pending.set(UserId(1), profile("a@b.com"));
        assert_eq!(pending.take(UserId(1)), Some(profile("a@b.com")));
        assert_eq!(pending.take(UserId(1)), None);
    }

    #[test]
    fn clear_drops_an_abandoned_invoice() {
        let pending = PendingInvoices::new();
        pending.set(UserId(1), profile("a@b.com"));
        pending.clear(UserId(1));
        assert_eq!(pending.take(UserId(1)), None);

        // Clearing an absent entry is a no-op.
        pending.clear(UserId(1));
    }

    #[test]
    fn a_new_invoice_replaces_the_previous_one() {
        let pending = PendingInvoices::new();
        pending.set(UserId(1), profile("old@b.com"));
        pending.set(UserId(1), profile("new@b.com"));
        assert_eq!(pending.take(UserId(1)), Some(profile("new@b.com")));
    }

    #[test]
    fn entries_are_independent_across_users() {
        let pending = PendingInvoices::new();
        pending.set(UserId(1), profile("a@b.com"));
        pending.clear(UserId(2));
        assert_eq!(pending.take(UserId(1)), Some(profile("a@b.com")));
    }
}
