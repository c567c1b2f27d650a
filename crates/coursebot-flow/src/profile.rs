// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental customer profile assembly.

use coursebot_core::CustomerProfile;

/// A customer profile under construction.
///
/// Fields are filled in one conversation turn at a time and the draft
/// only converts into an immutable [`CustomerProfile`] once all three
/// are present. The draft is owned exclusively by the active session
/// and is dropped with it on cancellation or completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl ProfileDraft {
    /// True if no field has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.phone.is_none()
    }

    /// Convert into a complete profile, or `None` if any field is missing.
    pub fn finish(self) -> Option<CustomerProfile> {
        Some(CustomerProfile {
            email: self.email?,
            full_name: self.full_name?,
            phone: self.phone?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_does_not_finish() {
        assert!(ProfileDraft::default().finish().is_none());
    }

    #[test]
    fn partial_draft_does_not_finish() {
        let draft = ProfileDraft {
            email: Some("a@b.com".into()),
            full_name: Some("Ivan Petrov".into()),
            phone: None,
        };
        assert!(draft.finish().is_none());
    }

    #[test]
    fn complete_draft_finishes() {
        let draft = ProfileDraft {
            email: Some("a@b.com".into()),
            full_name: Some("Ivan Petrov".into()),
            phone: Some("+79211234567".into()),
        };
        let profile = draft.finish().unwrap();
        assert_eq!(profile.full_name, "Ivan Petrov");
        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.phone, "+79211234567");
    }
}
