// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation session state.

use coursebot_core::FlowState;

use crate::profile::ProfileDraft;

/// The scratch state of one user's purchase conversation.
///
/// Created when the user enters the purchase flow and destroyed as a
/// whole on cancel, completion, or unrecoverable error -- a single reset
/// rather than field-by-field cleanup. At most one session exists per
/// user at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSession {
    pub state: FlowState,
    pub draft: ProfileDraft,
    /// Full name reported by the identity provider, offered as a
    /// one-tap shortcut during the name step.
    pub known_name: Option<String>,
    /// Set after the user chose to type a name instead of using the
    /// known-name shortcut; disambiguates free text in AwaitingName.
    pub awaiting_custom_name: bool,
    /// Set after the user chose manual phone entry over contact
    /// sharing; disambiguates free text in AwaitingPhone.
    pub awaiting_manual_phone: bool,
}

impl ConversationSession {
    /// A fresh session at the start of the purchase flow.
    pub fn new(known_name: Option<String>) -> Self {
        Self {
            state: FlowState::AwaitingEmail,
            draft: ProfileDraft::default(),
            known_name,
            awaiting_custom_name: false,
            awaiting_manual_phone: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_awaiting_email_with_empty_draft() {
        let session = ConversationSession::new(Some("Ivan Petrov".into()));
        assert_eq!(session.state, FlowState::AwaitingEmail);
        assert!(session.draft.is_empty());
        assert!(!session.awaiting_custom_name);
        assert!(!session.awaiting_manual_phone);
    }
}
