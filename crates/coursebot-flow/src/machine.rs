// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The purchase conversation state machine.
//!
//! Drives the email -> name -> phone collection sequence. Every step
//! returns an explicit [`FlowReply`] instead of signalling through
//! errors; the transport layer decides how to render each reply.
//! Input the current state has no handler for re-prompts the same
//! state and never advances.

use coursebot_core::{CustomerProfile, FlowState, UserId, valid_email, valid_phone};
use dashmap::DashMap;
use tracing::{debug, error};

use crate::session::ConversationSession;

/// A typed conversation input, produced by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowInput {
    /// The user abandoned the purchase.
    Cancel,
    /// Free-form text.
    Text(String),
    /// A structured contact share carrying a phone number from a
    /// trusted source; bypasses phone validation.
    ContactShared(String),
    /// The "use my known name" shortcut in the name step.
    UseKnownName,
    /// The "type a different name" option in the name step.
    EnterCustomName,
    /// The "type it manually" option in the phone step.
    EnterManually,
}

/// The outcome of one conversation step.
///
/// `Completed` carries the assembled profile; the session is already
/// torn down by the time the caller sees it, so invoice issuance
/// failures can never leave a dangling partial session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowReply {
    /// Ask for the customer's email.
    PromptEmail,
    /// The email failed validation; ask again.
    InvalidEmail,
    /// Ask for the customer's name, offering the known-name shortcut
    /// when the identity provider supplied one.
    PromptName { known_name: Option<String> },
    /// The user chose to type a name; ask for free text.
    PromptCustomName,
    /// Ask for the customer's phone (contact share or manual entry).
    PromptPhone,
    /// The user chose manual entry; ask for free text.
    PromptManualPhone,
    /// The phone failed validation; ask again.
    InvalidPhone,
    /// Input had no handler in the current state; repeat its prompt.
    Reprompt(FlowState),
    /// The session was discarded at the user's request.
    Cancelled,
    /// No purchase conversation is in progress for this user.
    NotInFlow,
    /// All fields collected; proceed to invoice issuance.
    Completed(CustomerProfile),
}

/// The purchase conversation engine, one session per user.
///
/// Constructed once at startup and passed into request handlers
/// explicitly; holds no transport or storage handles.
#[derive(Default)]
pub struct PurchaseFlow {
    sessions: DashMap<i64, ConversationSession>,
}

/// Internal step outcome: keep the session or finish with a phone number.
enum StepReply {
    Continue(FlowReply),
    Finished(String),
}

impl PurchaseFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the purchase flow, discarding any stale session.
    pub fn begin(&self, user_id: UserId, known_name: Option<String>) -> FlowReply {
        debug!(user_id = user_id.0, "purchase flow started");
        self.sessions
            .insert(user_id.0, ConversationSession::new(known_name));
        FlowReply::PromptEmail
    }

    /// The current conversation state for a user (`Idle` if none).
    pub fn state(&self, user_id: UserId) -> FlowState {
        self.sessions
            .get(&user_id.0)
            .map(|s| s.state)
            .unwrap_or(FlowState::Idle)
    }

    /// True while the user has an active purchase conversation.
    pub fn in_flow(&self, user_id: UserId) -> bool {
        self.sessions.contains_key(&user_id.0)
    }

    /// The known-name shortcut held by the user's session, if any.
    /// `None` both when no session exists and when the session was
    /// started without a known name.
    pub fn known_name(&self, user_id: UserId) -> Option<String> {
        self.sessions
            .get(&user_id.0)
            .and_then(|s| s.known_name.clone())
    }

    /// Discard a session without user interaction (unrecoverable error).
    pub fn abandon(&self, user_id: UserId) {
        self.sessions.remove(&user_id.0);
    }

    /// Advance the conversation by one input.
    ///
    /// The session is taken out of the map for the duration of the step
    /// and only put back if the flow continues, so every exit path --
    /// cancel, completion, error -- leaves no residual state behind.
    pub fn handle(&self, user_id: UserId, input: FlowInput) -> FlowReply {
        let Some((_, mut session)) = self.sessions.remove(&user_id.0) else {
            return FlowReply::NotInFlow;
        };

        if input == FlowInput::Cancel {
            debug!(user_id = user_id.0, state = %session.state, "purchase flow cancelled");
            return FlowReply::Cancelled;
        }

        let reply = match session.state {
            FlowState::AwaitingEmail => Self::step_email(&mut session, input),
            FlowState::AwaitingName => Self::step_name(&mut session, input),
            FlowState::AwaitingPhone => Self::step_phone(&mut session, input),
            // Sessions never rest in Idle; a stored Idle session is a bug.
            FlowState::Idle => {
                error!(user_id = user_id.0, "idle session found in session map");
                return FlowReply::NotInFlow;
            }
        };

        match reply {
            StepReply::Continue(reply) => {
                self.sessions.insert(user_id.0, session);
                reply
            }
            StepReply::Finished(phone) => Self::complete(user_id, session, phone),
        }
    }

    fn step_email(session: &mut ConversationSession, input: FlowInput) -> StepReply {
        match input {
            FlowInput::Text(text) => {
                let text = text.trim();
                if valid_email(text) {
                    session.draft.email = Some(text.to_string());
                    session.state = FlowState::AwaitingName;
                    StepReply::Continue(FlowReply::PromptName {
                        known_name: session.known_name.clone(),
                    })
                } else {
                    StepReply::Continue(FlowReply::InvalidEmail)
                }
            }
            _ => StepReply::Continue(FlowReply::Reprompt(FlowState::AwaitingEmail)),
        }
    }

    fn step_name(session: &mut ConversationSession, input: FlowInput) -> StepReply {
        match input {
            FlowInput::UseKnownName => match session.known_name.clone() {
                Some(name) => {
                    session.draft.full_name = Some(name);
                    session.state = FlowState::AwaitingPhone;
                    StepReply::Continue(FlowReply::PromptPhone)
                }
                None => StepReply::Continue(FlowReply::Reprompt(FlowState::AwaitingName)),
            },
            FlowInput::EnterCustomName => {
                session.awaiting_custom_name = true;
                StepReply::Continue(FlowReply::PromptCustomName)
            }
            FlowInput::Text(text) if session.awaiting_custom_name => {
                let text = text.trim();
                if text.is_empty() {
                    StepReply::Continue(FlowReply::Reprompt(FlowState::AwaitingName))
                } else {
                    session.draft.full_name = Some(text.to_string());
                    session.awaiting_custom_name = false;
                    session.state = FlowState::AwaitingPhone;
                    StepReply::Continue(FlowReply::PromptPhone)
                }
            }
            _ => StepReply::Continue(FlowReply::Reprompt(FlowState::AwaitingName)),
        }
    }

    fn step_phone(session: &mut ConversationSession, input: FlowInput) -> StepReply {
        match input {
            // Contact shares come from the transport itself, not typed
            // input, so they skip syntactic validation.
            FlowInput::ContactShared(phone) => StepReply::Finished(phone),
            FlowInput::EnterManually => {
                session.awaiting_manual_phone = true;
                StepReply::Continue(FlowReply::PromptManualPhone)
            }
            FlowInput::Text(text) if session.awaiting_manual_phone => {
                let text = text.trim();
                if valid_phone(text) {
                    StepReply::Finished(text.to_string())
                } else {
                    StepReply::Continue(FlowReply::InvalidPhone)
                }
            }
            _ => StepReply::Continue(FlowReply::Reprompt(FlowState::AwaitingPhone)),
        }
    }

    fn complete(user_id: UserId, mut session: ConversationSession, phone: String) -> FlowReply {
        session.draft.phone = Some(phone);
        match session.draft.finish() {
            Some(profile) => {
                debug!(user_id = user_id.0, "purchase flow completed");
                FlowReply::Completed(profile)
            }
            None => {
                // Unreachable by construction: email and name are set
                // before the phone step can finish.
                error!(user_id = user_id.0, "phone step finished with incomplete draft");
                FlowReply::Cancelled
            }
        }
    }
}
