// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Purchase conversation state machine.
//!
//! Transport-agnostic: the engine consumes typed [`FlowInput`] values
//! and produces typed [`FlowReply`] values, leaving message rendering
//! and delivery to the transport adapter.

pub mod machine;
pub mod profile;
pub mod session;

pub use machine::{FlowInput, FlowReply, PurchaseFlow};
pub use profile::ProfileDraft;
pub use session::ConversationSession;
