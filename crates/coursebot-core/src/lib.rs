// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Coursebot course-sales bot.
//!
//! This crate provides the error type, the shared domain types
//! (customer profiles, payment records, invitations), the pure field
//! validators, and the provider traits implemented by the transport
//! layer. All other workspace crates build on top of it.

pub mod error;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export key items at crate root for ergonomic imports.
pub use error::CoursebotError;
pub use traits::GroupInviteProvider;
pub use types::{
    AccessInvitation, CustomerProfile, FlowState, PaymentConfirmation, PaymentRecord, UserId,
};
pub use validate::{valid_email, valid_phone};
