// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment-side domain logic: invoice composition with fiscal receipt
//! data, and resolution of confirmed payments into durable entitlements
//! and group invitations.

pub mod grant;
pub mod invoice;

pub use grant::{AccessGrantResolver, EntitlementStatus, PaymentOutcome};
pub use invoice::{InvoiceRequest, LineItem, Product, compose_invoice, format_major_units};
