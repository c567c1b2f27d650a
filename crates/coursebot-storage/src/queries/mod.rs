// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over the entitlement tables.

pub mod invites;
pub mod payments;
