// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed routing of incoming text.
//!
//! Every piece of text maps to an explicit variant; unrecognized
//! commands become [`Routed::UnknownCommand`] and are answered, never
//! silently dropped.

use coursebot_flow::FlowInput;

use crate::texts;

/// Recognized slash commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Access,
    Cancel,
}

/// Recognized main-menu button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AboutCourse,
    AboutLecturer,
    /// Purchase and access share a handler: it branches on entitlement.
    PurchaseOrAccess,
}

/// Where a text message should be dispatched when no purchase
/// conversation is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Command(Command),
    UnknownCommand(String),
    Menu(MenuAction),
    /// Free text with no matching handler.
    Plain(String),
}

/// Route one text message outside the purchase flow.
pub fn route(text: &str) -> Routed {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('/') {
        // Strip the "@botname" suffix Telegram appends in some clients.
        let command = rest
            .split_whitespace()
            .next()
            .unwrap_or("")
            .split('@')
            .next()
            .unwrap_or("");
        return match command.to_ascii_lowercase().as_str() {
            "start" => Routed::Command(Command::Start),
            "help" => Routed::Command(Command::Help),
            "access" => Routed::Command(Command::Access),
            "cancel" => Routed::Command(Command::Cancel),
            _ => Routed::UnknownCommand(text.to_string()),
        };
    }
    match text {
        t if t == texts::MENU_ABOUT_COURSE => Routed::Menu(MenuAction::AboutCourse),
        t if t == texts::MENU_ABOUT_LECTURER => Routed::Menu(MenuAction::AboutLecturer),
        t if t == texts::MENU_PURCHASE || t == texts::MENU_ACCESS => {
            Routed::Menu(MenuAction::PurchaseOrAccess)
        }
        _ => Routed::Plain(text.to_string()),
    }
}

/// Map text received during an active purchase conversation onto a
/// typed flow input. Keyboard button presses arrive as plain text.
pub fn flow_input(text: &str) -> FlowInput {
    match text.trim() {
        t if t == texts::CANCEL_BUTTON => FlowInput::Cancel,
        t if t == texts::USE_KNOWN_NAME_BUTTON => FlowInput::UseKnownName,
        t if t == texts::ENTER_CUSTOM_NAME_BUTTON => FlowInput::EnterCustomName,
        t if t == texts::ENTER_MANUALLY_BUTTON => FlowInput::EnterManually,
        t => FlowInput::Text(t.to_string()),
    }
}
