// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply and inline keyboard construction.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

use crate::texts;

/// Callback payload for the inline back button.
pub const BACK_CALLBACK: &str = "back_to_menu";

/// The main menu. The third row switches between purchase and access
/// depending on the user's entitlement.
pub fn main_menu(has_paid: bool) -> KeyboardMarkup {
    let purchase_or_access = if has_paid {
        texts::MENU_ACCESS
    } else {
        texts::MENU_PURCHASE
    };
    KeyboardMarkup::new([
        vec![KeyboardButton::new(texts::MENU_ABOUT_COURSE)],
        vec![KeyboardButton::new(texts::MENU_ABOUT_LECTURER)],
        vec![KeyboardButton::new(purchase_or_access)],
    ])
    .resize_keyboard()
}

/// Inline back button returning to the main menu.
pub fn back_button() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(
        texts::BACK_BUTTON,
        BACK_CALLBACK,
    )]])
}

/// Cancel-only keyboard shown in the email step and free-text prompts.
pub fn cancel_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([[KeyboardButton::new(texts::CANCEL_BUTTON)]]).resize_keyboard()
}

/// Name-step keyboard. The known-name shortcut row only appears when
/// the transport supplied a profile name.
pub fn name_keyboard(has_known_name: bool) -> KeyboardMarkup {
    let mut rows = Vec::with_capacity(3);
    if has_known_name {
        rows.push(vec![KeyboardButton::new(texts::USE_KNOWN_NAME_BUTTON)]);
    }
    rows.push(vec![KeyboardButton::new(texts::ENTER_CUSTOM_NAME_BUTTON)]);
    rows.push(vec![KeyboardButton::new(texts::CANCEL_BUTTON)]);
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Phone-step keyboard: a contact-request button plus manual entry.
pub fn phone_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([
        vec![KeyboardButton::new(texts::SHARE_CONTACT_BUTTON).request(ButtonRequest::Contact)],
        vec![KeyboardButton::new(texts::ENTER_MANUALLY_BUTTON)],
        vec![KeyboardButton::new(texts::CANCEL_BUTTON)],
    ])
    .resize_keyboard()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(markup: &KeyboardMarkup) -> Vec<String> {
        markup
            .keyboard
            .iter()
            .flatten()
            .map(|b| b.text.clone())
            .collect()
    }

    #[test]
    fn main_menu_switches_on_entitlement() {
        let unpaid = labels(&main_menu(false));
        assert!(unpaid.contains(&texts::MENU_PURCHASE.to_string()));
        assert!(!unpaid.contains(&texts::MENU_ACCESS.to_string()));

        let paid = labels(&main_menu(true));
        assert!(paid.contains(&texts::MENU_ACCESS.to_string()));
        assert!(!paid.contains(&texts::MENU_PURCHASE.to_string()));
    }

    #[test]
    fn name_keyboard_hides_shortcut_without_known_name() {
        assert!(labels(&name_keyboard(true)).contains(&texts::USE_KNOWN_NAME_BUTTON.to_string()));
        assert!(!labels(&name_keyboard(false)).contains(&texts::USE_KNOWN_NAME_BUTTON.to_string()));
    }

    #[test]
    fn phone_keyboard_requests_contact() {
        let markup = phone_keyboard();
        let share = markup
            .keyboard
            .iter()
            .flatten()
            .find(|b| b.text == texts::SHARE_CONTACT_BUTTON)
            .unwrap();
        assert_eq!(share.request, Some(ButtonRequest::Contact));
    }

    #[test]
    fn every_flow_keyboard_offers_cancel() {
        for markup in [cancel_keyboard(), name_keyboard(true), phone_keyboard()] {
            assert!(labels(&markup).contains(&texts::CANCEL_BUTTON.to_string()));
        }
    }
}
