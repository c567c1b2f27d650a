// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message texts and menu button labels.
//!
//! All texts are plain strings; MarkdownV2 escaping happens at send
//! time. Button labels double as routing keys for reply-keyboard
//! presses, so they must stay unique across menus.

/// Main menu button labels.
pub const MENU_ABOUT_COURSE: &str = "📖 About the course";
pub const MENU_ABOUT_LECTURER: &str = "👩‍🏫 About the lecturer";
pub const MENU_PURCHASE: &str = "💳 Buy the course";
pub const MENU_ACCESS: &str = "🎓 My access";

/// Conversation keyboard button labels.
pub const BACK_BUTTON: &str = "⬅️ Back";
pub const CANCEL_BUTTON: &str = "❌ Cancel";
pub const USE_KNOWN_NAME_BUTTON: &str = "✅ Use my profile name";
pub const ENTER_CUSTOM_NAME_BUTTON: &str = "✏️ Enter a different name";
pub const SHARE_CONTACT_BUTTON: &str = "📱 Share my phone number";
pub const ENTER_MANUALLY_BUTTON: &str = "⌨️ Type it manually";

pub const WELCOME_NEW: &str = "Welcome! This bot sells access to our online course. \
Use the menu below to learn more or start your purchase.";

pub const WELCOME_BACK: &str = "Welcome back! Pick an option from the menu below.";

pub const HELP_TEXT: &str = "Available commands:\n\
/start - show the main menu\n\
/access - check your course access\n\
/cancel - abandon a purchase in progress\n\
/help - show this message";

pub const PROMPT_EMAIL: &str = "Let's get you signed up! \
Please enter your email address. We'll send the receipt there.";

pub const INVALID_EMAIL: &str = "That doesn't look like a valid email address. \
Please try again, for example: name@example.com";

pub const PROMPT_CUSTOM_NAME: &str = "Please type your full name.";

pub const PROMPT_PHONE: &str = "Almost done! Share your phone number with the \
button below, or type it manually.";

pub const PROMPT_MANUAL_PHONE: &str = "Please type your phone number in \
international format, for example: +79211234567";

pub const INVALID_PHONE: &str = "That doesn't look like a valid phone number. \
Please use international format, for example: +79211234567";

pub const PAYMENT_INFO_THANKS: &str = "Thank you! Sending your invoice now.";

pub const PAYMENT_ERROR: &str = "Something went wrong while preparing your \
payment. Please try again later or contact support.";

pub const PAYMENT_CANCELLED: &str = "Purchase cancelled. You can start again \
any time from the menu.";

pub const ACCESS_SUCCESS_NO_LINK: &str = "You have access to the course, but \
your invite link isn't ready yet. Please try /access again later or contact \
support.";

pub const UNKNOWN_COMMAND: &str = "I don't know that command. Try /help.";

pub const USE_BUTTONS: &str = "Please use the buttons below.";

pub const LECTURER_INFO_UNSET: &str = "Lecturer information is coming soon.";

pub const GENERAL_ERROR: &str = "Something went wrong. Please try again later.";

/// Thanks after email, asking how to provide the name.
pub fn prompt_name(known_name: Option<&str>) -> String {
    match known_name {
        Some(name) => format!(
            "Thanks! Should the receipt go to \"{name}\", or would you like to \
enter a different name?"
        ),
        None => "Thanks! Now let's get your full name.".to_string(),
    }
}

pub fn payment_success(transaction_id: &str, invite_link: &str) -> String {
    format!(
        "Payment received! 🎉\nTransaction: {transaction_id}\n\n\
Here is your personal invite link to the students group:\n{invite_link}"
    )
}

pub fn payment_success_no_link(transaction_id: &str) -> String {
    format!(
        "Payment received! 🎉\nTransaction: {transaction_id}\n\n\
Your invite link isn't ready yet. Use /access later to retrieve it, or \
contact support."
    )
}

pub fn already_purchased(invite_link: Option<&str>) -> String {
    match invite_link {
        Some(link) => format!(
            "You already own the course. Your invite link to the students \
group:\n{link}"
        ),
        None => ACCESS_SUCCESS_NO_LINK.to_string(),
    }
}

pub fn access_granted(invite_link: &str) -> String {
    format!(
        "You have full access to the course! Join the students group here:\n{invite_link}"
    )
}

pub fn access_not_purchased(course_title: &str, price_major: &str, currency: &str) -> String {
    format!(
        "You haven't purchased \"{course_title}\" yet. \
The course costs {price_major} {currency}. Use the menu to buy it."
    )
}

/// Format a minor-unit price as whole major units with thousands
/// separated by spaces, e.g. 1_000_000 -> "10 000".
pub fn format_price(amount_minor: i64) -> String {
    let major = amount_minor / 100;
    let digits = major.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if major < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
