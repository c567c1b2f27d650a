// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MarkdownV2 escaping for the Telegram Bot API.
//!
//! Telegram's MarkdownV2 parse mode reserves 18 characters. Bot texts
//! here carry no intentional markup, so every reserved character is
//! escaped; invite links and user-typed names pass through safely.

const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes all MarkdownV2-reserved characters in `text`.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape_markdown_v2("Hello world"), "Hello world");
        assert_eq!(escape_markdown_v2(""), "");
    }

    #[test]
    fn escapes_all_reserved_characters() {
        let input = "_*[]()~`>#+-=|{}.!";
        let expected = "\\_\\*\\[\\]\\(\\)\\~\\`\\>\\#\\+\\-\\=\\|\\{\\}\\.\\!";
        assert_eq!(escape_markdown_v2(input), expected);
    }

    #[test]
    fn escapes_invite_link() {
        assert_eq!(
            escape_markdown_v2("https://t.me/+AbC-dEf"),
            "https://t\\.me/\\+AbC\\-dEf"
        );
    }

    #[test]
    fn preserves_emoji_and_unicode() {
        assert_eq!(escape_markdown_v2("🎉 Готово"), "🎉 Готово");
    }
}
