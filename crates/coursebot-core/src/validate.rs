// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure syntactic validators for customer contact fields.
//!
//! No DNS lookups, no mailbox or carrier verification -- these check
//! shape only, and never fail with anything other than `false`.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone pattern"));

/// Returns `true` iff `s` looks like an email address: a local part,
/// an `@`, a domain, and an alphabetic TLD of at least two characters.
pub fn valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Returns `true` iff `s` is an E.164-like phone number: an optional
/// leading `+`, a first digit 1-9, and at most 15 digits total.
pub fn valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_plain_email() {
        assert!(valid_email("a@b.com"));
        assert!(valid_email("ivan.petrov+course@example.co.uk"));
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a@b.c"));
        assert!(!valid_email("a b@c.com"));
        assert!(!valid_email("a@@b.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn accepts_e164_phone() {
        assert!(valid_phone("+79211234567"));
        assert!(valid_phone("79211234567"));
        assert!(valid_phone("12"));
        // 15 digits, the E.164 maximum
        assert!(valid_phone("+123456789012345"));
    }

    #[test]
    fn rejects_malformed_phone() {
        assert!(!valid_phone("+0123456"));
        assert!(!valid_phone("0123456"));
        assert!(!valid_phone("1"));
        // 16 digits is one over the maximum
        assert!(!valid_phone("+1234567890123456"));
        assert!(!valid_phone("+7 921 123 45 67"));
        assert!(!valid_phone("phone"));
        assert!(!valid_phone(""));
    }

    proptest! {
        #[test]
        fn generated_valid_emails_pass(s in "[a-z0-9.+-]{1,12}@[a-z0-9-]{1,12}\\.[A-Za-z]{2,6}") {
            prop_assert!(valid_email(&s));
        }

        #[test]
        fn strings_without_at_sign_fail(s in "[a-z0-9 .-]{0,40}") {
            prop_assert!(!valid_email(&s));
        }

        #[test]
        fn generated_valid_phones_pass(s in "\\+?[1-9][0-9]{1,14}") {
            prop_assert!(valid_phone(&s));
        }

        #[test]
        fn overlong_phones_fail(s in "[1-9][0-9]{15,30}") {
            prop_assert!(!valid_phone(&s));
        }

        #[test]
        fn validators_never_panic(s in "\\PC*") {
            let _ = valid_email(&s);
            let _ = valid_phone(&s);
        }
    }
}
