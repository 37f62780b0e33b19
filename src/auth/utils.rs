//! Small helpers for registration/login input handling.

use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Password length in UTF-16 code units.
pub(crate) fn strong_enough(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LENGTH
}

/// Treat absent and blank text fields alike.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Passwords are never trimmed; only the empty string counts as missing.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@x.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@x"));
        assert!(!valid_email("a b@x.com"));
    }

    #[test]
    fn password_length_counts_utf16_units() {
        assert!(!strong_enough("short12"));
        assert!(strong_enough("longpass"));
        // 7 units, 14 bytes
        assert!(!strong_enough("ééééééé"));
        // 4 characters, 8 units
        assert!(strong_enough("😀😀😀😀"));
    }

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" Tigers ".to_string())), Some("Tigers".to_string()));
        assert_eq!(non_blank(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("  pass  ".to_string())), Some("  pass  ".to_string()));
    }
}
