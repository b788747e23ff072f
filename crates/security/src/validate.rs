use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Longest address accepted anywhere in the app, matching the usual
/// provider-side limit.
pub const MAX_EMAIL_LEN: usize = 254;

/// Checks that `email` has a conservative address shape (a single `@`,
/// no whitespace, dotted domain) and fits within [`MAX_EMAIL_LEN`].
#[must_use]
pub fn validate_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(email)
}

/// Checks that `text` still has something in it after trimming, and that
/// what remains is at most `max_len` characters.
#[must_use]
pub fn validate_text_length(text: &str, max_len: usize) -> bool {
    let len = text.trim().chars().count();

    0 < len && len <= max_len
}

/// Checks that `password` falls within the configured length range.
#[must_use]
pub fn validate_password(password: &str, allowed_len: &Range<usize>) -> bool {
    allowed_len.contains(&password.chars().count())
}
