use std::sync::LazyLock;

use regex::Regex;

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

pub const INVALID_NAME: &str = "Please enter a valid name (minimum 2 characters)";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_MESSAGE: &str = "Please enter a message (minimum 10 characters)";

/// `\n?$` keeps the conventional `$` behaviour of also matching before one
/// final newline; the stored address is trimmed anyway.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\n?$").expect("Invalid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub passed: bool,
    pub errors: Vec<String>,
}

/// Lengths count characters, not bytes.
fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

pub fn is_valid_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| trimmed_len(n) >= NAME_MIN_CHARS)
}

/// Matched against the raw input; surrounding whitespace fails the check.
pub fn is_valid_email(email: Option<&str>) -> bool {
    email.is_some_and(|e| EMAIL_PATTERN.is_match(e))
}

pub fn is_valid_message(message: Option<&str>) -> bool {
    message.is_some_and(|m| trimmed_len(m) >= MESSAGE_MIN_CHARS)
}

/// Runs every field check, collecting one message per failing field in
/// name, email, message order.
pub fn validate_submission(
    name: Option<&str>,
    email: Option<&str>,
    message: Option<&str>,
) -> ValidationResult {
    let checks = [
        (is_valid_name(name), INVALID_NAME),
        (is_valid_email(email), INVALID_EMAIL),
        (is_valid_message(message), INVALID_MESSAGE),
    ];

    let errors: Vec<String> = checks
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| msg.to_string())
        .collect();

    ValidationResult {
        passed: errors.is_empty(),
        errors,
    }
}
