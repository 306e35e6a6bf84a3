//! Format checks for contact values.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits a phone number must carry, E.164 bounds.
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

/// `local@domain.tld`: no whitespace, non-empty labels, alphabetic TLD.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@(?:[^\s@.]+\.)+[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// Optional leading `+`, then digits and common separators.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().-]+$").expect("phone pattern compiles"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Digits plus separators, with 7 to 15 digits in total.
pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    PHONE_RE.is_match(value) && PHONE_DIGITS.contains(&value.chars().filter(char::is_ascii_digit).count())
}
