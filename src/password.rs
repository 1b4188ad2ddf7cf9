//! Password strength scoring and random password generation.
//!
//! Both are conveniences for the shell layer: the vault core never
//! consumes a generated password and never enforces a strength floor.

use rand::Rng;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Score a password from 0 to 100 against an additive rubric and
/// describe what is missing.
///
/// Points: +20 length >= 8, +10 length >= 12, +15 lowercase, +15
/// uppercase, +15 digit, +25 symbol. Bands: below 40 Weak, below 70
/// Moderate, below 90 Strong, otherwise Very Strong.
///
/// Pure and deterministic: the same input always yields the same
/// (score, message) pair.
pub fn validate_strength(password: &str) -> (u8, String) {
    let mut score: u8 = 0;
    let mut feedback = String::new();

    if password.len() >= 8 {
        score += 20;
    } else {
        feedback.push_str("Use at least 8 characters. ");
    }

    if password.len() >= 12 {
        score += 10;
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 15;
    } else {
        feedback.push_str("Add lowercase letters. ");
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 15;
    } else {
        feedback.push_str("Add uppercase letters. ");
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 15;
    } else {
        feedback.push_str("Add numbers. ");
    }

    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 25;
    } else {
        feedback.push_str("Add special characters. ");
    }

    let band = if score < 40 {
        "Weak"
    } else if score < 70 {
        "Moderate"
    } else if score < 90 {
        "Strong"
    } else {
        "Very Strong"
    };

    if feedback.is_empty() {
        feedback = "Good password!".to_string();
    }

    (score, format!("{band}: {feedback}"))
}

/// Generate a random password by uniform selection over the character
/// set: letters and digits, plus symbols when requested.
pub fn generate(length: usize, include_symbols: bool) -> String {
    let mut charset: Vec<char> = LOWERCASE
        .chars()
        .chain(UPPERCASE.chars())
        .chain(DIGITS.chars())
        .collect();
    if include_symbols {
        charset.extend(SYMBOLS.chars());
    }

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())])
        .collect()
}
