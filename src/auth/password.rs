// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password policy, strength scoring and bcrypt hashing.
//!
//! Hashing is CPU-bound and slow on purpose. Async callers should run
//! [`PasswordHasher::hash`] and [`PasswordHasher::verify`] on the blocking
//! pool.

use std::fmt;

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::validation::ValidationErrors;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// bcrypt work factor. Roughly 50–100ms per hash on current hardware.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Valid bcrypt cost range.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

const PASSWORD_FIELD: &str = "password";

/// Salt for [`PasswordHasher::verify_absent`]. Never embedded in a stored hash.
const ABSENT_ACCOUNT_SALT: [u8; 16] = *b"tgfinance-absent";

/// Password hashing and verification errors.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// The password does not satisfy the strength policy.
    #[error("password does not meet policy: {0}")]
    PolicyViolation(ValidationErrors),
    /// Wrong password or unusable stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The hashing backend failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Character classes present in a password.
#[derive(Debug, Default, Clone, Copy)]
struct CharClasses {
    upper: bool,
    lower: bool,
    digit: bool,
    symbol: bool,
}

impl CharClasses {
    fn scan(password: &str) -> Self {
        let mut classes = Self::default();
        for c in password.chars() {
            if c.is_uppercase() {
                classes.upper = true;
            } else if c.is_lowercase() {
                classes.lower = true;
            } else if c.is_numeric() {
                classes.digit = true;
            } else if is_symbol(c) {
                classes.symbol = true;
            }
        }
        classes
    }
}

/// Unicode punctuation (`P*`) or symbol (`S*`). Format characters, marks,
/// private-use and unassigned code points do not count.
fn is_symbol(c: char) -> bool {
    use GeneralCategory::*;

    matches!(
        get_general_category(c),
        ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

/// Check `password` against every policy rule and report all violations.
pub fn validate_strength(password: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        errors.add(
            PASSWORD_FIELD,
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        );
    }
    if length > MAX_PASSWORD_LENGTH {
        errors.add(
            PASSWORD_FIELD,
            format!("password must be at most {MAX_PASSWORD_LENGTH} characters long"),
        );
    }

    let classes = CharClasses::scan(password);
    if !classes.upper {
        errors.add(PASSWORD_FIELD, "password must contain at least one uppercase letter");
    }
    if !classes.lower {
        errors.add(PASSWORD_FIELD, "password must contain at least one lowercase letter");
    }
    if !classes.digit {
        errors.add(PASSWORD_FIELD, "password must contain at least one number");
    }
    if !classes.symbol {
        errors.add(PASSWORD_FIELD, "password must contain at least one special character");
    }

    errors
}

/// Heuristic strength score in `0..=100`.
///
/// Length earns 20 at 8 characters, 30 at 12 and 40 at 16. Each character
/// class adds 15 and having both cases adds 10 more. The raw sum can reach
/// 110 and is clamped.
pub fn strength_score(password: &str) -> u8 {
    let length = password.chars().count();
    let mut score: u32 = 0;

    if length >= 8 {
        score += 20;
    }
    if length >= 12 {
        score += 10;
    }
    if length >= 16 {
        score += 10;
    }

    let classes = CharClasses::scan(password);
    for present in [classes.upper, classes.lower, classes.digit, classes.symbol] {
        if present {
            score += 15;
        }
    }
    if classes.upper && classes.lower {
        score += 10;
    }

    score.min(100) as u8
}

/// Human readable strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => StrengthLabel::VeryStrong,
            60..=79 => StrengthLabel::Strong,
            40..=59 => StrengthLabel::Medium,
            20..=39 => StrengthLabel::Weak,
            _ => StrengthLabel::VeryWeak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn strength_label(password: &str) -> StrengthLabel {
    StrengthLabel::from_score(strength_score(password))
}

/// bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Enforce the policy, then hash with a fresh random salt.
    ///
    /// The returned string embeds cost and salt, so [`Self::verify`] needs
    /// nothing else.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let violations = validate_strength(password);
        if violations.has_errors() {
            return Err(PasswordError::PolicyViolation(violations));
        }

        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Check `password` against a stored `hash`.
    ///
    /// A mismatch and an unparseable hash fail identically.
    pub fn verify(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(PasswordError::InvalidCredentials),
        }
    }

    /// Fail the way [`Self::verify`] does for an account that does not exist.
    ///
    /// Runs one bcrypt computation at the configured cost against a fixed
    /// salt, so the caller spends the same time as for a wrong password.
    pub fn verify_absent(&self, password: &str) -> Result<(), PasswordError> {
        let _ = bcrypt::hash_with_salt(password, self.cost, ABSENT_ACCOUNT_SALT);
        Err(PasswordError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn strong_password_passes_policy() {
        assert!(validate_strength("SecurePass123!").is_empty());
    }

    #[test]
    fn weak_password_reports_every_violation() {
        let errors = validate_strength("weak");
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "password must be at least 8 characters long",
                "password must contain at least one uppercase letter",
                "password must contain at least one number",
                "password must contain at least one special character",
            ]
        );
        assert!(errors.iter().all(|e| e.field == "password"));
    }

    #[test]
    fn length_bounds_have_distinct_messages() {
        let long = format!("Aa1!{}", "x".repeat(125));
        let too_long = validate_strength(&long);
        assert_eq!(too_long.len(), 1);
        assert!(too_long.render().contains("at most 128"));

        let exactly_max = format!("Aa1!{}", "x".repeat(124));
        assert!(validate_strength(&exactly_max).is_empty());
        assert!(validate_strength("Aa1!aaaa").is_empty());
        assert!(!validate_strength("Aa1!aaa").is_empty());
    }

    #[test]
    fn unicode_classes_are_recognised() {
        assert!(validate_strength("Ünïcödé1€").is_empty());
        assert!(validate_strength("Password1«").is_empty());
        assert!(validate_strength("Password1\u{2713}").is_empty());
    }

    #[test]
    fn invisible_and_unassigned_characters_are_not_symbols() {
        for password in [
            "Password1\u{200B}", // zero-width space
            "Password1\u{200D}", // zero-width joiner
            "Password1\u{0301}", // combining acute accent
            "Password1\u{E000}", // private use
            "Password1\u{0378}", // unassigned
        ] {
            let errors = validate_strength(password);
            assert_eq!(
                errors.render(),
                "password: password must contain at least one special character",
                "{password:?}"
            );
        }
        assert!(validate_strength("Password1!").is_empty());
    }

    #[test]
    fn scores_follow_additive_rules() {
        assert_eq!(strength_score(""), 0);
        assert_eq!(strength_score("weak"), 15);
        assert_eq!(strength_score("password123"), 50);
        assert_eq!(strength_score("Password123"), 75);
        assert_eq!(strength_score("Abc123!@#"), 90);
        assert_eq!(strength_score("SuperSecurePass123!@#"), 100);
    }

    #[test]
    fn label_boundaries() {
        // 16 chars, both cases: 40 + 15 + 15 + 10
        assert_eq!(strength_score("Abcdefghijklmnop"), 80);
        assert_eq!(strength_label("Abcdefghijklmnop"), StrengthLabel::VeryStrong);
        // 12 chars, lower + digit: 30 + 15 + 15
        assert_eq!(strength_score("abcdefgh1234"), 60);
        assert_eq!(strength_label("abcdefgh1234"), StrengthLabel::Strong);
        // short, both cases: 15 + 15 + 10
        assert_eq!(strength_score("Abc"), 40);
        assert_eq!(strength_label("Abc"), StrengthLabel::Medium);
        // 8 spaces: length only
        assert_eq!(strength_score("        "), 20);
        assert_eq!(strength_label("        "), StrengthLabel::Weak);
        assert_eq!(strength_label(""), StrengthLabel::VeryWeak);
    }

    #[test]
    fn label_examples() {
        assert_eq!(strength_label("Abc123!@#").to_string(), "Very Strong");
        assert_eq!(strength_label("weak").to_string(), "Very Weak");
        assert_eq!(strength_label("password123").to_string(), "Medium");
        assert_eq!(strength_label("Password123").to_string(), "Strong");
        assert_eq!(strength_label("SuperSecurePass123!@#").to_string(), "Very Strong");
    }

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("SecurePass123!").unwrap();

        assert!(hash.starts_with("$2"));
        assert!(hasher.verify(&hash, "SecurePass123!").is_ok());
        assert!(matches!(
            hasher.verify(&hash, "wrongpassword"),
            Err(PasswordError::InvalidCredentials)
        ));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash("SecurePass123!").unwrap();
        let second = hasher.hash("SecurePass123!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&first, "SecurePass123!").is_ok());
        assert!(hasher.verify(&second, "SecurePass123!").is_ok());
    }

    #[test]
    fn hash_refuses_weak_password() {
        let hasher = PasswordHasher::new(TEST_COST);
        match hasher.hash("weak") {
            Err(PasswordError::PolicyViolation(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("expected policy violation, got {other:?}"),
        }
    }

    #[test]
    fn malformed_hash_looks_like_wrong_password() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(matches!(
            hasher.verify("not-a-bcrypt-hash", "SecurePass123!"),
            Err(PasswordError::InvalidCredentials)
        ));
    }

    #[test]
    fn absent_account_costs_a_full_hash() {
        let hasher = PasswordHasher::new(8);
        let hash = hasher.hash("SecurePass123!").unwrap();

        let started = std::time::Instant::now();
        assert!(hasher.verify(&hash, "WrongPass123!").is_err());
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        assert!(matches!(
            hasher.verify_absent("WrongPass123!"),
            Err(PasswordError::InvalidCredentials)
        ));
        let absent = started.elapsed();

        assert!(
            absent * 4 >= wrong_password,
            "absent {absent:?} vs wrong password {wrong_password:?}"
        );
    }

    #[test]
    fn default_cost() {
        assert_eq!(PasswordHasher::default().cost(), DEFAULT_BCRYPT_COST);
        assert!(BCRYPT_COST_RANGE.contains(&DEFAULT_BCRYPT_COST));
    }
}
