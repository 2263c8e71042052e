// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Field Validation
//!
//! [`ValidationErrors`] is the single error-reporting currency for input
//! checks: the password policy and every field validator below append
//! `(field, message)` pairs to it, and handlers report the whole set at once.
//!
//! Validators never short-circuit across fields. Within one field only the
//! first failing rule is recorded.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::SortOrder;

/// Maximum accepted email length (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Largest monetary amount accepted on any record.
pub const MAX_AMOUNT: f64 = 999_999_999.99;

/// Upper bound for `limit` on paginated listings.
pub const MAX_PAGE_LIMIT: u32 = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex compiles")
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("name regex compiles"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex compiles"));

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("uuid regex compiles")
});

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    /// Human readable description of the failure.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered set of validation failures collected during one validation pass.
///
/// An empty set means the input is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Append every failure of `other`, keeping insertion order.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Render as `"field: message"` pairs joined by `"; "`.
    pub fn render(&self) -> String {
        self.errors
            .iter()
            .map(FieldError::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Convert into `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Field validators
// =============================================================================

/// Record a failure when `value` is blank. Returns `true` if present.
pub fn validate_required(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} is required"));
        false
    } else {
        true
    }
}

/// Check the trimmed length of `value`. A bound of `0` disables that side.
pub fn validate_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> bool {
    let length = value.trim().chars().count();

    if min > 0 && length < min {
        errors.add(field, format!("{field} must be at least {min} characters long"));
        return false;
    }
    if max > 0 && length > max {
        errors.add(field, format!("{field} must be no more than {max} characters long"));
        return false;
    }
    true
}

pub fn validate_email(errors: &mut ValidationErrors, email: &str) -> bool {
    if email.is_empty() {
        errors.add("email", "email is required");
        return false;
    }
    if email.len() > MAX_EMAIL_LENGTH {
        errors.add(
            "email",
            format!("email too long (max {MAX_EMAIL_LENGTH} characters)"),
        );
        return false;
    }
    if !EMAIL_RE.is_match(email) {
        errors.add("email", "invalid email format");
        return false;
    }
    true
}

/// Personal names: letters, spaces, hyphens and apostrophes, 2–100 chars.
pub fn validate_name(errors: &mut ValidationErrors, field: &str, name: &str) -> bool {
    if !validate_required(errors, field, name) || !validate_length(errors, field, name, 2, 100) {
        return false;
    }
    if !NAME_RE.is_match(name) {
        errors.add(
            field,
            format!("{field} can only contain letters, spaces, hyphens, and apostrophes"),
        );
        return false;
    }
    true
}

/// Phone numbers must carry 10–15 digits once formatting is stripped.
pub fn validate_phone(errors: &mut ValidationErrors, phone: &str) -> bool {
    if phone.is_empty() {
        errors.add("phone", "phone number is required");
        return false;
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&digits) {
        errors.add("phone", "phone number must be between 10 and 15 digits");
        return false;
    }
    true
}

pub fn validate_amount(errors: &mut ValidationErrors, field: &str, amount: f64) -> bool {
    if amount.is_nan() || amount <= 0.0 {
        errors.add(field, format!("{field} must be greater than 0"));
        return false;
    }
    if amount > MAX_AMOUNT {
        errors.add(field, format!("{field} is too large (max 999,999,999.99)"));
        return false;
    }
    true
}

/// Validate a `YYYY-MM-DD` calendar date, returning it when valid.
pub fn validate_date(errors: &mut ValidationErrors, field: &str, date: &str) -> Option<NaiveDate> {
    if !validate_required(errors, field, date) {
        return None;
    }
    if !DATE_RE.is_match(date) {
        errors.add(field, format!("{field} must be in YYYY-MM-DD format"));
        return None;
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, format!("{field} must be a valid date"));
            None
        }
    }
}

/// Validate a hyphenated UUID of versions 1–5, returning it when valid.
pub fn validate_uuid(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<Uuid> {
    if !validate_required(errors, field, value) {
        return None;
    }
    let lowered = value.trim().to_lowercase();
    if !UUID_RE.is_match(&lowered) {
        errors.add(field, format!("{field} must be a valid UUID"));
        return None;
    }
    Uuid::parse_str(&lowered).ok()
}

/// Closed vocabularies such as goal types and priorities.
pub fn validate_one_of(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    allowed: &[&str],
) -> bool {
    if !validate_required(errors, field, value) {
        return false;
    }
    if !allowed.contains(&value) {
        errors.add(field, format!("{field} must be one of: {}", allowed.join(", ")));
        return false;
    }
    true
}

/// `asc` or `desc`, case-insensitive. Absent or blank means the default order.
pub fn validate_sort_order(
    errors: &mut ValidationErrors,
    value: Option<&str>,
) -> Option<SortOrder> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Some(SortOrder::default());
    };
    match value.to_lowercase().as_str() {
        "asc" => Some(SortOrder::Asc),
        "desc" => Some(SortOrder::Desc),
        _ => {
            errors.add("sort_order", "sort_order must be 'asc' or 'desc'");
            None
        }
    }
}

pub fn validate_pagination(errors: &mut ValidationErrors, page: u32, limit: u32) -> bool {
    let mut valid = true;
    if page < 1 {
        errors.add("page", "page must be greater than 0");
        valid = false;
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        errors.add("limit", format!("limit must be between 1 and {MAX_PAGE_LIMIT}"));
        valid = false;
    }
    valid
}
