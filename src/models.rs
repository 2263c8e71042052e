// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize` and/or `Deserialize` plus
//! `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Users**: Stored accounts and their public profile
//! - **Auth**: Registration, login, refresh and token pairs
//! - **Expenses**: Per-user expense records
//! - **Investments**: Positions held at an institution
//! - **Goals**: Savings and payoff targets
//! - **Paging**: Page, limit and sort order shared by every listing

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::Role;
use crate::validation::FieldError;

// =============================================================================
// User Models
// =============================================================================

/// A registered account.
///
/// The bcrypt hash never leaves the server: it is skipped on serialization
/// and there is no way to deserialize a `User` from client input.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Response for GET /api/v1/users/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID (`sub` claim)
    pub user_id: String,
    /// Account email carried by the token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// User's role
    pub role: Role,
}

/// Admin listing of every account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub total: usize,
    pub users: Vec<UserProfile>,
}

// =============================================================================
// Auth Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Access and refresh token issued together.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Returned by register, login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PasswordStrengthResponse {
    /// Heuristic score in 0..=100
    pub score: u8,
    /// `Very Weak`, `Weak`, `Medium`, `Strong` or `Very Strong`
    pub label: String,
    /// Whether the password satisfies the registration policy
    pub acceptable: bool,
    /// Policy rules the password breaks
    pub violations: Vec<FieldError>,
}

// =============================================================================
// Expense Models
// =============================================================================

/// A single expense entry owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub description: String,
    pub expense_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub description: String,
    /// Calendar date in `YYYY-MM-DD` format
    pub expense_date: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

// =============================================================================
// Investment Models
// =============================================================================

/// A position the user holds, e.g. a deposit, fund or bond.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub type_id: Uuid,
    pub name: String,
    /// Amount originally invested
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Annual rate in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `active` on creation
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInvestmentRequest {
    /// Investment type ID (UUID)
    pub type_id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub current_value: Option<f64>,
    /// Calendar date in `YYYY-MM-DD` format
    pub start_date: String,
    /// Calendar date in `YYYY-MM-DD` format
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestmentListResponse {
    pub investments: Vec<Investment>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

// =============================================================================
// Goal Models
// =============================================================================

/// Accepted `goal_type` values.
pub const GOAL_TYPES: &[&str] = &[
    "savings",
    "investment",
    "debt_payoff",
    "purchase",
    "emergency_fund",
];

/// Accepted `priority` values.
pub const GOAL_PRIORITIES: &[&str] = &["low", "medium", "high"];

/// A savings or payoff target.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FinancialGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: f64,
    /// Amount saved so far; starts at zero
    pub current_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub goal_type: String,
    pub priority: String,
    /// `active` on creation
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGoalRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount: f64,
    /// Calendar date in `YYYY-MM-DD` format
    #[serde(default)]
    pub target_date: Option<String>,
    /// One of `savings`, `investment`, `debt_payoff`, `purchase`, `emergency_fund`
    pub goal_type: String,
    /// One of `low`, `medium`, `high`
    pub priority: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GoalListResponse {
    pub goals: Vec<FinancialGoal>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

// =============================================================================
// Paging
// =============================================================================

/// Direction of a listing's primary sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Pagination parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1..=100)
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// `asc` or `desc` (default) on the listing's date
    #[serde(default)]
    pub sort_order: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            sort_order: None,
        }
    }
}
