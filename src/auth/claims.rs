// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Role;

/// Identity claims carried inside a signed token.
///
/// Only registered claim names are used, plus `email` on access tokens.
/// Claims are rebuilt from the token on every validation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (stringified user ID)
    pub sub: String,

    /// Account email, absent on refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issuer (always [`super::token::ISSUER`])
    pub iss: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp (equal to `iat`)
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated user information attached to a request.
///
/// Inserted into request extensions by the authentication middleware and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim)
    pub user_id: String,

    /// Account email (if present on the token)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User's role
    pub role: Role,
}

impl AuthenticatedUser {
    /// Create from verified claims and a resolved role.
    pub fn from_claims(claims: Claims, role: Role) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role,
        }
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.role == required
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
