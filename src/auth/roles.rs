// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::claims::Claims;

/// User roles for authorization.
///
/// Matching is exact: an admin does not implicitly satisfy a `User` guard
/// and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account holder
    #[default]
    User,
    /// Administrative access
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    /// Parse a role name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the role attached to an authenticated request.
///
/// Tokens carry no role claim and there is no role storage, so the role is
/// looked up from the verified claims by whatever the integrator wires in.
pub trait RoleResolver: Send + Sync {
    fn resolve(&self, claims: &Claims) -> Role;
}

/// Resolver that assigns the same role to every authenticated request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRole(pub Role);

impl RoleResolver for FixedRole {
    fn resolve(&self, _claims: &Claims) -> Role {
        self.0
    }
}
