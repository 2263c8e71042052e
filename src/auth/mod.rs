// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless JWT authentication and access control for the finance API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in; the server verifies the bcrypt password
//!    hash and returns an access token (24h) and a refresh token (7 days)
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. [`middleware::authenticate`]:
//!    - skips allow-listed `(path, method)` pairs and CORS pre-flight
//!    - verifies algorithm (HMAC only), signature, issuer, `nbf` and `exp`
//!    - attaches [`AuthenticatedUser`] (`sub`, email, role) to the request
//! 4. Guards in [`guards`] enforce role and self-access rules
//!
//! ## Security
//!
//! - The signing key is injected through [`TokenService::new`]; nothing here
//!   reads the environment
//! - All token failures collapse into one 401 response
//! - No server-side sessions and no revocation

pub mod claims;
pub mod error;
pub mod extractor;
pub mod guards;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use guards::{require_admin, require_role, require_self, SelfAccessPolicy};
pub use middleware::{authenticate, AuthState, BypassList};
pub use password::{PasswordError, PasswordHasher, StrengthLabel};
pub use roles::{FixedRole, Role, RoleResolver};
pub use token::{TokenKind, TokenService};
