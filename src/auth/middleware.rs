// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Every inbound request either matches the bypass list and continues with
//! no identity, or must carry `Authorization: Bearer <token>`. A valid token
//! puts an [`AuthenticatedUser`] into the request extensions; anything else
//! ends the request with a 401 envelope.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/v1/users/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(auth_state, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{AuthError, AuthenticatedUser, FixedRole, RoleResolver, TokenService};

/// Literal scheme prefix expected in the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Exact `(path, method)` pairs that skip authentication.
///
/// `OPTIONS` requests (CORS pre-flight) always skip authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassList {
    entries: Vec<(String, Method)>,
}

impl Default for BypassList {
    fn default() -> Self {
        Self::empty()
            .allow("/health", Method::GET)
            .allow("/metrics", Method::GET)
            .allow("/api/v1/auth/login", Method::POST)
            .allow("/api/v1/auth/register", Method::POST)
            .allow("/api/v1/auth/refresh", Method::POST)
    }
}

impl BypassList {
    /// A list that only lets pre-flight requests through.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn allow(mut self, path: impl Into<String>, method: Method) -> Self {
        self.entries.push((path.into(), method));
        self
    }

    /// Whether a request for `path` with `method` skips authentication.
    pub fn allows(&self, path: &str, method: &Method) -> bool {
        if *method == Method::OPTIONS {
            return true;
        }
        self.entries
            .iter()
            .any(|(allowed_path, allowed_method)| allowed_path == path && allowed_method == method)
    }
}

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
    pub bypass: Arc<BypassList>,
    pub roles: Arc<dyn RoleResolver>,
}

impl AuthState {
    /// Default bypass list, every authenticated request gets `Role::User`.
    pub fn new(tokens: TokenService) -> Self {
        Self {
            tokens,
            bypass: Arc::new(BypassList::default()),
            roles: Arc::new(FixedRole::default()),
        }
    }

    pub fn with_bypass(mut self, bypass: BypassList) -> Self {
        self.bypass = Arc::new(bypass);
        self
    }

    pub fn with_role_resolver(mut self, roles: impl RoleResolver + 'static) -> Self {
        self.roles = Arc::new(roles);
        self
    }

    /// Authenticate from request headers.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.tokens.validate(token)?;
        let role = self.roles.resolve(&claims);
        Ok(AuthenticatedUser::from_claims(claims, role))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    if header.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    Ok(token)
}

/// Authentication middleware function.
pub async fn authenticate(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if auth.bypass.allows(request.uri().path(), request.method()) {
        return next.run(request).await;
    }

    let outcome = auth.authenticate_headers(request.headers());
    match outcome {
        Ok(user) => {
            debug!(user_id = %user.user_id, role = %user.role, "User authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            debug!(
                error = %e,
                path = %request.uri().path(),
                method = %request.method(),
                "Authentication failed"
            );
            e.into_response()
        }
    }
}
