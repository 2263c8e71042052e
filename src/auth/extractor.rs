// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authenticated identity.
//!
//! The authentication middleware has already verified the token by the time
//! a handler runs, so these only read the typed identity from the request
//! extensions:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{guards::check_role, AuthError, AuthenticatedUser, Role};

/// Extractor for authenticated users.
///
/// Rejects with 401 when no identity was attached, which only happens on
/// routes the middleware lets through (bypass list) or when the middleware
/// is missing.
pub struct Auth(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingIdentity)
    }
}

/// Extractor for routes that work with or without an identity, such as the
/// bypassed ones.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        check_role(Some(&user), Role::Admin)?;
        Ok(AdminOnly(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "user_123".to_string(),
            email: Some("user@example.com".to_string()),
            role,
        }
    }

    #[tokio::test]
    async fn auth_extractor_requires_identity() {
        let mut parts = parts_with(None);
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingIdentity)));
    }

    #[tokio::test]
    async fn auth_extractor_reads_extensions() {
        let mut parts = parts_with(Some(user(Role::User)));
        let Auth(found) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.user_id, "user_123");
    }

    #[tokio::test]
    async fn optional_auth_never_rejects() {
        let mut parts = parts_with(None);
        let OptionalAuth(found) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(found.is_none());

        let mut parts = parts_with(Some(user(Role::User)));
        let OptionalAuth(found) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.unwrap().user_id, "user_123");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let mut parts = parts_with(Some(user(Role::User)));
        let result = AdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let mut parts = parts_with(Some(user(Role::Admin)));
        let AdminOnly(admin) = AdminOnly::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(admin.is_admin());
    }
}
