// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization guards layered after [`super::middleware::authenticate`].
//!
//! ```rust,ignore
//! let admin = Router::new()
//!     .route("/admin/users", get(list_users))
//!     .route_layer(axum::middleware::from_fn(require_admin));
//!
//! let members = Router::new()
//!     .route("/reports", get(reports))
//!     .route_layer(axum::middleware::from_fn_with_state(Role::User, require_role));
//!
//! let owned = Router::new()
//!     .route("/users/{user_id}", get(get_user))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         SelfAccessPolicy::default(),
//!         require_self,
//!     ));
//! ```

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::{AuthError, AuthenticatedUser, Role};

/// Path segment that introduces a user ID in resource URLs.
const USERS_SEGMENT: &str = "users";

/// How [`require_self`] treats paths without a `users/<id>` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfAccessPolicy {
    /// Reject requests whose path has no user ID segment. When `false` such
    /// requests pass through unchecked.
    pub require_user_segment: bool,
}

impl SelfAccessPolicy {
    pub fn strict() -> Self {
        Self {
            require_user_segment: true,
        }
    }
}

/// Check that the authenticated user holds exactly `required`.
pub fn check_role(user: Option<&AuthenticatedUser>, required: Role) -> Result<(), AuthError> {
    let user = user.ok_or(AuthError::MissingIdentity)?;
    if user.has_role(required) {
        return Ok(());
    }

    warn!(
        user_id = %user.user_id,
        user_role = %user.role,
        required_role = %required,
        "User does not have required role"
    );
    Err(AuthError::InsufficientPermissions)
}

/// The segment following the first `users` segment of `path`, if any.
fn requested_user_id(path: &str) -> Option<&str> {
    let mut segments = path.split('/');
    segments.find(|segment| *segment == USERS_SEGMENT)?;
    segments.next()
}

/// Check that `path` only addresses the authenticated user's own resources.
pub fn check_self_access(
    user: Option<&AuthenticatedUser>,
    path: &str,
    policy: SelfAccessPolicy,
) -> Result<(), AuthError> {
    let user = user.ok_or(AuthError::MissingIdentity)?;

    match requested_user_id(path) {
        Some(requested) if requested == user.user_id => Ok(()),
        Some(requested) => {
            warn!(
                authenticated_user_id = %user.user_id,
                requested_user_id = %requested,
                "User trying to access another user's resource"
            );
            Err(AuthError::OwnershipMismatch)
        }
        None if policy.require_user_segment => {
            warn!(user_id = %user.user_id, path, "No user segment in self-access route");
            Err(AuthError::OwnershipMismatch)
        }
        None => Ok(()),
    }
}

/// Middleware rejecting requests whose identity lacks the role in state.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Response {
    let outcome = check_role(request.extensions().get::<AuthenticatedUser>(), required);
    match outcome {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Middleware admitting only [`Role::Admin`].
pub async fn require_admin(request: Request, next: Next) -> Response {
    require_role(State(Role::Admin), request, next).await
}

/// Middleware restricting `/users/<id>/...` routes to the user `<id>`.
pub async fn require_self(
    State(policy): State<SelfAccessPolicy>,
    request: Request,
    next: Next,
) -> Response {
    // Nested routers see a stripped URI; the original keeps the full path.
    let path = match request.extensions().get::<OriginalUri>() {
        Some(original) => original.path().to_owned(),
        None => request.uri().path().to_owned(),
    };

    let outcome = check_self_access(request.extensions().get::<AuthenticatedUser>(), &path, policy);
    match outcome {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn user(id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id.to_string(),
            email: Some(format!("{id}@example.com")),
            role,
        }
    }

    #[test]
    fn role_check_outcomes() {
        assert!(matches!(check_role(None, Role::User), Err(AuthError::MissingIdentity)));
        assert!(check_role(Some(&user("a", Role::User)), Role::User).is_ok());
        assert!(matches!(
            check_role(Some(&user("a", Role::User)), Role::Admin),
            Err(AuthError::InsufficientPermissions)
        ));
        assert!(check_role(Some(&user("a", Role::Admin)), Role::Admin).is_ok());
    }

    #[test]
    fn requested_user_id_parsing() {
        assert_eq!(requested_user_id("/api/v1/users/abc"), Some("abc"));
        assert_eq!(requested_user_id("/api/v1/users/abc/expenses"), Some("abc"));
        assert_eq!(requested_user_id("/users/"), Some(""));
        assert_eq!(requested_user_id("/api/v1/users"), None);
        assert_eq!(requested_user_id("/api/v1/expenses"), None);
        assert_eq!(requested_user_id("/api/v1/superusers/abc"), None);
    }

    #[test]
    fn self_access_outcomes() {
        let alice = user("alice", Role::User);
        let lenient = SelfAccessPolicy::default();

        assert!(check_self_access(Some(&alice), "/api/v1/users/alice", lenient).is_ok());
        assert!(matches!(
            check_self_access(Some(&alice), "/api/v1/users/bob/expenses", lenient),
            Err(AuthError::OwnershipMismatch)
        ));
        assert!(check_self_access(Some(&alice), "/api/v1/expenses", lenient).is_ok());
        assert!(matches!(
            check_self_access(Some(&alice), "/api/v1/expenses", SelfAccessPolicy::strict()),
            Err(AuthError::OwnershipMismatch)
        ));
        assert!(matches!(
            check_self_access(None, "/api/v1/users/alice", lenient),
            Err(AuthError::MissingIdentity)
        ));
    }

    async fn ok() -> &'static str {
        "ok"
    }

    async fn status_for(app: Router, uri: &str, identity: Option<AuthenticatedUser>) -> StatusCode {
        let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        if let Some(identity) = identity {
            request.extensions_mut().insert(identity);
        }
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn admin_guard_layers() {
        let app = Router::new()
            .route("/admin", get(ok))
            .route_layer(axum::middleware::from_fn(require_admin));

        assert_eq!(status_for(app.clone(), "/admin", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(app.clone(), "/admin", Some(user("a", Role::User))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(app, "/admin", Some(user("a", Role::Admin))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn role_guard_takes_role_from_state() {
        let app = Router::new()
            .route("/mine", get(ok))
            .route_layer(axum::middleware::from_fn_with_state(Role::User, require_role));

        assert_eq!(status_for(app.clone(), "/mine", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(app.clone(), "/mine", Some(user("a", Role::User))).await,
            StatusCode::OK
        );
        assert_eq!(
            status_for(app, "/mine", Some(user("a", Role::Admin))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn self_guard_sees_full_path_when_nested() {
        let inner = Router::new()
            .route("/users/{user_id}", get(ok))
            .route_layer(axum::middleware::from_fn_with_state(
                SelfAccessPolicy::default(),
                require_self,
            ));
        let app = Router::new().nest("/api/v1", inner);

        assert_eq!(
            status_for(app.clone(), "/api/v1/users/alice", Some(user("alice", Role::User))).await,
            StatusCode::OK
        );
        assert_eq!(
            status_for(app.clone(), "/api/v1/users/bob", Some(user("alice", Role::User))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(app, "/api/v1/users/alice", None).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
