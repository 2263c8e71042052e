// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ErrorEnvelope;

/// Message returned for every authentication failure. Causes are not
/// distinguished externally.
pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing authorization token";

/// Authentication error type.
///
/// The `Display` text is for logs; clients only ever see
/// [`AuthError::public_message`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("authorization header is required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    #[error("authorization header must start with 'Bearer '")]
    InvalidAuthHeader,
    /// Nothing after the `Bearer ` prefix
    #[error("bearer token is empty")]
    EmptyToken,
    /// Malformed, wrong algorithm, bad signature, expired or not yet valid
    #[error("token is invalid or expired")]
    InvalidToken,
    /// A guard ran without the middleware having attached an identity
    #[error("authenticated identity not found in request")]
    MissingIdentity,
    /// Role check failed
    #[error("insufficient permissions")]
    InsufficientPermissions,
    /// Self-access check failed
    #[error("cannot access another user's resources")]
    OwnershipMismatch,
    /// Token could not be signed (key misconfiguration)
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::EmptyToken
            | AuthError::InvalidToken
            | AuthError::MissingIdentity => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions | AuthError::OwnershipMismatch => {
                StatusCode::FORBIDDEN
            }
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::EmptyToken
            | AuthError::InvalidToken => UNAUTHENTICATED_MESSAGE,
            AuthError::MissingIdentity => "User identity not found in context",
            AuthError::InsufficientPermissions => "Insufficient permissions",
            AuthError::OwnershipMismatch => "Cannot access another user's resources",
            AuthError::Signing(_) => "Internal authentication error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ErrorEnvelope::new(status, self.public_message()).into_response_with(status)
    }
}
