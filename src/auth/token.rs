// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless token issuance and validation.
//!
//! Tokens are HMAC-signed JWTs. The server keeps no session record: a token
//! is valid exactly when its signature checks out against the injected key
//! and the current time lies in `[nbf, exp)`.
//!
//! ## Token kinds
//!
//! Access and refresh tokens differ only in lifetime and in whether the
//! `email` claim is present. The kind is not written into the token, so a
//! refresh token is accepted anywhere an access token is. [`TokenKind`] is the
//! single place that knows about kinds; marking tokens would mean emitting it
//! as a claim in [`TokenService::issue_at`] and comparing it in
//! [`TokenService::validate_at`].

use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

use super::{AuthError, Claims};

/// Fixed issuer claim for every token minted by this service.
pub const ISSUER: &str = "tgfinance";

/// Default access token lifetime.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Default refresh token lifetime.
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 7 * 24;

/// Algorithm used when signing.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when validating. Anything else is rejected before the
/// signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// What a token is minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Reason a token was rejected. Only ever logged; callers see
/// [`AuthError::InvalidToken`].
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("malformed token header")]
    Malformed,
    #[error("unexpected signing algorithm {0:?}")]
    UnexpectedAlgorithm(Algorithm),
    #[error("{0}")]
    Decode(jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
}

/// Issues and validates identity tokens with a symmetric key.
///
/// Immutable after construction; clone freely across request tasks.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service signing with `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl: Duration::hours(ACCESS_TOKEN_TTL_HOURS),
            refresh_ttl: Duration::hours(REFRESH_TOKEN_TTL_HOURS),
        }
    }

    /// Override the default lifetimes.
    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self
    }

    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issue an access token carrying `subject` and `email`.
    pub fn issue_access_token(
        &self,
        subject: impl Display,
        email: &str,
    ) -> Result<String, AuthError> {
        self.issue_at(TokenKind::Access, &subject.to_string(), Some(email), Utc::now())
    }

    /// Issue a refresh token carrying only `subject`.
    pub fn issue_refresh_token(&self, subject: impl Display) -> Result<String, AuthError> {
        self.issue_at(TokenKind::Refresh, &subject.to_string(), None, Utc::now())
    }

    /// Issue a token of `kind` as if minted at `now`.
    pub fn issue_at(
        &self,
        kind: TokenKind,
        subject: &str,
        email: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let issued_at = now.timestamp();
        let email = match kind {
            TokenKind::Access => email.map(str::to_owned),
            TokenKind::Refresh => None,
        };

        let expires_at = now
            .checked_add_signed(self.lifetime(kind))
            .ok_or_else(|| AuthError::Signing(format!("{kind:?} token expiry out of range")))?;

        let claims = Claims {
            sub: subject.to_owned(),
            email,
            iss: ISSUER.to_owned(),
            iat: issued_at,
            nbf: issued_at,
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validate `token` against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as of `now`.
    ///
    /// Every failure, whatever its cause, is reported as
    /// [`AuthError::InvalidToken`].
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        self.verify(token, now).map_err(|reason| {
            debug!(reason = %reason, "Token rejected");
            AuthError::InvalidToken
        })
    }

    /// Validate `token` and return its subject.
    pub fn extract_subject(&self, token: &str) -> Result<String, AuthError> {
        self.validate(token).map(|claims| claims.sub)
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, Rejection> {
        let header = decode_header(token).map_err(|_| Rejection::Malformed)?;
        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(Rejection::UnexpectedAlgorithm(header.alg));
        }

        // Time checks are done below against the caller's clock.
        let mut validation = Validation::new(header.alg);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(Rejection::Decode)?
            .claims;

        let now = now.timestamp();
        if now >= claims.exp {
            return Err(Rejection::Expired);
        }
        if now < claims.nbf {
            return Err(Rejection::NotYetValid);
        }

        Ok(claims)
    }
}
