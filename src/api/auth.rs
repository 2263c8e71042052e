// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login, token refresh and password strength endpoints.
//!
//! bcrypt hashing and verification run on the blocking pool.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        password::{strength_label, strength_score, validate_strength},
        Auth, AuthError, TokenKind, TokenService,
    },
    error::ApiError,
    models::{
        AuthResponse, LoginRequest, PasswordStrengthRequest, PasswordStrengthResponse,
        RefreshRequest, RegisterRequest, TokenPair, User, UserProfile,
    },
    state::AppState,
    store::NewUser,
    validation::{validate_email, validate_name, validate_phone, validate_required, ValidationErrors},
};

const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";

/// Run CPU-heavy work off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "Blocking task failed");
        ApiError::internal("Internal error")
    })
}

/// Mint an access/refresh pair for `user`.
fn issue_token_pair(tokens: &TokenService, user: &User) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        access_token: tokens.issue_access_token(user.id, &user.email)?,
        refresh_token: tokens.issue_refresh_token(user.id)?,
        token_type: "Bearer".to_string(),
        expires_in: tokens.lifetime(TokenKind::Access).num_seconds(),
    })
}

fn validate_registration(request: &RegisterRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    validate_email(&mut errors, request.email.trim());
    validate_name(&mut errors, "first_name", &request.first_name);
    validate_name(&mut errors, "last_name", &request.last_name);
    if let Some(phone) = &request.phone {
        validate_phone(&mut errors, phone);
    }
    errors.extend(validate_strength(&request.password));
    errors
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_registration(&request).into_result()?;

    if state.store.read().await.user_by_email(&request.email).is_some() {
        return Err(ApiError::conflict("A user with this email already exists"));
    }

    let hasher = state.hasher;
    let password = request.password;
    let password_hash = run_blocking(move || hasher.hash(&password)).await??;

    let user = state.store.write().await.insert_user(NewUser {
        email: request.email,
        password_hash,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
    })?;

    let tokens = issue_token_pair(state.tokens(), &user)?;
    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::from(&user),
            tokens,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let mut errors = ValidationErrors::new();
    validate_required(&mut errors, "email", &request.email);
    validate_required(&mut errors, "password", &request.password);
    errors.into_result()?;

    let user = state
        .store
        .read()
        .await
        .user_by_email(&request.email)
        .filter(|user| user.is_active);

    // Unknown and inactive accounts still pay for one bcrypt run.
    let hasher = state.hasher;
    let hash = user.as_ref().map(|user| user.password_hash.clone());
    let password = request.password;
    let verified = run_blocking(move || match hash {
        Some(hash) => hasher.verify(&hash, &password),
        None => hasher.verify_absent(&password),
    })
    .await?;

    let Some(user) = user else {
        warn!("Login attempt for unknown or inactive account");
        return Err(ApiError::unauthorized(INVALID_LOGIN_MESSAGE));
    };
    if let Err(e) = verified {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(e.into());
    }

    let user = state.store.write().await.record_login(user.id)?;
    let tokens = issue_token_pair(state.tokens(), &user)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: UserProfile::from(&user),
        tokens,
    }))
}

/// Exchange a valid token for a fresh pair.
///
/// Token kinds are indistinguishable once minted, so an unexpired access
/// token is accepted here as well.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Invalid or expired token"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let subject = state.tokens().extract_subject(&request.refresh_token)?;
    let user_id = Uuid::parse_str(&subject).map_err(|_| AuthError::InvalidToken)?;

    let user = state
        .store
        .read()
        .await
        .user_by_id(user_id)
        .ok()
        .filter(|user| user.is_active)
        .ok_or(AuthError::InvalidToken)?;

    let tokens = issue_token_pair(state.tokens(), &user)?;
    Ok(Json(AuthResponse {
        user: UserProfile::from(&user),
        tokens,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-strength",
    request_body = PasswordStrengthRequest,
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Strength assessment", body = PasswordStrengthResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn password_strength(
    Auth(_user): Auth,
    Json(request): Json<PasswordStrengthRequest>,
) -> Json<PasswordStrengthResponse> {
    let violations = validate_strength(&request.password);
    Json(PasswordStrengthResponse {
        score: strength_score(&request.password),
        label: strength_label(&request.password).to_string(),
        acceptable: violations.is_empty(),
        violations: violations.into_vec(),
    })
}
