// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.
//!
//! `/users/{user_id}` routes sit behind the self-access guard, so handlers
//! here can trust that `user_id` is the caller's own ID.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{Auth, AuthenticatedUser},
    error::ApiError,
    models::{UpdateUserRequest, UserMeResponse, UserProfile},
    state::AppState,
    validation::{validate_name, validate_phone, ValidationErrors},
};

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Get the current authenticated user's information.
///
/// Returns the identity carried by the bearer token without touching the
/// store.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(user.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "The caller's own user ID")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.store.read().await.user_by_id(user_id)?;
    Ok(Json(UserProfile::from(&user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "The caller's own user ID")),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut errors = ValidationErrors::new();
    if let Some(first_name) = &request.first_name {
        validate_name(&mut errors, "first_name", first_name);
    }
    if let Some(last_name) = &request.last_name {
        validate_name(&mut errors, "last_name", last_name);
    }
    if let Some(phone) = &request.phone {
        validate_phone(&mut errors, phone);
    }
    errors.into_result()?;

    let user = state.store.write().await.update_user(user_id, request)?;
    tracing::info!(user_id = %user.id, "User profile updated");
    Ok(Json(UserProfile::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Role, store::NewUser};
    use axum::http::StatusCode;

    async fn seeded() -> (AppState, Uuid) {
        let state = AppState::for_tests();
        let user = state
            .store
            .write()
            .await
            .insert_user(NewUser {
                email: "jane@example.com".to_string(),
                password_hash: "hash".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                phone: None,
            })
            .unwrap();
        (state, user.id)
    }

    #[tokio::test]
    async fn user_me_response_from_authenticated_user() {
        let user = AuthenticatedUser {
            user_id: "user_123".to_string(),
            email: Some("jane@example.com".to_string()),
            role: Role::User,
        };

        let Json(response) = get_current_user(Auth(user)).await;
        assert_eq!(response.user_id, "user_123");
        assert_eq!(response.email.as_deref(), Some("jane@example.com"));
        assert_eq!(response.role, Role::User);
    }

    #[tokio::test]
    async fn get_user_found_and_missing() {
        let (state, id) = seeded().await;
        let Json(profile) = get_user(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(profile.email, "jane@example.com");

        let err = get_user(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_user_validates_and_applies() {
        let (state, id) = seeded().await;

        let err = update_user(
            State(state.clone()),
            Path(id),
            Json(UpdateUserRequest {
                first_name: Some("J4ne".to_string()),
                phone: Some("12".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details.unwrap().len(), 2);

        let Json(profile) = update_user(
            State(state),
            Path(id),
            Json(UpdateUserRequest {
                last_name: Some("O'Neil-Smith".to_string()),
                phone: Some("+1 (555) 123-4567".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(profile.first_name, "Jane");
        assert_eq!(profile.last_name, "O'Neil-Smith");
        assert_eq!(profile.phone.as_deref(), Some("+1 (555) 123-4567"));
    }
}
