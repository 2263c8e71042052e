// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only API endpoints.
//!
//! These routes are layered with the admin role guard and additionally take
//! the [`AdminOnly`] extractor.

use axum::{extract::State, Json};

use crate::{
    auth::AdminOnly,
    models::{UserListResponse, UserProfile},
    state::AppState,
};

/// List every registered account.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Forbidden - admin role required"),
    )
)]
pub async fn list_users(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Json<UserListResponse> {
    let users: Vec<UserProfile> = state
        .store
        .read()
        .await
        .list_users()
        .iter()
        .map(UserProfile::from)
        .collect();

    tracing::info!(admin_id = %admin.user_id, count = users.len(), "Admin listed users");
    Json(UserListResponse {
        total: users.len(),
        users,
    })
}
