// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-user financial goal endpoints, guarded by self-access.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        CreateGoalRequest, FinancialGoal, GoalListResponse, PageQuery, GOAL_PRIORITIES, GOAL_TYPES,
    },
    state::AppState,
    store::NewGoal,
    validation::{
        validate_amount, validate_date, validate_length, validate_one_of, validate_pagination,
        validate_required, validate_sort_order, ValidationErrors,
    },
};

const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;

fn validate_goal(request: CreateGoalRequest) -> Result<NewGoal, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if validate_required(&mut errors, "name", &request.name) {
        validate_length(&mut errors, "name", &request.name, 0, MAX_NAME_LENGTH);
    }
    if let Some(description) = &request.description {
        validate_length(&mut errors, "description", description, 0, MAX_DESCRIPTION_LENGTH);
    }
    validate_amount(&mut errors, "target_amount", request.target_amount);
    let target_date = request
        .target_date
        .as_deref()
        .and_then(|date| validate_date(&mut errors, "target_date", date));
    validate_one_of(&mut errors, "goal_type", &request.goal_type, GOAL_TYPES);
    validate_one_of(&mut errors, "priority", &request.priority, GOAL_PRIORITIES);

    errors.into_result()?;
    Ok(NewGoal {
        name: request.name,
        description: request.description,
        target_amount: request.target_amount,
        target_date,
        goal_type: request.goal_type,
        priority: request.priority,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/goals",
    params(
        ("user_id" = Uuid, Path, description = "The caller's own user ID"),
        PageQuery
    ),
    tag = "Goals",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "One page of goals", body = GoalListResponse),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 422, description = "Invalid pagination or sort order"),
    )
)]
pub async fn list_goals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<GoalListResponse>, ApiError> {
    let mut errors = ValidationErrors::new();
    validate_pagination(&mut errors, query.page, query.limit);
    let order = validate_sort_order(&mut errors, query.sort_order.as_deref());
    errors.into_result()?;

    let (goals, total) = state.store.read().await.list_goals(
        user_id,
        query.page,
        query.limit,
        order.unwrap_or_default(),
    );

    Ok(Json(GoalListResponse {
        goals,
        total,
        page: query.page,
        limit: query.limit,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/goals",
    params(("user_id" = Uuid, Path, description = "The caller's own user ID")),
    request_body = CreateGoalRequest,
    tag = "Goals",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Goal created", body = FinancialGoal),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create_goal(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<FinancialGoal>), ApiError> {
    let new_goal = validate_goal(request)?;
    let goal = state.store.write().await.add_goal(user_id, new_goal)?;
    tracing::debug!(user_id = %user_id, goal_id = %goal.id, "Goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}
