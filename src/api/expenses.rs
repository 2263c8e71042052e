// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-user expense endpoints, guarded by self-access.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateExpenseRequest, Expense, ExpenseListResponse, PageQuery},
    state::AppState,
    store::NewExpense,
    validation::{
        validate_amount, validate_date, validate_length, validate_pagination, validate_required,
        validate_sort_order, ValidationErrors,
    },
};

const MAX_DESCRIPTION_LENGTH: usize = 255;
const MAX_PAYMENT_METHOD_LENGTH: usize = 50;

fn validate_expense(request: CreateExpenseRequest) -> Result<NewExpense, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    validate_amount(&mut errors, "amount", request.amount);
    if validate_required(&mut errors, "description", &request.description) {
        validate_length(
            &mut errors,
            "description",
            &request.description,
            0,
            MAX_DESCRIPTION_LENGTH,
        );
    }
    let expense_date = validate_date(&mut errors, "expense_date", &request.expense_date);
    if let Some(method) = &request.payment_method {
        validate_length(&mut errors, "payment_method", method, 0, MAX_PAYMENT_METHOD_LENGTH);
    }

    match expense_date {
        Some(expense_date) if !errors.has_errors() => Ok(NewExpense {
            category_id: request.category_id,
            amount: request.amount,
            description: request.description,
            expense_date,
            payment_method: request.payment_method,
        }),
        _ => Err(errors),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/expenses",
    params(
        ("user_id" = Uuid, Path, description = "The caller's own user ID"),
        PageQuery
    ),
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "One page of expenses", body = ExpenseListResponse),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 422, description = "Invalid pagination or sort order"),
    )
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    let mut errors = ValidationErrors::new();
    validate_pagination(&mut errors, query.page, query.limit);
    let order = validate_sort_order(&mut errors, query.sort_order.as_deref());
    errors.into_result()?;

    let (expenses, total) = state.store.read().await.list_expenses(
        user_id,
        query.page,
        query.limit,
        order.unwrap_or_default(),
    );

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        page: query.page,
        limit: query.limit,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/expenses",
    params(("user_id" = Uuid, Path, description = "The caller's own user ID")),
    request_body = CreateExpenseRequest,
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Expense recorded", body = Expense),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create_expense(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let new_expense = validate_expense(request)?;
    let expense = state.store.write().await.add_expense(user_id, new_expense)?;
    tracing::debug!(user_id = %user_id, expense_id = %expense.id, "Expense recorded");
    Ok((StatusCode::CREATED, Json(expense)))
}
