// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-user investment endpoints, guarded by self-access.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateInvestmentRequest, Investment, InvestmentListResponse, PageQuery},
    state::AppState,
    store::NewInvestment,
    validation::{
        validate_amount, validate_date, validate_length, validate_pagination, validate_required,
        validate_sort_order, validate_uuid, ValidationErrors,
    },
};

const MAX_NAME_LENGTH: usize = 100;
const MAX_INSTITUTION_LENGTH: usize = 100;
const MAX_ACCOUNT_NUMBER_LENGTH: usize = 50;
const MAX_NOTES_LENGTH: usize = 500;

fn validate_investment(
    request: CreateInvestmentRequest,
) -> Result<NewInvestment, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let type_id = validate_uuid(&mut errors, "type_id", &request.type_id);
    if validate_required(&mut errors, "name", &request.name) {
        validate_length(&mut errors, "name", &request.name, 0, MAX_NAME_LENGTH);
    }
    validate_amount(&mut errors, "amount", request.amount);
    if let Some(current_value) = request.current_value {
        // Positions can be worth nothing, but never less.
        if current_value.is_nan() || current_value < 0.0 {
            errors.add("current_value", "current_value cannot be negative");
        }
    }
    let start_date = validate_date(&mut errors, "start_date", &request.start_date);
    let end_date = request
        .end_date
        .as_deref()
        .and_then(|end| validate_date(&mut errors, "end_date", end));
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.add("end_date", "end_date must not be before start_date");
        }
    }
    if let Some(rate) = request.interest_rate {
        if rate.is_nan() || !(0.0..=100.0).contains(&rate) {
            errors.add("interest_rate", "interest_rate must be between 0 and 100");
        }
    }
    if let Some(institution) = &request.institution {
        validate_length(&mut errors, "institution", institution, 0, MAX_INSTITUTION_LENGTH);
    }
    if let Some(account_number) = &request.account_number {
        validate_length(
            &mut errors,
            "account_number",
            account_number,
            0,
            MAX_ACCOUNT_NUMBER_LENGTH,
        );
    }
    if let Some(notes) = &request.notes {
        validate_length(&mut errors, "notes", notes, 0, MAX_NOTES_LENGTH);
    }

    match (type_id, start_date) {
        (Some(type_id), Some(start_date)) if !errors.has_errors() => Ok(NewInvestment {
            type_id,
            name: request.name,
            amount: request.amount,
            current_value: request.current_value,
            start_date,
            end_date,
            interest_rate: request.interest_rate,
            institution: request.institution,
            account_number: request.account_number,
            notes: request.notes,
        }),
        _ => Err(errors),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/investments",
    params(
        ("user_id" = Uuid, Path, description = "The caller's own user ID"),
        PageQuery
    ),
    tag = "Investments",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "One page of investments", body = InvestmentListResponse),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 422, description = "Invalid pagination or sort order"),
    )
)]
pub async fn list_investments(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<InvestmentListResponse>, ApiError> {
    let mut errors = ValidationErrors::new();
    validate_pagination(&mut errors, query.page, query.limit);
    let order = validate_sort_order(&mut errors, query.sort_order.as_deref());
    errors.into_result()?;

    let (investments, total) = state.store.read().await.list_investments(
        user_id,
        query.page,
        query.limit,
        order.unwrap_or_default(),
    );

    Ok(Json(InvestmentListResponse {
        investments,
        total,
        page: query.page,
        limit: query.limit,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/investments",
    params(("user_id" = Uuid, Path, description = "The caller's own user ID")),
    request_body = CreateInvestmentRequest,
    tag = "Investments",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Investment recorded", body = Investment),
        (status = 403, description = "Cannot access another user's resources"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create_investment(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateInvestmentRequest>,
) -> Result<(StatusCode, Json<Investment>), ApiError> {
    let new_investment = validate_investment(request)?;
    let investment = state
        .store
        .write()
        .await
        .add_investment(user_id, new_investment)?;
    tracing::debug!(user_id = %user_id, investment_id = %investment.id, "Investment recorded");
    Ok((StatusCode::CREATED, Json(investment)))
}
