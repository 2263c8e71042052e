// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    auth::{authenticate, require_admin, require_self, AuthenticatedUser, Role, SelfAccessPolicy},
    error::{ErrorDetail, ErrorEnvelope},
    models::{
        AuthResponse, CreateExpenseRequest, CreateGoalRequest, CreateInvestmentRequest, Expense,
        ExpenseListResponse, FinancialGoal, GoalListResponse, Investment, InvestmentListResponse,
        LoginRequest, PasswordStrengthRequest, PasswordStrengthResponse, RefreshRequest,
        RegisterRequest, SortOrder, TokenPair, UpdateUserRequest, UserListResponse,
        UserMeResponse, UserProfile,
    },
    state::AppState,
    validation::FieldError,
};

pub mod admin;
pub mod auth;
pub mod expenses;
pub mod goals;
pub mod health;
pub mod investments;
pub mod users;

/// Build the full application router.
///
/// Every request passes the authentication middleware first; routes that
/// must be reachable anonymously are listed in the bypass list of
/// `state.auth`.
pub fn router(state: AppState) -> Router {
    let self_routes = Router::new()
        .route(
            "/users/{user_id}",
            get(users::get_user).put(users::update_user),
        )
        .route(
            "/users/{user_id}/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/users/{user_id}/investments",
            get(investments::list_investments).post(investments::create_investment),
        )
        .route(
            "/users/{user_id}/goals",
            get(goals::list_goals).post(goals::create_goal),
        )
        .route_layer(from_fn_with_state(SelfAccessPolicy::default(), require_self));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route_layer(from_fn(require_admin));

    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/password-strength", post(auth::password_strength))
        .route("/users/me", get(users::get_current_user))
        .merge(self_routes)
        .merge(admin_routes);

    let auth_state = state.auth.clone();

    Router::new()
        .route("/health", get(health::health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .nest("/api/v1", v1_routes)
        .with_state(state)
        .layer(from_fn_with_state(auth_state, authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::refresh,
        auth::password_strength,
        users::get_current_user,
        users::get_user,
        users::update_user,
        expenses::list_expenses,
        expenses::create_expense,
        investments::list_investments,
        investments::create_investment,
        goals::list_goals,
        goals::create_goal,
        admin::list_users
    ),
    components(
        schemas(
            AuthenticatedUser,
            Role,
            ErrorEnvelope,
            ErrorDetail,
            FieldError,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            TokenPair,
            AuthResponse,
            PasswordStrengthRequest,
            PasswordStrengthResponse,
            UserProfile,
            UserMeResponse,
            UpdateUserRequest,
            UserListResponse,
            Expense,
            CreateExpenseRequest,
            ExpenseListResponse,
            Investment,
            CreateInvestmentRequest,
            InvestmentListResponse,
            FinancialGoal,
            CreateGoalRequest,
            GoalListResponse,
            SortOrder,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Registration, login and token refresh"),
        (name = "Users", description = "Own profile access"),
        (name = "Expenses", description = "Own expense records"),
        (name = "Investments", description = "Own investment positions"),
        (name = "Goals", description = "Own financial goals"),
        (name = "Admin", description = "Administrative views")
    )
)]
struct ApiDoc;
