// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store of users and their expenses, investments and goals.
//!
//! Inputs are validated by the handlers before they reach the store; the
//! store only enforces its own invariants (unique email, known user IDs).
//! Emails are compared case-insensitively and stored lowercased.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Expense, FinancialGoal, Investment, SortOrder, UpdateUserRequest, User};

/// Validated data for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Validated data for a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub description: String,
    pub expense_date: NaiveDate,
    pub payment_method: Option<String>,
}

/// Validated data for a new investment.
#[derive(Debug, Clone)]
pub struct NewInvestment {
    pub type_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub current_value: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub interest_rate: Option<f64>,
    pub institution: Option<String>,
    pub account_number: Option<String>,
    pub notes: Option<String>,
}

/// Validated data for a new financial goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub target_date: Option<NaiveDate>,
    pub goal_type: String,
    pub priority: String,
}

const ACTIVE_STATUS: &str = "active";

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<Uuid, User>,
    user_ids_by_email: HashMap<String, Uuid>,
    expenses: HashMap<Uuid, Vec<Expense>>,
    investments: HashMap<Uuid, Vec<Investment>>,
    goals: HashMap<Uuid, Vec<FinancialGoal>>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Slice one 1-based page out of `items`, returning it with the full count.
fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> (Vec<T>, usize) {
    let total = items.len();
    let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
    let page = items
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .collect();
    (page, total)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, new_user: NewUser) -> Result<User, ApiError> {
        let email = normalize_email(&new_user.email);
        if self.user_ids_by_email.contains_key(&email) {
            return Err(ApiError::conflict("A user with this email already exists"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            password_hash: new_user.password_hash,
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            phone: new_user.phone,
            created_at: now,
            updated_at: now,
            is_active: true,
            last_login: None,
        };

        self.user_ids_by_email.insert(email, user.id);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn user_by_id(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.user_ids_by_email
            .get(&normalize_email(email))
            .and_then(|id| self.users.get(id))
            .cloned()
    }

    pub fn update_user(
        &mut self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let Some(user) = self.users.get_mut(&user_id) else {
            return Err(ApiError::not_found("User not found"));
        };

        if let Some(first_name) = request.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            user.phone = Some(phone);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    /// Stamp `last_login` with the current time.
    pub fn record_login(&mut self, user_id: Uuid) -> Result<User, ApiError> {
        let Some(user) = self.users.get_mut(&user_id) else {
            return Err(ApiError::not_found("User not found"));
        };
        user.last_login = Some(Utc::now());
        Ok(user.clone())
    }

    /// Every account, oldest first.
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        users
    }

    pub fn add_expense(&mut self, user_id: Uuid, new_expense: NewExpense) -> Result<Expense, ApiError> {
        self.ensure_user(user_id)?;

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            user_id,
            category_id: new_expense.category_id,
            amount: new_expense.amount,
            description: new_expense.description.trim().to_string(),
            expense_date: new_expense.expense_date,
            payment_method: new_expense.payment_method,
            created_at: now,
            updated_at: now,
        };

        self.expenses.entry(user_id).or_default().push(expense.clone());
        Ok(expense)
    }

    /// One page of a user's expenses ordered by expense date (ties broken by
    /// creation time), plus the total number of expenses the user has.
    pub fn list_expenses(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> (Vec<Expense>, usize) {
        let mut expenses = self.expenses.get(&user_id).cloned().unwrap_or_default();
        expenses.sort_by(|a, b| {
            a.expense_date
                .cmp(&b.expense_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        if order == SortOrder::Desc {
            expenses.reverse();
        }
        paginate(expenses, page, limit)
    }

    fn ensure_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(ApiError::not_found("User not found"))
        }
    }

    pub fn add_investment(
        &mut self,
        user_id: Uuid,
        new_investment: NewInvestment,
    ) -> Result<Investment, ApiError> {
        self.ensure_user(user_id)?;

        let now = Utc::now();
        let investment = Investment {
            id: Uuid::new_v4(),
            user_id,
            type_id: new_investment.type_id,
            name: new_investment.name.trim().to_string(),
            amount: new_investment.amount,
            current_value: new_investment.current_value,
            start_date: new_investment.start_date,
            end_date: new_investment.end_date,
            interest_rate: new_investment.interest_rate,
            institution: new_investment.institution,
            account_number: new_investment.account_number,
            notes: new_investment.notes,
            status: ACTIVE_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.investments
            .entry(user_id)
            .or_default()
            .push(investment.clone());
        Ok(investment)
    }

    /// One page of a user's investments ordered by start date.
    pub fn list_investments(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> (Vec<Investment>, usize) {
        let mut investments = self.investments.get(&user_id).cloned().unwrap_or_default();
        investments.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        if order == SortOrder::Desc {
            investments.reverse();
        }
        paginate(investments, page, limit)
    }

    pub fn add_goal(&mut self, user_id: Uuid, new_goal: NewGoal) -> Result<FinancialGoal, ApiError> {
        self.ensure_user(user_id)?;

        let now = Utc::now();
        let goal = FinancialGoal {
            id: Uuid::new_v4(),
            user_id,
            name: new_goal.name.trim().to_string(),
            description: new_goal.description,
            target_amount: new_goal.target_amount,
            current_amount: 0.0,
            target_date: new_goal.target_date,
            goal_type: new_goal.goal_type,
            priority: new_goal.priority,
            status: ACTIVE_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.goals.entry(user_id).or_default().push(goal.clone());
        Ok(goal)
    }

    /// One page of a user's goals ordered by creation time.
    pub fn list_goals(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> (Vec<FinancialGoal>, usize) {
        let mut goals = self.goals.get(&user_id).cloned().unwrap_or_default();
        goals.sort_by_key(|goal| goal.created_at);
        if order == SortOrder::Desc {
            goals.reverse();
        }
        paginate(goals, page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
        }
    }

    fn new_expense(day: u32, amount: f64) -> NewExpense {
        NewExpense {
            category_id: None,
            amount,
            description: format!("expense {day}"),
            expense_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            payment_method: None,
        }
    }

    #[test]
    fn duplicate_email_conflicts_case_insensitively() {
        let mut store = InMemoryStore::new();
        let user = store.insert_user(new_user("Jane@Example.com")).unwrap();
        assert_eq!(user.email, "jane@example.com");

        let err = store.insert_user(new_user("jane@example.COM")).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn lookups_by_id_and_email() {
        let mut store = InMemoryStore::new();
        let user = store.insert_user(new_user("a@b.co")).unwrap();

        assert_eq!(store.user_by_id(user.id).unwrap().id, user.id);
        assert_eq!(store.user_by_email(" A@B.CO ").unwrap().id, user.id);
        assert!(store.user_by_email("nobody@b.co").is_none());
        assert_eq!(
            store.user_by_id(Uuid::new_v4()).unwrap_err().status,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut store = InMemoryStore::new();
        let user = store.insert_user(new_user("a@b.co")).unwrap();

        let updated = store
            .update_user(
                user.id,
                UpdateUserRequest {
                    first_name: Some("Janet".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.first_name, "Janet");
        assert_eq!(updated.last_name, "Doe");
        assert!(updated.updated_at >= user.updated_at);

        let err = store
            .update_user(Uuid::new_v4(), UpdateUserRequest::default())
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn record_login_sets_timestamp() {
        let mut store = InMemoryStore::new();
        let user = store.insert_user(new_user("a@b.co")).unwrap();
        assert!(user.last_login.is_none());
        assert!(store.record_login(user.id).unwrap().last_login.is_some());
    }

    #[test]
    fn expenses_are_scoped_sorted_and_paged() {
        let mut store = InMemoryStore::new();
        let alice = store.insert_user(new_user("alice@b.co")).unwrap();
        let bob = store.insert_user(new_user("bob@b.co")).unwrap();

        for day in 1..=5 {
            store.add_expense(alice.id, new_expense(day, 10.0)).unwrap();
        }
        store.add_expense(bob.id, new_expense(9, 99.0)).unwrap();

        let (first, total) = store.list_expenses(alice.id, 1, 2, SortOrder::Desc);
        assert_eq!(total, 5);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].expense_date.to_string(), "2026-01-05");
        assert!(first.iter().all(|e| e.user_id == alice.id));

        let (last, _) = store.list_expenses(alice.id, 3, 2, SortOrder::Desc);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].expense_date.to_string(), "2026-01-01");

        let (beyond, total) = store.list_expenses(alice.id, 10, 2, SortOrder::Desc);
        assert!(beyond.is_empty());
        assert_eq!(total, 5);
    }

    #[test]
    fn ascending_order_flips_the_listing() {
        let mut store = InMemoryStore::new();
        let alice = store.insert_user(new_user("alice@b.co")).unwrap();
        for day in [3, 1, 2] {
            store.add_expense(alice.id, new_expense(day, 10.0)).unwrap();
        }

        let (ascending, _) = store.list_expenses(alice.id, 1, 10, SortOrder::Asc);
        let days: Vec<_> = ascending.iter().map(|e| e.expense_date.to_string()).collect();
        assert_eq!(days, vec!["2026-01-01", "2026-01-02", "2026-01-03"]);
    }

    #[test]
    fn investments_and_goals_are_scoped_to_their_owner() {
        let mut store = InMemoryStore::new();
        let alice = store.insert_user(new_user("alice@b.co")).unwrap();
        let bob = store.insert_user(new_user("bob@b.co")).unwrap();

        let investment = store
            .add_investment(
                alice.id,
                NewInvestment {
                    type_id: Uuid::new_v4(),
                    name: " Index fund ".to_string(),
                    amount: 1000.0,
                    current_value: None,
                    start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                    end_date: None,
                    interest_rate: Some(4.5),
                    institution: None,
                    account_number: None,
                    notes: None,
                },
            )
            .unwrap();
        assert_eq!(investment.name, "Index fund");
        assert_eq!(investment.status, "active");

        let goal = store
            .add_goal(
                bob.id,
                NewGoal {
                    name: "Car".to_string(),
                    description: None,
                    target_amount: 8000.0,
                    target_date: None,
                    goal_type: "purchase".to_string(),
                    priority: "medium".to_string(),
                },
            )
            .unwrap();
        assert_eq!(goal.current_amount, 0.0);

        let (alice_investments, total) = store.list_investments(alice.id, 1, 20, SortOrder::Desc);
        assert_eq!((alice_investments, total), (vec![investment], 1));
        assert_eq!(store.list_investments(bob.id, 1, 20, SortOrder::Desc).1, 0);
        assert_eq!(store.list_goals(bob.id, 1, 20, SortOrder::Asc).0, vec![goal]);
        assert_eq!(store.list_goals(alice.id, 1, 20, SortOrder::Asc).1, 0);
    }

    #[test]
    fn expense_for_unknown_user_is_not_found() {
        let mut store = InMemoryStore::new();
        let err = store
            .add_expense(Uuid::new_v4(), new_expense(1, 1.0))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = store
            .add_goal(
                Uuid::new_v4(),
                NewGoal {
                    name: "Trip".to_string(),
                    description: None,
                    target_amount: 1.0,
                    target_date: None,
                    goal_type: "savings".to_string(),
                    priority: "low".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
