// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TG Finance - Personal Finance Backend
//!
//! Stateless JWT authentication and access control in front of a small
//! user and expense API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, password hashing, middleware and guards
//! - `config` - Environment-driven configuration
//! - `validation` - Field validators and the aggregated error type

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;
