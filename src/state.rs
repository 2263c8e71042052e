// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AuthState, PasswordHasher, TokenService};
use crate::config::AuthConfig;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub auth: AuthState,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(store: InMemoryStore, auth: AuthState, hasher: PasswordHasher) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            auth,
            hasher,
        }
    }

    /// Build state from loaded configuration with an empty store.
    pub fn from_config(config: &AuthConfig) -> Self {
        let tokens = TokenService::new(&config.jwt_secret)
            .with_lifetimes(config.access_token_ttl, config.refresh_token_ttl);
        Self::new(
            InMemoryStore::new(),
            AuthState::new(tokens),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }

    pub fn tokens(&self) -> &TokenService {
        &self.auth.tokens
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            InMemoryStore::new(),
            AuthState::new(TokenService::new(b"test-signing-key")),
            PasswordHasher::new(4),
        )
    }
}
