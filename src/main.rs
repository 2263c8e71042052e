// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process};

use tgfinance_server::{
    api::router,
    config::{Config, LogFormat},
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    init_tracing(config.log.format);

    let addr: SocketAddr = match config.server.bind_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(address = %config.server.bind_address(), error = %e, "Invalid bind address");
            process::exit(1);
        }
    };

    let state = AppState::from_config(&config.auth);
    let app = router(state);

    info!(
        %addr,
        access_ttl_hours = config.auth.access_token_ttl.num_hours(),
        refresh_ttl_hours = config.auth.refresh_token_ttl.num_hours(),
        bcrypt_cost = config.auth.bcrypt_cost,
        "TG Finance server listening (OpenAPI at /api-doc/openapi.json)"
    );

    tokio::select! {
        result = axum_server::bind(addr).serve(app.into_make_service()) => {
            if let Err(e) = result {
                error!(error = %e, "Server failed");
                process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping server");
        }
    }
}
