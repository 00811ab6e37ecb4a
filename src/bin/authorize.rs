// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-time helper that obtains a Spotify refresh token via the
//! authorization-code flow and displays it for the operator to copy.

use spotify_stats_relay::config::AuthHelperConfig;
use spotify_stats_relay::routes::authorize::{create_router, AuthHelperState};
use spotify_stats_relay::services::SpotifyClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = AuthHelperConfig::from_env().expect("Failed to load configuration");
    let port = config.port;

    let state = Arc::new(AuthHelperState {
        config,
        client: SpotifyClient::new(),
    });
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Open this URL in your browser: http://localhost:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
