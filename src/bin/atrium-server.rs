// ABOUTME: Server binary for the Atrium multi-tenant platform
// ABOUTME: Loads configuration, registers built-in applications, and serves the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Atrium Platform Server Binary
//!
//! Starts the platform HTTP surface over an in-memory directory. Identity
//! onboarding and employment administration are external collaborators; a
//! deployment wires its own registry implementations into
//! [`ServerContext`] in place of the demo directory.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use atrium::apps::{builtin, AppRegistry};
use atrium::config::ServerConfig;
use atrium::context::ServerContext;
use atrium::employment::{IdentityProvider, MemoryDirectory};
use atrium::logging::{init_logging, LoggingConfig};
use atrium::session::MemorySessionStore;
use atrium::tenant_routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = ServerConfig::from_env()?;

    // Initialize production logging
    init_logging(&LoggingConfig::from_level(config.log_level))?;

    info!(
        environment = %config.environment,
        port = config.http_port,
        "Starting Atrium platform server"
    );

    // Each business application registers exactly once at startup; the
    // registry is frozen before anything can consult it.
    let apps = Arc::new(
        AppRegistry::builder()
            .register(builtin::skill_certification())
            .build(),
    );

    let directory = Arc::new(MemoryDirectory::new());
    let identities: Arc<dyn IdentityProvider> = directory.clone();
    let sessions = Arc::new(MemorySessionStore::new(config.session_capacity));
    let bind_addr = config.bind_addr()?;

    let context = Arc::new(ServerContext::new(
        identities,
        directory,
        apps,
        sessions,
        Arc::new(config),
    ));

    let app = tenant_routes::router(context);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
