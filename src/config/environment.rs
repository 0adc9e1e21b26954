// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! Environment-based configuration management for production deployment

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{defaults, session};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }

    /// String form accepted by `tracing_subscriber::EnvFilter`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
            Self::Testing => f.write_str("testing"),
        }
    }
}

/// Server configuration assembled from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind host (`HTTP_HOST`)
    pub http_host: String,
    /// HTTP port (`HTTP_PORT`)
    pub http_port: u16,
    /// Deployment environment (`ENVIRONMENT`)
    pub environment: Environment,
    /// Log level (`LOG_LEVEL`)
    pub log_level: LogLevel,
    /// Bound on live in-memory sessions (`SESSION_CAPACITY`)
    pub session_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: defaults::HTTP_HOST.into(),
            http_port: defaults::HTTP_PORT,
            environment: Environment::default(),
            log_level: LogLevel::default(),
            session_capacity: session::DEFAULT_SESSION_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Every variable has a default; unparsable numeric values are warned
    /// about and fall back rather than aborting startup.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; the `Result` is kept so stricter
    /// validation can be added without breaking callers.
    pub fn from_env() -> Result<Self> {
        let http_host = env::var("HTTP_HOST").unwrap_or_else(|_| defaults::HTTP_HOST.into());
        let http_port = parse_env_or("HTTP_PORT", defaults::HTTP_PORT);
        let environment = env::var("ENVIRONMENT")
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();
        let log_level = env::var("LOG_LEVEL")
            .map(|value| LogLevel::from_str_or_default(&value))
            .unwrap_or_default();
        let session_capacity = parse_env_or("SESSION_CAPACITY", session::DEFAULT_SESSION_CAPACITY);

        Ok(Self {
            http_host,
            http_port,
            environment,
            log_level,
            session_capacity,
        })
    }

    /// The socket address the server binds to
    ///
    /// # Errors
    ///
    /// Returns an error when `http_host` is not a valid IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.http_host, self.http_port))
    }
}

/// Parse an environment variable, warning and falling back on bad input
fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %value, "Unparsable value, using default");
            default
        }),
        Err(_) => default,
    }
}
