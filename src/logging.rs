// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Configures log levels, formatters, and output destinations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Atrium Platform

//! Production-ready logging configuration with structured output

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LogLevel;
use crate::constants::service_names;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    /// Parse from string with fallback to pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log level when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Service name for structured logging
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::Pretty,
            service_name: service_names::ATRIUM_SERVER.into(),
        }
    }
}

impl LoggingConfig {
    /// Build a logging configuration from a level plus `LOG_FORMAT`
    #[must_use]
    pub fn from_level(level: LogLevel) -> Self {
        let format = env::var("LOG_FORMAT")
            .map(|value| LogFormat::from_str_or_default(&value))
            .unwrap_or(LogFormat::Pretty);
        Self {
            level,
            format,
            ..Self::default()
        }
    }
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level so operators can
/// raise verbosity per-module without redeploying.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .try_init()
            .context("failed to install JSON tracing subscriber")?,
        LogFormat::Pretty => registry
            .with(fmt::layer())
            .try_init()
            .context("failed to install tracing subscriber")?,
        LogFormat::Compact => registry
            .with(fmt::layer().compact())
            .try_init()
            .context("failed to install compact tracing subscriber")?,
    }

    tracing::info!(
        service = %config.service_name,
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("COMPACT"), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default("other"), LogFormat::Pretty);
    }
}
