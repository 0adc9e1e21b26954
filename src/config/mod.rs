// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-driven server configuration with typed log level and environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! Configuration module for the Atrium platform server
//!
//! Configuration comes exclusively from environment variables; every value
//! has a development-friendly default so the server starts with nothing
//! set.

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, LogLevel, ServerConfig};
