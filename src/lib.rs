// ABOUTME: Main library entry point for the Atrium business platform core
// ABOUTME: Multi-tenant context resolution and layered authorization over Axum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

#![deny(unsafe_code)]

//! # Atrium Platform Core
//!
//! A multi-tenant business platform core. A single authenticated identity
//! may be employed by several independent enterprises at once; every
//! protected operation is evaluated against both the identity's global
//! standing and its role within whichever enterprise is currently active
//! for the session.
//!
//! ## Architecture
//!
//! - **Employment Registry**: read-only query contract over
//!   User x Enterprise membership facts
//! - **Tenant Context Resolver**: computes the current enterprise per
//!   request, self-healing stale session state
//! - **Enterprise Selection**: the state machine behind login routing,
//!   explicit selection, and switching
//! - **Authorization Engine**: ordered guard tiers producing allow or a
//!   structured denial with a redirect target
//! - **App Registry**: process-wide catalog of pluggable business
//!   applications, frozen after startup
//!
//! ## Example
//!
//! ```rust,no_run
//! use atrium::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Atrium server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access
// them.

/// Process-wide catalog of pluggable business applications
pub mod apps;

/// Layered authorization engine and guard definitions
pub mod authz;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Explicit dependency bundle for the request-handling layer
pub mod context;

/// Registry contracts over identity and employment facts
pub mod employment;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for tenant context propagation
pub mod middleware;

/// Core data models
pub mod models;

/// Security utilities for the HTTP surface
pub mod security;

/// Client session state and the bounded session store
pub mod session;

/// Tenant context, resolver, and enterprise selection
pub mod tenant;

/// HTTP routes for enterprise selection and context introspection
pub mod tenant_routes;
