// ABOUTME: Application constants shared across modules
// ABOUTME: Session cookie naming, server defaults, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! Application constants

/// Session-related constants
pub mod session {
    /// Name of the cookie carrying the session token
    pub const SESSION_COOKIE: &str = "atrium_session";

    /// Default bound on live sessions held in memory
    pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;
}

/// Server defaults
pub mod defaults {
    /// Default HTTP bind host
    pub const HTTP_HOST: &str = "127.0.0.1";

    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;
}

/// Service identity for structured logging
pub mod service_names {
    /// The platform server
    pub const ATRIUM_SERVER: &str = "atrium-server";
}
