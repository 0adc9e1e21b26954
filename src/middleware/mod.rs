// ABOUTME: HTTP middleware for authentication context propagation
// ABOUTME: Resolves the tenant context once per request and exposes it via extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

/// Tenant context extraction middleware
pub mod tenant;

pub use tenant::{
    require_identity, require_tenant_context, tenant_context_middleware, CurrentUser,
    ExtractedTenantContext,
};
