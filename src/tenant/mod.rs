// ABOUTME: Tenant context resolution for the multi-tenant platform core
// ABOUTME: Provides the per-request TenantContext plus the resolver and selection state machine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Atrium Platform

//! # Tenant Context
//!
//! A [`TenantContext`] is the per-request answer to "which enterprise is
//! this request scoped to, and what is the caller there". It is computed
//! fresh for every request by the [`resolver`] - selection state is
//! re-validated, never trusted across requests - and consumed by the
//! authorization engine and route handlers.

/// Per-request tenant context resolution
pub mod resolver;
/// Enterprise selection state machine
pub mod selection;

pub use resolver::TenantResolver;
pub use selection::{EnterpriseSelection, SelectionOutcome, SelectionRejected};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Enterprise, EnterpriseId, RoleAssignment, RoleType};

/// Resolved tenant context for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantContext {
    /// The resolved enterprise
    pub enterprise: Enterprise,
    /// User the context was resolved for
    pub user_id: Uuid,
    /// The user's role assignment within this enterprise, if any
    ///
    /// Snapshot taken at resolution time; a role at any *other* enterprise
    /// is invisible here by design.
    pub role: Option<RoleAssignment>,
}

impl TenantContext {
    /// Create a new tenant context
    #[must_use]
    pub const fn new(enterprise: Enterprise, user_id: Uuid, role: Option<RoleAssignment>) -> Self {
        Self {
            enterprise,
            user_id,
            role,
        }
    }

    /// Id of the resolved enterprise
    #[must_use]
    pub const fn enterprise_id(&self) -> EnterpriseId {
        self.enterprise.id
    }

    /// True when the user holds the given role here and it is active
    #[must_use]
    pub fn has_active_role(&self, role_type: RoleType) -> bool {
        self.role
            .as_ref()
            .is_some_and(|assignment| assignment.is_active && assignment.role_type == role_type)
    }

    /// True when the user is an active enterprise admin of this enterprise
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role
            .as_ref()
            .is_some_and(RoleAssignment::is_active_admin)
    }
}
