// ABOUTME: Read-only query contracts over identity and employment facts
// ABOUTME: Defines the EmploymentRegistry and IdentityProvider traits consumed by the core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Employment Registry
//!
//! The query contract the tenant resolver and the authorization engine
//! depend on. Mutation of employment data (onboarding, resignation,
//! deletion) belongs to external collaborators; this core only reads.
//!
//! A failing registry call is an infrastructure error and is surfaced
//! upward unmodified - there is no safe fallback for "the directory is
//! unreachable".

/// In-memory implementation backed by concurrent maps
pub mod memory;

pub use memory::MemoryDirectory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{Enterprise, EnterpriseId, EmploymentStatus, RoleAssignment, RoleType, User};

/// Read-only lookup of authenticated identities
///
/// The identity collaborator owns account data; the core reads the stable
/// id and the superuser flag and never mutates either.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch a user account by its stable id
    async fn user_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
}

/// Read-only queries over User x Enterprise membership facts
///
/// Invariant: at most one employment record exists per (user, enterprise)
/// pair, so the per-pair queries are unambiguous.
#[async_trait]
pub trait EmploymentRegistry: Send + Sync {
    /// All enterprises where the user holds an employment record with
    /// status `Employed`; unique, order-irrelevant
    async fn employed_enterprises(&self, user_id: Uuid) -> AppResult<Vec<Enterprise>>;

    /// Employment status for the (user, enterprise) pair, if a record exists
    async fn employment_status(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<EmploymentStatus>>;

    /// Role assignment attached to the (user, enterprise) employment
    /// record; `None` when there is no record or no assignment
    async fn role_assignment(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<RoleAssignment>>;

    /// Fetch an enterprise by id
    async fn enterprise_by_id(
        &self,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<Enterprise>>;

    /// Role type within the given enterprise, if any
    async fn role_for(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<RoleType>> {
        Ok(self
            .role_assignment(user_id, enterprise_id)
            .await?
            .map(|assignment| assignment.role_type))
    }

    /// True when the user holds an *active* `enterprise_admin` assignment
    /// within exactly this enterprise
    ///
    /// Capability never aggregates across tenants: an admin at enterprise A
    /// is whatever their assignment at enterprise B says at enterprise B.
    async fn is_active_enterprise_admin(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<bool> {
        Ok(self
            .role_assignment(user_id, enterprise_id)
            .await?
            .is_some_and(|assignment| assignment.is_active_admin()))
    }
}
