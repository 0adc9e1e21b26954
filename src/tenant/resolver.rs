// ABOUTME: Per-request tenant context resolution over session state and employment facts
// ABOUTME: Self-heals stale selections and auto-selects for single-enterprise users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Tenant Context Resolver
//!
//! Computes the current enterprise for a request from the authenticated
//! identity and the session's selected-enterprise value.
//!
//! The resolver is read-only against persisted state with one permitted
//! side effect: discarding (or writing) the session selection. Stale,
//! deleted, or malformed selections are never errors - they are normalized
//! to "absent" and the fallback rule runs. Only a failing registry call
//! propagates, as an infrastructure error.
//!
//! Resolution order:
//!
//! 1. Superusers: the session selection names the enterprise if it still
//!    exists; no employment record is required.
//! 2. A valid selection pointing at an *employed* enterprise wins (fast
//!    path, no set computation).
//! 3. Otherwise the employed set is fetched once: zero means unaffiliated,
//!    exactly one is auto-selected *and persisted*, more than one means
//!    the caller must send the user through enterprise selection.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::employment::EmploymentRegistry;
use crate::errors::AppResult;
use crate::models::{Enterprise, EnterpriseId, EmploymentStatus, User};
use crate::session::Session;

use super::TenantContext;

/// Resolves the current enterprise for each request
pub struct TenantResolver {
    registry: Arc<dyn EmploymentRegistry>,
}

impl TenantResolver {
    /// Create a resolver over an employment registry
    #[must_use]
    pub fn new(registry: Arc<dyn EmploymentRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve the current enterprise for `user`, updating `session` in place
    ///
    /// The caller owns writing the mutated session back to its store, once,
    /// together with any other session changes for the request.
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails.
    #[tracing::instrument(skip(self, user, session), fields(user_id = %user.id))]
    pub async fn resolve(
        &self,
        user: &User,
        session: &mut Session,
    ) -> AppResult<Option<Enterprise>> {
        if user.is_superuser {
            return self.resolve_superuser(session).await;
        }

        // Fast path: a prior selection that still points at an employed
        // enterprise.
        if let Some(enterprise_id) = parse_selection(session) {
            if let Some(enterprise) = self.verify_selection(user.id, enterprise_id).await? {
                return Ok(Some(enterprise));
            }
            // Self-healing: drop the stale value and fall through.
            debug!(
                enterprise_id = %enterprise_id,
                "Discarding stale enterprise selection"
            );
            session.clear_selection();
        } else if session.selected_enterprise().is_some() {
            // Malformed value: normalized to absent rather than erroring.
            session.clear_selection();
        }

        self.resolve_from_employment(user, session).await
    }

    /// Resolve and build the full per-request [`TenantContext`]
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails.
    pub async fn resolve_context(
        &self,
        user: &User,
        session: &mut Session,
    ) -> AppResult<Option<TenantContext>> {
        let Some(enterprise) = self.resolve(user, session).await? else {
            return Ok(None);
        };
        let role = self.registry.role_assignment(user.id, enterprise.id).await?;
        Ok(Some(TenantContext::new(enterprise, user.id, role)))
    }

    /// Superusers may scope themselves to any existing enterprise; they are
    /// never required to hold an employment record.
    async fn resolve_superuser(&self, session: &mut Session) -> AppResult<Option<Enterprise>> {
        let Some(enterprise_id) = parse_selection(session) else {
            session.clear_selection();
            return Ok(None);
        };

        match self.registry.enterprise_by_id(enterprise_id).await? {
            Some(enterprise) => Ok(Some(enterprise)),
            None => {
                debug!(
                    enterprise_id = %enterprise_id,
                    "Superuser selection points at a missing enterprise, clearing"
                );
                session.clear_selection();
                Ok(None)
            }
        }
    }

    /// Check that a selected enterprise is still one the user is employed
    /// at, and that the enterprise record itself still exists.
    async fn verify_selection(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<Enterprise>> {
        let status = self
            .registry
            .employment_status(user_id, enterprise_id)
            .await?;
        if status != Some(EmploymentStatus::Employed) {
            return Ok(None);
        }

        let enterprise = self.registry.enterprise_by_id(enterprise_id).await?;
        if enterprise.is_none() {
            warn!(
                user_id = %user_id,
                enterprise_id = %enterprise_id,
                "Employment record exists but the enterprise does not"
            );
        }
        Ok(enterprise)
    }

    /// The 0/1/N fallback. The employed set is fetched once and reused for
    /// both the count branch and the final assignment, so a concurrent
    /// membership change cannot produce a torn read within this request.
    async fn resolve_from_employment(
        &self,
        user: &User,
        session: &mut Session,
    ) -> AppResult<Option<Enterprise>> {
        let employed = self.registry.employed_enterprises(user.id).await?;

        if employed.is_empty() {
            debug!("User has no employed enterprise, resolving to none");
            return Ok(None);
        }

        if employed.len() > 1 {
            debug!(
                count = employed.len(),
                "Multiple employed enterprises, selection required"
            );
            return Ok(None);
        }

        let Some(enterprise) = employed.into_iter().next() else {
            return Ok(None);
        };

        // Always persisted, so the next request takes the fast path.
        session.select(enterprise.id);
        debug!(
            enterprise_id = %enterprise.id,
            "Auto-selected sole employed enterprise"
        );
        Ok(Some(enterprise))
    }
}

/// Parse the session's selected-enterprise value, treating malformed input
/// as absent.
fn parse_selection(session: &Session) -> Option<EnterpriseId> {
    let raw = session.selected_enterprise()?;
    match raw.parse::<EnterpriseId>() {
        Ok(enterprise_id) => Some(enterprise_id),
        Err(error) => {
            warn!(
                value = %raw,
                error = %error,
                "Malformed enterprise selection in session, treating as absent"
            );
            None
        }
    }
}
