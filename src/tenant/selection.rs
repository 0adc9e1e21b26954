// ABOUTME: Enterprise selection state machine for login, switch, and explicit choice
// ABOUTME: Validates submitted choices against the current employed set before committing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Enterprise Selection
//!
//! Governs how a session's enterprise selection is set, reconfirmed, or
//! cleared:
//!
//! - successful authentication re-enters `NoSelection`, unconditionally
//!   clearing any stored selection (no stale cross-login leakage);
//! - zero employed enterprises is terminal for the session
//!   ([`SelectionOutcome::Unaffiliated`]);
//! - exactly one is auto-selected and persisted
//!   ([`SelectionOutcome::AutoSelected`]);
//! - more than one requires an explicit choice
//!   ([`SelectionOutcome::SelectionRequired`]), submitted via [`submit`]
//!   and validated against the *current* employed set - an invalid choice
//!   is rejected with a user-facing message and no state change.
//!
//! A committed selection is never trusted across requests; the resolver
//! re-validates it on every resolution.
//!
//! [`submit`]: EnterpriseSelection::submit

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::employment::EmploymentRegistry;
use crate::errors::AppResult;
use crate::models::{Enterprise, EnterpriseId, User};
use crate::session::Session;

/// Result of re-entering the selection state machine
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// No employed enterprise; terminal for this session
    Unaffiliated,
    /// Exactly one employed enterprise; selected and persisted
    AutoSelected(Enterprise),
    /// More than one employed enterprise; the user must choose
    SelectionRequired(Vec<Enterprise>),
}

/// A submitted choice that was not accepted; the awaiting state is unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionRejected {
    /// Nothing was submitted
    #[error("an enterprise must be chosen")]
    Empty,
    /// The submitted value is not an enterprise id
    #[error("the chosen enterprise id is not valid")]
    Malformed,
    /// The enterprise is not in the identity's employed set
    #[error("you do not have access to the chosen enterprise")]
    NotEmployed,
    /// The enterprise does not exist (superuser choices only)
    #[error("the chosen enterprise does not exist")]
    Unknown,
}

/// Enterprise selection service over the employment registry
pub struct EnterpriseSelection {
    registry: Arc<dyn EmploymentRegistry>,
}

impl EnterpriseSelection {
    /// Create a selection service
    #[must_use]
    pub fn new(registry: Arc<dyn EmploymentRegistry>) -> Self {
        Self { registry }
    }

    /// Re-enter the state machine after successful authentication
    ///
    /// Any previously stored selection is cleared first, unconditionally.
    /// Superusers are reported as [`SelectionOutcome::Unaffiliated`] - they
    /// need no employment record and the caller routes them to the
    /// platform-wide enterprise list instead of the selection screen.
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails.
    pub async fn on_login(
        &self,
        user: &User,
        session: &mut Session,
    ) -> AppResult<SelectionOutcome> {
        session.clear_selection();
        if user.is_superuser {
            return Ok(SelectionOutcome::Unaffiliated);
        }
        self.recompute(user, session).await
    }

    /// Explicit "switch enterprise": drop the selection and recompute
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails.
    pub async fn switch(&self, user: &User, session: &mut Session) -> AppResult<SelectionOutcome> {
        debug!(user_id = %user.id, "Switching enterprise, clearing selection");
        session.clear_selection();
        if user.is_superuser {
            return Ok(SelectionOutcome::Unaffiliated);
        }
        self.recompute(user, session).await
    }

    /// The enterprises the user may currently choose between
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails.
    pub async fn choices(&self, user: &User) -> AppResult<Vec<Enterprise>> {
        self.registry.employed_enterprises(user.id).await
    }

    /// Commit a submitted enterprise choice
    ///
    /// The choice is validated against the identity's *current* employed
    /// set (or, for superusers, against enterprise existence). A rejected
    /// choice leaves the session untouched: `AwaitingSelection` stays
    /// `AwaitingSelection`.
    ///
    /// # Errors
    ///
    /// The outer error is registry failure; the inner [`SelectionRejected`]
    /// is the user-facing rejection.
    pub async fn submit(
        &self,
        user: &User,
        session: &mut Session,
        raw_choice: &str,
    ) -> AppResult<Result<Enterprise, SelectionRejected>> {
        let raw_choice = raw_choice.trim();
        if raw_choice.is_empty() {
            return Ok(Err(SelectionRejected::Empty));
        }
        let Ok(enterprise_id) = raw_choice.parse::<EnterpriseId>() else {
            debug!(value = %raw_choice, "Rejected malformed enterprise choice");
            return Ok(Err(SelectionRejected::Malformed));
        };

        if user.is_superuser {
            return self.submit_superuser(session, enterprise_id).await;
        }

        let employed = self.registry.employed_enterprises(user.id).await?;
        let Some(enterprise) = employed
            .into_iter()
            .find(|enterprise| enterprise.id == enterprise_id)
        else {
            info!(
                user_id = %user.id,
                enterprise_id = %enterprise_id,
                "Rejected enterprise choice outside the employed set"
            );
            return Ok(Err(SelectionRejected::NotEmployed));
        };

        session.select(enterprise.id);
        info!(
            user_id = %user.id,
            enterprise_id = %enterprise.id,
            "Enterprise selection committed"
        );
        Ok(Ok(enterprise))
    }

    /// Logout clears the selection unconditionally
    pub fn logout(session: &mut Session) {
        session.clear_selection();
    }

    /// Superusers choose from all existing enterprises
    async fn submit_superuser(
        &self,
        session: &mut Session,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Result<Enterprise, SelectionRejected>> {
        match self.registry.enterprise_by_id(enterprise_id).await? {
            Some(enterprise) => {
                session.select(enterprise.id);
                Ok(Ok(enterprise))
            }
            None => Ok(Err(SelectionRejected::Unknown)),
        }
    }

    /// Apply the 0/1/N rule from a single fetch of the employed set
    async fn recompute(&self, user: &User, session: &mut Session) -> AppResult<SelectionOutcome> {
        let mut employed = self.registry.employed_enterprises(user.id).await?;

        match employed.len() {
            0 => Ok(SelectionOutcome::Unaffiliated),
            1 => {
                let Some(enterprise) = employed.pop() else {
                    return Ok(SelectionOutcome::Unaffiliated);
                };
                session.select(enterprise.id);
                debug!(
                    user_id = %user.id,
                    enterprise_id = %enterprise.id,
                    "Auto-selected sole employed enterprise at login"
                );
                Ok(SelectionOutcome::AutoSelected(enterprise))
            }
            _ => Ok(SelectionOutcome::SelectionRequired(employed)),
        }
    }
}
