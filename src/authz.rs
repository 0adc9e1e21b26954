// ABOUTME: Layered authorization engine evaluating role-gated guards per request
// ABOUTME: Produces allow or a structured denial with reason code and redirect target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Authorization Engine
//!
//! Evaluates a closed set of guard predicates against the authenticated
//! identity and the resolved tenant context:
//!
//! 1. [`Guard::SystemSuperuser`] - platform administrators only.
//! 2. [`Guard::EnterpriseAdmin`] - an *active* `enterprise_admin` role in
//!    exactly the resolved enterprise.
//! 3. [`Guard::TenantRequired`] - any resolved enterprise context.
//! 4. [`Guard::AppAdmin`] - the registered admin predicate of a business
//!    application.
//!
//! The superuser check runs first in every role-gated tier and
//! short-circuits tenant lookups. Unauthenticated identities are denied
//! before any tenant or role work. Denials are data, never panics: a
//! stable reason code plus the redirect target the presentation layer
//! should send the user to. The worst observable outcome of this engine is
//! a redirect.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::apps::AppRegistry;
use crate::employment::EmploymentRegistry;
use crate::errors::AppResult;
use crate::models::User;
use crate::tenant::TenantContext;

/// Closed set of authorization guards
///
/// Call sites may require a conjunction of guards via
/// [`AuthzEngine::authorize_all`]; evaluation is left-to-right and stops at
/// the first denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Platform-wide administrator
    SystemSuperuser,
    /// Active `enterprise_admin` role within the resolved enterprise
    EnterpriseAdmin,
    /// Any resolved enterprise context, regardless of role
    TenantRequired,
    /// Admin of the business application registered under this code
    AppAdmin(String),
}

/// Stable denial reason codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    /// No authenticated identity
    #[serde(rename = "AUTHENTICATION_REQUIRED")]
    AuthenticationRequired,
    /// The guard needs a resolved enterprise and none is present
    #[serde(rename = "TENANT_REQUIRED")]
    TenantRequired,
    /// Enterprise resolved but the role tier is too low
    #[serde(rename = "INSUFFICIENT_ROLE")]
    InsufficientRole,
}

impl DenialReason {
    /// Stable string form, used in headers and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::TenantRequired => "TENANT_REQUIRED",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
        }
    }
}

/// Where the presentation layer should send a denied user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// Credential-entry flow
    Login,
    /// Enterprise selection flow
    SelectEnterprise,
    /// Generic landing surface
    Dashboard,
    /// Platform-wide enterprise list (superuser landing)
    EnterpriseList,
}

impl RedirectTarget {
    /// Path of the redirect target
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::SelectEnterprise => "/enterprises/select",
            Self::Dashboard => "/dashboard",
            Self::EnterpriseList => "/enterprises",
        }
    }
}

/// A structured authorization denial
///
/// Interactive-user behavior: every denial carries a recovery path, never
/// a bare machine-readable status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Denial {
    /// Stable reason code
    pub reason: DenialReason,
    /// Recovery destination for the user
    pub redirect: RedirectTarget,
    /// User-facing message
    pub message: String,
}

impl Denial {
    /// Denial for a request with no authenticated identity
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            reason: DenialReason::AuthenticationRequired,
            redirect: RedirectTarget::Login,
            message: "Please sign in to continue".into(),
        }
    }

    /// Denial for a guard that needs a resolved enterprise
    #[must_use]
    pub fn tenant_required() -> Self {
        Self {
            reason: DenialReason::TenantRequired,
            redirect: RedirectTarget::SelectEnterprise,
            message: "Please select or create an enterprise first".into(),
        }
    }

    /// Denial for an insufficient role tier
    pub fn insufficient_role(message: impl Into<String>) -> Self {
        Self {
            reason: DenialReason::InsufficientRole,
            redirect: RedirectTarget::Dashboard,
            message: message.into(),
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        (
            StatusCode::SEE_OTHER,
            [
                (header::LOCATION, self.redirect.path()),
                (
                    header::HeaderName::from_static("x-denial-reason"),
                    self.reason.as_str(),
                ),
            ],
            Json(self),
        )
            .into_response()
    }
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone)]
pub enum Decision {
    /// The operation may proceed
    Allow,
    /// The operation is denied; the denial says where to send the user
    Deny(Denial),
}

impl Decision {
    /// True when the decision allows the operation
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Convert into a `Result`, for `?`-style handler flow
    ///
    /// # Errors
    ///
    /// Returns the denial when the decision is [`Decision::Deny`].
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(denial) => Err(denial),
        }
    }
}

/// Evaluates guards against identity, tenant context, and the app registry
pub struct AuthzEngine {
    registry: Arc<dyn EmploymentRegistry>,
    apps: Arc<AppRegistry>,
}

impl AuthzEngine {
    /// Create an engine over the employment registry and app registry
    #[must_use]
    pub fn new(registry: Arc<dyn EmploymentRegistry>, apps: Arc<AppRegistry>) -> Self {
        Self { registry, apps }
    }

    /// Evaluate a single guard
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails;
    /// authorization outcomes are always `Ok(Decision)`.
    pub async fn authorize(
        &self,
        guard: &Guard,
        identity: Option<&User>,
        tenant: Option<&TenantContext>,
    ) -> AppResult<Decision> {
        // Every tier rejects unauthenticated requests before any tenant or
        // role lookup happens.
        let Some(user) = identity else {
            return Ok(Decision::Deny(Denial::unauthenticated()));
        };

        match guard {
            Guard::SystemSuperuser => {
                if user.is_superuser {
                    Ok(Decision::Allow)
                } else {
                    Ok(Decision::Deny(Denial::insufficient_role(
                        "System administrator privileges are required to access this page",
                    )))
                }
            }
            Guard::EnterpriseAdmin => self.authorize_enterprise_admin(user, tenant).await,
            Guard::TenantRequired => {
                // Gates on context, not rank: superusers must select an
                // enterprise to enter tenant-scoped screens too.
                if tenant.is_some() {
                    Ok(Decision::Allow)
                } else {
                    Ok(Decision::Deny(Denial::tenant_required()))
                }
            }
            Guard::AppAdmin(app_code) => Ok(self.authorize_app_admin(app_code, user, tenant)),
        }
    }

    /// Evaluate a conjunction of guards left-to-right, stopping at the
    /// first denial so later tiers never do unnecessary work.
    ///
    /// # Errors
    ///
    /// Returns an error only when the employment registry itself fails.
    pub async fn authorize_all(
        &self,
        guards: &[Guard],
        identity: Option<&User>,
        tenant: Option<&TenantContext>,
    ) -> AppResult<Decision> {
        for guard in guards {
            if let Decision::Deny(denial) = self.authorize(guard, identity, tenant).await? {
                debug!(
                    guard = ?guard,
                    reason = denial.reason.as_str(),
                    "Guard conjunction denied"
                );
                return Ok(Decision::Deny(denial));
            }
        }
        Ok(Decision::Allow)
    }

    async fn authorize_enterprise_admin(
        &self,
        user: &User,
        tenant: Option<&TenantContext>,
    ) -> AppResult<Decision> {
        // Superuser tier decides first; no tenant lookup needed.
        if user.is_superuser {
            return Ok(Decision::Allow);
        }

        let Some(context) = tenant else {
            return Ok(Decision::Deny(Denial::tenant_required()));
        };

        if self
            .registry
            .is_active_enterprise_admin(user.id, context.enterprise_id())
            .await?
        {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(Denial::insufficient_role(
                "Enterprise administrator privileges are required to access this page",
            )))
        }
    }

    fn authorize_app_admin(
        &self,
        app_code: &str,
        user: &User,
        tenant: Option<&TenantContext>,
    ) -> Decision {
        if user.is_superuser {
            return Decision::Allow;
        }

        if !self.apps.contains(app_code) {
            warn!(app_code = %app_code, "App admin check against an unregistered app");
            return Decision::Deny(Denial::insufficient_role(format!(
                "No application is registered under '{app_code}'"
            )));
        }

        if self.apps.is_app_admin(app_code, user, tenant) {
            Decision::Allow
        } else {
            Decision::Deny(Denial::insufficient_role(format!(
                "Administrator privileges for '{app_code}' are required to access this page"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_redirect_mapping() {
        assert_eq!(
            Denial::unauthenticated().redirect,
            RedirectTarget::Login
        );
        assert_eq!(
            Denial::tenant_required().redirect,
            RedirectTarget::SelectEnterprise
        );
        assert_eq!(
            Denial::insufficient_role("nope").redirect,
            RedirectTarget::Dashboard
        );
    }

    #[test]
    fn test_redirect_paths() {
        assert_eq!(RedirectTarget::Login.path(), "/auth/login");
        assert_eq!(RedirectTarget::SelectEnterprise.path(), "/enterprises/select");
    }
}
