// ABOUTME: Tower middleware for resolving tenant context from the session cookie
// ABOUTME: Injects CurrentUser and ExtractedTenantContext into request extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! Tenant Context Middleware
//!
//! This middleware loads the client session named by the `atrium_session`
//! cookie, looks up the authenticated identity, resolves the current
//! enterprise, and injects the result into Axum request extensions. Route
//! handlers then never re-run resolution.
//!
//! # Design
//!
//! - The middleware does NOT reject unauthenticated requests; it injects
//!   `ExtractedTenantContext(None)` and lets each handler's guards decide.
//! - Session self-healing performed by the resolver (discarding a stale
//!   selection, persisting an auto-selection) is written back to the store
//!   exactly once, so no later request observes a half-applied update.
//! - A failing registry call is an infrastructure error and terminates the
//!   request with a 500-class response; there is no safe fallback.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::authz::Denial;
use crate::constants::session::SESSION_COOKIE;
use crate::context::ServerContext;
use crate::errors::{AppError, AppResult};
use crate::models::{EnterpriseId, User};
use crate::security::cookies::get_cookie_value;
use crate::tenant::TenantContext;

/// Authenticated identity attached to the request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user
    pub user: User,
    /// Token of the session that authenticated this request
    pub session_token: String,
}

/// Extracted tenant context wrapper for request extensions
///
/// Contains `Option<TenantContext>` because some routes are public, some
/// have optional authentication, and resolution may legitimately produce
/// no tenant (unaffiliated user, selection still pending).
#[derive(Debug, Clone)]
pub struct ExtractedTenantContext(pub Option<TenantContext>);

impl ExtractedTenantContext {
    /// Get the tenant context if available
    #[must_use]
    pub const fn get(&self) -> Option<&TenantContext> {
        self.0.as_ref()
    }

    /// Check if tenant context is present
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Get the enterprise ID if available
    #[must_use]
    pub fn enterprise_id(&self) -> Option<EnterpriseId> {
        self.0.as_ref().map(TenantContext::enterprise_id)
    }

    /// Get the user ID if available
    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|context| context.user_id)
    }
}

/// Tenant context middleware
///
/// 1. Extracts the session token from the `atrium_session` cookie
/// 2. Loads the session and the identity it belongs to
/// 3. Resolves the current enterprise, self-healing the session
/// 4. Writes the session back once and injects the extensions
pub async fn tenant_context_middleware(
    State(context): State<Arc<ServerContext>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = get_cookie_value(req.headers(), SESSION_COOKIE);

    let authenticated = match token {
        Some(token) => match resolve_request_identity(&context, &token).await {
            Ok(resolved) => resolved,
            // Registry unavailability has no safe fallback; surface it.
            Err(error) => return error.into_response(),
        },
        None => {
            debug!("No session cookie found, proceeding without tenant context");
            None
        }
    };

    let tenant_context = match authenticated {
        Some(authenticated) => {
            if let Some(ref ctx) = authenticated.tenant {
                tracing::Span::current()
                    .record("enterprise_id", ctx.enterprise_id().to_string())
                    .record("tenant_user_id", ctx.user_id.to_string());
            }
            req.extensions_mut().insert(CurrentUser {
                user: authenticated.user,
                session_token: authenticated.session_token,
            });
            authenticated.tenant
        }
        None => None,
    };

    req.extensions_mut()
        .insert(ExtractedTenantContext(tenant_context));

    next.run(req).await
}

/// Everything the middleware learned about one authenticated request
struct AuthenticatedRequest {
    user: User,
    session_token: String,
    tenant: Option<TenantContext>,
}

/// Load the session, its identity, and the resolved tenant context
///
/// Returns `None` (not an error) when the session is unknown or points at
/// a vanished identity - those requests simply proceed unauthenticated.
async fn resolve_request_identity(
    context: &Arc<ServerContext>,
    token: &str,
) -> AppResult<Option<AuthenticatedRequest>> {
    let Some(mut session) = context.sessions.get(token) else {
        debug!("Unknown session token, proceeding without tenant context");
        return Ok(None);
    };

    let Some(user) = context.identities.user_by_id(session.user_id).await? else {
        warn!(
            user_id = %session.user_id,
            "Session points at a missing identity, dropping the session"
        );
        context.sessions.remove(token);
        return Ok(None);
    };

    if !user.is_active {
        debug!(user_id = %user.id, "Identity is disabled, proceeding without tenant context");
        return Ok(None);
    }

    let tenant = context.resolver().resolve_context(&user, &mut session).await?;

    // Single write-back: resolver side effects (stale-selection discard,
    // auto-selection persist) become visible to later requests atomically.
    let session_token = session.token.clone();
    context.sessions.store(session);

    Ok(Some(AuthenticatedRequest {
        user,
        session_token,
        tenant,
    }))
}

/// Require an authenticated identity on the request
///
/// # Errors
///
/// Returns the unauthenticated [`Denial`] (redirect to the login flow)
/// when no identity is attached.
pub fn require_identity(current_user: Option<&CurrentUser>) -> Result<&CurrentUser, Denial> {
    current_user.ok_or_else(Denial::unauthenticated)
}

/// Require tenant context on the request
///
/// Use this in route handlers that REQUIRE a resolved enterprise.
///
/// # Errors
///
/// Returns `AppError::tenant_required` when no tenant context is present.
pub fn require_tenant_context(
    extracted: &ExtractedTenantContext,
) -> Result<&TenantContext, AppError> {
    extracted.get().ok_or_else(AppError::tenant_required)
}
