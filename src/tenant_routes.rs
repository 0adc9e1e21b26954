// ABOUTME: HTTP routes for enterprise selection, switching, logout, and context introspection
// ABOUTME: JSON endpoints; denials render as 303 redirects with a stable reason code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! Tenant selection and context routes
//!
//! The presentation collaborator renders pages; these handlers speak JSON
//! and carry redirect targets so the front end always has a recovery path.
//! Every handler receives its tenant context from the middleware - none of
//! them re-run resolution.

use std::sync::Arc;

use axum::{
    extract::State,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use http::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::authz::{Decision, Denial, Guard, RedirectTarget};
use crate::context::ServerContext;
use crate::errors::AppError;
use crate::middleware::{tenant_context_middleware, CurrentUser, ExtractedTenantContext};
use crate::models::{Enterprise, RoleType};
use crate::session::Session;
use crate::tenant::SelectionOutcome;

// Request/Response Types

/// Summary of one enterprise for selection and context payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnterpriseSummary {
    /// UUID of the enterprise
    pub enterprise_id: String,
    /// Display name
    pub name: String,
    /// URL-safe slug
    pub slug: String,
}

impl From<&Enterprise> for EnterpriseSummary {
    fn from(enterprise: &Enterprise) -> Self {
        Self {
            enterprise_id: enterprise.id.to_string(),
            name: enterprise.name.clone(),
            slug: enterprise.slug.clone(),
        }
    }
}

/// Response body for the selection page
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionChoicesResponse {
    /// The enterprises the user may choose between
    pub enterprises: Vec<EnterpriseSummary>,
}

/// Request body for submitting an enterprise choice
#[derive(Debug, Deserialize, Serialize)]
pub struct SelectEnterpriseRequest {
    /// UUID of the chosen enterprise
    pub enterprise_id: String,
}

/// Response body after a committed selection
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectedEnterpriseResponse {
    /// The now-current enterprise
    pub enterprise: EnterpriseSummary,
    /// Where the front end should go next
    pub redirect: String,
}

/// Response body for a rejected selection
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionRejectedResponse {
    /// User-facing message
    pub message: String,
    /// Where the front end should go next (back to selection)
    pub redirect: String,
}

/// Response body after a switch-enterprise action
#[derive(Debug, Serialize, Deserialize)]
pub struct SwitchEnterpriseResponse {
    /// One of `unaffiliated`, `auto_selected`, `selection_required`
    pub outcome: String,
    /// The auto-selected enterprise, when there was exactly one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<EnterpriseSummary>,
    /// Choices, when a selection is now required
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enterprises: Vec<EnterpriseSummary>,
    /// Where the front end should go next
    pub redirect: String,
}

/// Response body after logout
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Credential-entry flow
    pub redirect: String,
}

/// Response body describing the current tenant context
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantContextResponse {
    /// The resolved enterprise
    pub enterprise: EnterpriseSummary,
    /// The caller's role there, if any
    pub role: Option<RoleType>,
    /// True when the caller is an active enterprise admin there
    pub is_admin: bool,
}

/// Response body for the enterprise admin overview
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminOverviewResponse {
    /// The administered enterprise
    pub enterprise: EnterpriseSummary,
    /// Codes of all registered applications, in stable order
    pub apps: Vec<String>,
}

/// Build the tenant-facing router over a shared server context
pub fn router(context: Arc<ServerContext>) -> Router {
    Router::new()
        .route(
            "/enterprises/select",
            get(selection_page).post(submit_selection),
        )
        .route("/enterprises/switch", post(switch_enterprise))
        .route("/admin/enterprise", get(admin_overview))
        .route("/tenant/context", get(current_context))
        .route("/auth/logout", post(logout))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&context),
            tenant_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

/// GET /enterprises/select
///
/// Clears any stored selection (entering the awaiting state), then either
/// short-circuits - zero or one employed enterprise never shows a
/// selection page - or returns the choices.
async fn selection_page(
    State(context): State<Arc<ServerContext>>,
    current_user: Option<Extension<CurrentUser>>,
) -> Result<Response, AppError> {
    let Some((current, mut session)) = load_session(&context, current_user.as_deref()) else {
        return Ok(Denial::unauthenticated().into_response());
    };

    let outcome = context.selection().switch(&current.user, &mut session).await?;
    context.sessions.store(session);

    match outcome {
        SelectionOutcome::SelectionRequired(choices) => Ok(Json(SelectionChoicesResponse {
            enterprises: choices.iter().map(EnterpriseSummary::from).collect(),
        })
        .into_response()),
        SelectionOutcome::AutoSelected(_) => Ok(redirect_to(RedirectTarget::Dashboard)),
        SelectionOutcome::Unaffiliated => {
            // Superusers land on the platform-wide enterprise list instead.
            if current.user.is_superuser {
                Ok(redirect_to(RedirectTarget::EnterpriseList))
            } else {
                Ok(redirect_to(RedirectTarget::Dashboard))
            }
        }
    }
}

/// POST /enterprises/select
///
/// Validates the submitted choice against the current employed set. A
/// rejected choice changes nothing and sends the user back to selection.
async fn submit_selection(
    State(context): State<Arc<ServerContext>>,
    current_user: Option<Extension<CurrentUser>>,
    Json(request): Json<SelectEnterpriseRequest>,
) -> Result<Response, AppError> {
    let Some((current, mut session)) = load_session(&context, current_user.as_deref()) else {
        return Ok(Denial::unauthenticated().into_response());
    };

    let submitted = context
        .selection()
        .submit(&current.user, &mut session, &request.enterprise_id)
        .await?;
    context.sessions.store(session);

    match submitted {
        Ok(enterprise) => {
            info!(
                user_id = %current.user.id,
                enterprise_id = %enterprise.id,
                "Enterprise selected"
            );
            Ok(Json(SelectedEnterpriseResponse {
                enterprise: EnterpriseSummary::from(&enterprise),
                redirect: RedirectTarget::Dashboard.path().into(),
            })
            .into_response())
        }
        Err(rejected) => Ok((
            StatusCode::BAD_REQUEST,
            Json(SelectionRejectedResponse {
                message: rejected.to_string(),
                redirect: RedirectTarget::SelectEnterprise.path().into(),
            }),
        )
            .into_response()),
    }
}

/// POST /enterprises/switch
///
/// Explicit "switch enterprise": re-enters the selection state machine.
async fn switch_enterprise(
    State(context): State<Arc<ServerContext>>,
    current_user: Option<Extension<CurrentUser>>,
) -> Result<Response, AppError> {
    let Some((current, mut session)) = load_session(&context, current_user.as_deref()) else {
        return Ok(Denial::unauthenticated().into_response());
    };

    let outcome = context.selection().switch(&current.user, &mut session).await?;
    context.sessions.store(session);

    let response = match outcome {
        SelectionOutcome::Unaffiliated => SwitchEnterpriseResponse {
            outcome: "unaffiliated".into(),
            selected: None,
            enterprises: Vec::new(),
            redirect: if current.user.is_superuser {
                RedirectTarget::EnterpriseList.path().into()
            } else {
                RedirectTarget::Dashboard.path().into()
            },
        },
        SelectionOutcome::AutoSelected(enterprise) => SwitchEnterpriseResponse {
            outcome: "auto_selected".into(),
            selected: Some(EnterpriseSummary::from(&enterprise)),
            enterprises: Vec::new(),
            redirect: RedirectTarget::Dashboard.path().into(),
        },
        SelectionOutcome::SelectionRequired(choices) => SwitchEnterpriseResponse {
            outcome: "selection_required".into(),
            selected: None,
            enterprises: choices.iter().map(EnterpriseSummary::from).collect(),
            redirect: RedirectTarget::SelectEnterprise.path().into(),
        },
    };

    Ok(Json(response).into_response())
}

/// GET /tenant/context
///
/// Generic tenant-scoped endpoint: any resolved context passes, role is
/// irrelevant.
async fn current_context(
    State(context): State<Arc<ServerContext>>,
    current_user: Option<Extension<CurrentUser>>,
    Extension(extracted): Extension<ExtractedTenantContext>,
) -> Result<Response, AppError> {
    let identity = current_user.as_deref().map(|current| &current.user);
    let decision = context
        .authz()
        .authorize(&Guard::TenantRequired, identity, extracted.get())
        .await?;
    if let Decision::Deny(denial) = decision {
        return Ok(denial.into_response());
    }

    let Some(tenant) = extracted.get() else {
        // TenantRequired allowed, so the context is present; this arm is
        // unreachable in practice but keeps the handler total.
        return Ok(Denial::tenant_required().into_response());
    };

    Ok(Json(TenantContextResponse {
        enterprise: EnterpriseSummary::from(&tenant.enterprise),
        role: tenant.role.as_ref().map(|assignment| assignment.role_type),
        is_admin: tenant.is_admin(),
    })
    .into_response())
}

/// GET /admin/enterprise
///
/// Requires the conjunction "tenant resolved AND active enterprise admin
/// there", evaluated left-to-right with short-circuit.
async fn admin_overview(
    State(context): State<Arc<ServerContext>>,
    current_user: Option<Extension<CurrentUser>>,
    Extension(extracted): Extension<ExtractedTenantContext>,
) -> Result<Response, AppError> {
    let identity = current_user.as_deref().map(|current| &current.user);
    let decision = context
        .authz()
        .authorize_all(
            &[Guard::TenantRequired, Guard::EnterpriseAdmin],
            identity,
            extracted.get(),
        )
        .await?;
    if let Decision::Deny(denial) = decision {
        return Ok(denial.into_response());
    }

    let Some(tenant) = extracted.get() else {
        return Ok(Denial::tenant_required().into_response());
    };

    Ok(Json(AdminOverviewResponse {
        enterprise: EnterpriseSummary::from(&tenant.enterprise),
        apps: context
            .apps
            .available_apps()
            .iter()
            .map(|app| app.code.clone())
            .collect(),
    })
    .into_response())
}

/// POST /auth/logout
///
/// Destroys the session outright; the selection dies with it.
async fn logout(
    State(context): State<Arc<ServerContext>>,
    current_user: Option<Extension<CurrentUser>>,
) -> Response {
    if let Some(Extension(current)) = current_user {
        context.sessions.remove(&current.session_token);
        info!(user_id = %current.user.id, "Session terminated");
    }

    Json(LogoutResponse {
        redirect: RedirectTarget::Login.path().into(),
    })
    .into_response()
}

/// Fetch the caller's session alongside the identity, or `None` when the
/// request is unauthenticated.
fn load_session<'a>(
    context: &ServerContext,
    current_user: Option<&'a CurrentUser>,
) -> Option<(&'a CurrentUser, Session)> {
    let current = current_user?;
    let session = context.sessions.get(&current.session_token)?;
    Some((current, session))
}

/// A bare 303 redirect to one of the platform surfaces
fn redirect_to(target: RedirectTarget) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, target.path())]).into_response()
}
