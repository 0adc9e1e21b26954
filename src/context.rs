// ABOUTME: Explicit dependency bundle passed to the HTTP layer as Axum state
// ABOUTME: Wires the resolver, selection service, and authorization engine over shared registries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Server Context
//!
//! Every consumer receives its collaborators through this explicit bundle;
//! there is no ambient global lookup anywhere in the crate. The app
//! registry is frozen before the context is constructed, and the context
//! itself is immutable once built.

use std::sync::Arc;

use crate::apps::AppRegistry;
use crate::authz::AuthzEngine;
use crate::config::ServerConfig;
use crate::employment::{EmploymentRegistry, IdentityProvider};
use crate::session::MemorySessionStore;
use crate::tenant::{EnterpriseSelection, TenantResolver};

/// Shared dependencies for the request-handling layer
pub struct ServerContext {
    /// Identity lookups (read-only)
    pub identities: Arc<dyn IdentityProvider>,
    /// Employment and enterprise lookups (read-only)
    pub registry: Arc<dyn EmploymentRegistry>,
    /// Frozen application catalog
    pub apps: Arc<AppRegistry>,
    /// Bounded session storage
    pub sessions: Arc<MemorySessionStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    resolver: TenantResolver,
    selection: EnterpriseSelection,
    authz: AuthzEngine,
}

impl ServerContext {
    /// Assemble the context from its collaborators
    #[must_use]
    pub fn new(
        identities: Arc<dyn IdentityProvider>,
        registry: Arc<dyn EmploymentRegistry>,
        apps: Arc<AppRegistry>,
        sessions: Arc<MemorySessionStore>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let resolver = TenantResolver::new(Arc::clone(&registry));
        let selection = EnterpriseSelection::new(Arc::clone(&registry));
        let authz = AuthzEngine::new(Arc::clone(&registry), Arc::clone(&apps));
        Self {
            identities,
            registry,
            apps,
            sessions,
            config,
            resolver,
            selection,
            authz,
        }
    }

    /// The per-request tenant context resolver
    #[must_use]
    pub const fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    /// The enterprise selection state machine
    #[must_use]
    pub const fn selection(&self) -> &EnterpriseSelection {
        &self.selection
    }

    /// The authorization engine
    #[must_use]
    pub const fn authz(&self) -> &AuthzEngine {
        &self.authz
    }
}
