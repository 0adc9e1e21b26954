// ABOUTME: Process-wide catalog of pluggable business applications
// ABOUTME: Frozen after startup; consulted for app admin predicates and menu construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # App Registry
//!
//! Each business application registers itself once during startup with an
//! [`AppDescriptor`]: a unique code, display metadata, a declared
//! capability list, and an admin predicate. The registry is built through
//! [`AppRegistryBuilder`] and immutable afterwards - it is passed by
//! `Arc` to every consumer, never looked up through a global.
//!
//! Re-registering an existing code silently overwrites the prior entry
//! (with a warning). This is a known footgun retained deliberately: the
//! boot order of the legacy platform relies on later registrations
//! shadowing earlier ones.
//!
//! Admin predicates are synchronous closures over the request-resolved
//! `(identity, tenant context)` pair; anything a predicate needs must be
//! resolved into the context before authorization runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::models::User;
use crate::tenant::TenantContext;

/// Admin predicate of one business application
pub type AdminPredicate = Arc<dyn Fn(&User, Option<&TenantContext>) -> bool + Send + Sync>;

/// Descriptor of one pluggable business application
#[derive(Clone)]
pub struct AppDescriptor {
    /// Unique application code (registry key)
    pub code: String,
    /// Display name
    pub name: String,
    /// Short description for navigation surfaces
    pub description: String,
    /// Application version
    pub version: String,
    /// Declared capability list
    pub capabilities: Vec<String>,
    admin_predicate: AdminPredicate,
}

impl AppDescriptor {
    /// Create a descriptor with the mandatory fields
    pub fn new<F>(code: impl Into<String>, name: impl Into<String>, admin_predicate: F) -> Self
    where
        F: Fn(&User, Option<&TenantContext>) -> bool + Send + Sync + 'static,
    {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            version: "1.0.0".into(),
            capabilities: Vec::new(),
            admin_predicate: Arc::new(admin_predicate),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Declare a capability
    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Evaluate this application's admin predicate
    #[must_use]
    pub fn is_admin(&self, user: &User, tenant: Option<&TenantContext>) -> bool {
        (self.admin_predicate)(user, tenant)
    }
}

impl fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// Collects app registrations during startup
#[derive(Debug, Default)]
pub struct AppRegistryBuilder {
    apps: HashMap<String, AppDescriptor>,
}

impl AppRegistryBuilder {
    /// Register an application descriptor
    ///
    /// A duplicate code overwrites the earlier registration, last write
    /// wins; the shadowing is logged so it is observable.
    #[must_use]
    pub fn register(mut self, descriptor: AppDescriptor) -> Self {
        if let Some(previous) = self.apps.insert(descriptor.code.clone(), descriptor) {
            warn!(
                app_code = %previous.code,
                "Duplicate app registration, overwriting the earlier entry"
            );
        }
        self
    }

    /// Freeze the registry
    #[must_use]
    pub fn build(self) -> AppRegistry {
        info!(apps = self.apps.len(), "App registry frozen");
        AppRegistry { apps: self.apps }
    }
}

/// Immutable catalog of registered applications
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: HashMap<String, AppDescriptor>,
}

impl AppRegistry {
    /// Start collecting registrations
    #[must_use]
    pub fn builder() -> AppRegistryBuilder {
        AppRegistryBuilder::default()
    }

    /// Fetch a descriptor by code
    #[must_use]
    pub fn get(&self, app_code: &str) -> Option<&AppDescriptor> {
        self.apps.get(app_code)
    }

    /// True when an application is registered under this code
    #[must_use]
    pub fn contains(&self, app_code: &str) -> bool {
        self.apps.contains_key(app_code)
    }

    /// Iterate over all registered applications
    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.apps.values()
    }

    /// All applications in stable code order, for menu construction
    #[must_use]
    pub fn available_apps(&self) -> Vec<&AppDescriptor> {
        let mut apps: Vec<&AppDescriptor> = self.apps.values().collect();
        apps.sort_by(|a, b| a.code.cmp(&b.code));
        apps
    }

    /// Number of registered applications
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// True when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Evaluate the admin predicate registered under `app_code`
    ///
    /// False when no application is registered under the code.
    #[must_use]
    pub fn is_app_admin(
        &self,
        app_code: &str,
        user: &User,
        tenant: Option<&TenantContext>,
    ) -> bool {
        self.apps
            .get(app_code)
            .is_some_and(|descriptor| descriptor.is_admin(user, tenant))
    }
}

/// Applications shipped with the platform
pub mod builtin {
    use super::AppDescriptor;
    use crate::models::{RoleType, User};
    use crate::tenant::TenantContext;

    /// Occupational skill-level certification, the platform's first
    /// pluggable application
    ///
    /// Certification is administered within each enterprise by its
    /// department managers and enterprise admins.
    #[must_use]
    pub fn skill_certification() -> AppDescriptor {
        AppDescriptor::new(
            "skill_certification",
            "Skill Level Certification",
            |_: &User, tenant: Option<&TenantContext>| {
                tenant.is_some_and(|context| {
                    context.has_active_role(RoleType::DepartmentManager) || context.is_admin()
                })
            },
        )
        .with_description("Occupational skill-level certification management")
        .with_capability("manage_certification")
        .with_capability("view_reports")
    }
}
