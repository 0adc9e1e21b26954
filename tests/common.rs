// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides directory fixtures, counting registry wrappers, and context builders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Atrium Platform
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `atrium`
//!
//! Common setup functions to reduce duplication across integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use uuid::Uuid;

use atrium::apps::AppRegistry;
use atrium::config::ServerConfig;
use atrium::context::ServerContext;
use atrium::employment::{EmploymentRegistry, IdentityProvider, MemoryDirectory};
use atrium::errors::AppResult;
use atrium::models::{
    Enterprise, EnterpriseId, EmploymentStatus, RoleAssignment, RoleType, User, UserType,
};
use atrium::session::MemorySessionStore;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test directory setup
pub fn create_test_directory() -> Arc<MemoryDirectory> {
    init_test_logging();
    Arc::new(MemoryDirectory::new())
}

/// Create a standard enterprise-affiliated user
pub fn create_test_user(directory: &MemoryDirectory, username: &str) -> User {
    let user = User::new(username, UserType::EnterpriseUser);
    directory.insert_user(user.clone());
    user
}

/// Create a system superuser
pub fn create_test_superuser(directory: &MemoryDirectory, username: &str) -> User {
    let user = User::new_superuser(username);
    directory.insert_user(user.clone());
    user
}

/// Create a test enterprise
pub fn create_test_enterprise(directory: &MemoryDirectory, name: &str, slug: &str) -> Enterprise {
    let enterprise = Enterprise::new(name, slug);
    directory.insert_enterprise(enterprise.clone());
    enterprise
}

/// Build a server context over the given directory and app registry
pub fn create_test_context(
    directory: Arc<MemoryDirectory>,
    apps: AppRegistry,
) -> Arc<ServerContext> {
    let sessions = Arc::new(MemorySessionStore::new(64));
    let identities: Arc<dyn IdentityProvider> = directory.clone();
    Arc::new(ServerContext::new(
        identities,
        directory,
        Arc::new(apps),
        sessions,
        Arc::new(ServerConfig::default()),
    ))
}

/// Registry wrapper that counts queries, for fast-path assertions
pub struct CountingRegistry {
    inner: Arc<MemoryDirectory>,
    employed_calls: AtomicUsize,
    role_calls: AtomicUsize,
}

impl CountingRegistry {
    pub fn new(inner: Arc<MemoryDirectory>) -> Self {
        Self {
            inner,
            employed_calls: AtomicUsize::new(0),
            role_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `employed_enterprises` fetches so far
    pub fn employed_calls(&self) -> usize {
        self.employed_calls.load(Ordering::SeqCst)
    }

    /// Number of `role_assignment` fetches so far
    pub fn role_calls(&self) -> usize {
        self.role_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmploymentRegistry for CountingRegistry {
    async fn employed_enterprises(&self, user_id: Uuid) -> AppResult<Vec<Enterprise>> {
        self.employed_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.employed_enterprises(user_id).await
    }

    async fn employment_status(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<EmploymentStatus>> {
        self.inner.employment_status(user_id, enterprise_id).await
    }

    async fn role_assignment(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<RoleAssignment>> {
        self.role_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.role_assignment(user_id, enterprise_id).await
    }

    async fn enterprise_by_id(
        &self,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<Enterprise>> {
        self.inner.enterprise_by_id(enterprise_id).await
    }
}

/// Registry wrapper that fails every call, for infrastructure-error tests
pub struct FailingRegistry;

#[async_trait]
impl EmploymentRegistry for FailingRegistry {
    async fn employed_enterprises(&self, _user_id: Uuid) -> AppResult<Vec<Enterprise>> {
        Err(atrium::errors::AppError::registry("directory offline"))
    }

    async fn employment_status(
        &self,
        _user_id: Uuid,
        _enterprise_id: EnterpriseId,
    ) -> AppResult<Option<EmploymentStatus>> {
        Err(atrium::errors::AppError::registry("directory offline"))
    }

    async fn role_assignment(
        &self,
        _user_id: Uuid,
        _enterprise_id: EnterpriseId,
    ) -> AppResult<Option<RoleAssignment>> {
        Err(atrium::errors::AppError::registry("directory offline"))
    }

    async fn enterprise_by_id(
        &self,
        _enterprise_id: EnterpriseId,
    ) -> AppResult<Option<Enterprise>> {
        Err(atrium::errors::AppError::registry("directory offline"))
    }
}

/// Employ a user with a role at an enterprise
pub fn employ_with_role(
    directory: &MemoryDirectory,
    user: &User,
    enterprise: &Enterprise,
    role: RoleType,
) {
    directory.employ_with_role(user.id, enterprise.id, role);
}
