// ABOUTME: DashMap-backed in-memory implementation of the registry contracts
// ABOUTME: Carries the mutators external onboarding collaborators would own
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! In-memory directory of users, enterprises, and employment records.
//!
//! Used by the test suite and the demo server binary. A persistent
//! implementation is a drop-in behind the same traits; the mutators here
//! stand in for the onboarding/administration collaborators that own
//! employment data in a full deployment.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    Employment, EmploymentStatus, Enterprise, EnterpriseId, RoleAssignment, RoleType, User,
};

use super::{EmploymentRegistry, IdentityProvider};

/// One membership fact plus its optional role assignment
#[derive(Debug, Clone)]
struct MembershipRecord {
    employment: Employment,
    role: Option<RoleAssignment>,
}

/// In-memory directory implementing both registry contracts
#[derive(Default)]
pub struct MemoryDirectory {
    users: DashMap<Uuid, User>,
    enterprises: DashMap<EnterpriseId, Enterprise>,
    // Keyed by (user, enterprise): the map itself enforces the
    // one-record-per-pair invariant.
    memberships: DashMap<(Uuid, EnterpriseId), MembershipRecord>,
}

impl MemoryDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user account
    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Add or replace an enterprise
    pub fn insert_enterprise(&self, enterprise: Enterprise) {
        self.enterprises.insert(enterprise.id, enterprise);
    }

    /// Create an employed record for (user, enterprise) with no role
    ///
    /// Replaces any existing record for the pair.
    pub fn employ(&self, user_id: Uuid, enterprise_id: EnterpriseId) {
        self.memberships.insert(
            (user_id, enterprise_id),
            MembershipRecord {
                employment: Employment::new(user_id, enterprise_id),
                role: None,
            },
        );
    }

    /// Create an employed record carrying an active role assignment
    pub fn employ_with_role(&self, user_id: Uuid, enterprise_id: EnterpriseId, role: RoleType) {
        self.memberships.insert(
            (user_id, enterprise_id),
            MembershipRecord {
                employment: Employment::new(user_id, enterprise_id),
                role: Some(RoleAssignment::new(role)),
            },
        );
    }

    /// Mark the (user, enterprise) record resigned; false when no record exists
    pub fn resign(&self, user_id: Uuid, enterprise_id: EnterpriseId) -> bool {
        self.memberships
            .get_mut(&(user_id, enterprise_id))
            .map(|mut record| record.employment.status = EmploymentStatus::Resigned)
            .is_some()
    }

    /// Delete the (user, enterprise) record outright; false when absent
    pub fn remove_employment(&self, user_id: Uuid, enterprise_id: EnterpriseId) -> bool {
        self.memberships.remove(&(user_id, enterprise_id)).is_some()
    }

    /// Attach or replace the role assignment on an existing record
    ///
    /// Returns false when there is no employment record to attach to.
    pub fn set_role(&self, user_id: Uuid, enterprise_id: EnterpriseId, role: RoleType) -> bool {
        self.memberships
            .get_mut(&(user_id, enterprise_id))
            .map(|mut record| record.role = Some(RoleAssignment::new(role)))
            .is_some()
    }

    /// Flip the active flag on an existing role assignment
    ///
    /// Returns false when there is no record or no assignment.
    pub fn set_role_active(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
        is_active: bool,
    ) -> bool {
        self.memberships
            .get_mut(&(user_id, enterprise_id))
            .and_then(|mut record| {
                record
                    .role
                    .as_mut()
                    .map(|assignment| assignment.is_active = is_active)
            })
            .is_some()
    }
}

#[async_trait]
impl IdentityProvider for MemoryDirectory {
    async fn user_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&user_id).map(|user| user.clone()))
    }
}

#[async_trait]
impl EmploymentRegistry for MemoryDirectory {
    async fn employed_enterprises(&self, user_id: Uuid) -> AppResult<Vec<Enterprise>> {
        let mut employed: Vec<Enterprise> = self
            .memberships
            .iter()
            .filter(|entry| {
                entry.key().0 == user_id
                    && entry.value().employment.status == EmploymentStatus::Employed
            })
            .filter_map(|entry| {
                let enterprise_id = entry.key().1;
                let enterprise = self.enterprises.get(&enterprise_id);
                if enterprise.is_none() {
                    tracing::debug!(
                        user_id = %user_id,
                        enterprise_id = %enterprise_id,
                        "Employment record points at a missing enterprise, skipping"
                    );
                }
                enterprise.map(|e| e.clone())
            })
            .collect();

        // Stable ordering keeps the selection page deterministic
        employed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employed)
    }

    async fn employment_status(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<EmploymentStatus>> {
        Ok(self
            .memberships
            .get(&(user_id, enterprise_id))
            .map(|record| record.employment.status))
    }

    async fn role_assignment(
        &self,
        user_id: Uuid,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<RoleAssignment>> {
        Ok(self
            .memberships
            .get(&(user_id, enterprise_id))
            .and_then(|record| record.role.clone()))
    }

    async fn enterprise_by_id(
        &self,
        enterprise_id: EnterpriseId,
    ) -> AppResult<Option<Enterprise>> {
        Ok(self
            .enterprises
            .get(&enterprise_id)
            .map(|enterprise| enterprise.clone()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::UserType;

    #[tokio::test]
    async fn test_one_record_per_pair() {
        let directory = MemoryDirectory::new();
        let user = User::new("wei.chen", UserType::EnterpriseUser);
        let enterprise = Enterprise::new("Acme Manufacturing", "acme");
        directory.insert_user(user.clone());
        directory.insert_enterprise(enterprise.clone());

        directory.employ(user.id, enterprise.id);
        directory.employ_with_role(user.id, enterprise.id, RoleType::TeamLeader);

        // Second employ replaced the first record rather than duplicating it
        let employed = directory.employed_enterprises(user.id).await.unwrap();
        assert_eq!(employed.len(), 1);
        assert_eq!(
            directory.role_for(user.id, enterprise.id).await.unwrap(),
            Some(RoleType::TeamLeader)
        );
    }

    #[tokio::test]
    async fn test_resigned_records_are_excluded() {
        let directory = MemoryDirectory::new();
        let user = User::new("li.fang", UserType::EnterpriseUser);
        let a = Enterprise::new("Alpha", "alpha");
        let b = Enterprise::new("Beta", "beta");
        directory.insert_user(user.clone());
        directory.insert_enterprise(a.clone());
        directory.insert_enterprise(b.clone());
        directory.employ(user.id, a.id);
        directory.employ(user.id, b.id);

        assert!(directory.resign(user.id, b.id));

        let employed = directory.employed_enterprises(user.id).await.unwrap();
        assert_eq!(employed.len(), 1);
        assert_eq!(employed[0].id, a.id);
        // The resigned record still exists, it just no longer counts
        assert_eq!(
            directory.employment_status(user.id, b.id).await.unwrap(),
            Some(EmploymentStatus::Resigned)
        );
    }

    #[tokio::test]
    async fn test_active_admin_requires_active_flag() {
        let directory = MemoryDirectory::new();
        let user = User::new("admin", UserType::EnterpriseAdmin);
        let enterprise = Enterprise::new("Gamma", "gamma");
        directory.insert_user(user.clone());
        directory.insert_enterprise(enterprise.clone());
        directory.employ_with_role(user.id, enterprise.id, RoleType::EnterpriseAdmin);

        assert!(directory
            .is_active_enterprise_admin(user.id, enterprise.id)
            .await
            .unwrap());

        assert!(directory.set_role_active(user.id, enterprise.id, false));
        assert!(!directory
            .is_active_enterprise_admin(user.id, enterprise.id)
            .await
            .unwrap());
    }
}
