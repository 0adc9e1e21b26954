// ABOUTME: Core data models for the Atrium multi-tenant platform
// ABOUTME: Defines User, Enterprise, Employment, and role assignment structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

//! # Data Models
//!
//! Core data structures shared by the tenant resolver, the authorization
//! engine, and the registry contracts.
//!
//! ## Design Principles
//!
//! - **Read-only to the core**: identities, enterprises, and employment
//!   facts are owned by external collaborators; this crate only reads them.
//! - **Type Safe**: `EnterpriseId` is a newtype so tenant identifiers cannot
//!   be confused with user identifiers at compile time.
//! - **Serializable**: every model supports JSON for the route layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type-safe wrapper for enterprise identifiers
///
/// Provides compile-time distinction between enterprise IDs and other UUIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnterpriseId(pub Uuid);

impl EnterpriseId {
    /// Create a new random `EnterpriseId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EnterpriseId` from a UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EnterpriseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EnterpriseId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EnterpriseId> for Uuid {
    fn from(id: EnterpriseId) -> Self {
        id.0
    }
}

impl fmt::Display for EnterpriseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EnterpriseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl AsRef<Uuid> for EnterpriseId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

/// Account-level classification of a user
///
/// This is a coarse tag on the global account, NOT a tenant role; tenant
/// capability always comes from the role assignment attached to an
/// employment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Account created to administer an enterprise
    EnterpriseAdmin,
    /// Ordinary enterprise-affiliated account
    EnterpriseUser,
    /// Self-registered account with no enterprise affiliation
    IndependentUser,
}

impl UserType {
    /// Convert to storage string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnterpriseAdmin => "enterprise_admin",
            Self::EnterpriseUser => "enterprise_user",
            Self::IndependentUser => "independent_user",
        }
    }
}

/// Global user account
///
/// Owned by the identity collaborator; this core only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable account identifier
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Account-level type tag
    pub user_type: UserType,
    /// Platform-wide administrator flag
    pub is_superuser: bool,
    /// Whether the account is enabled
    pub is_active: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user account
    #[must_use]
    pub fn new(username: impl Into<String>, user_type: UserType) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            display_name: None,
            user_type,
            is_superuser: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Create a new system superuser account
    #[must_use]
    pub fn new_superuser(username: impl Into<String>) -> Self {
        Self {
            is_superuser: true,
            ..Self::new(username, UserType::EnterpriseAdmin)
        }
    }
}

/// Organizational tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enterprise {
    /// Unique enterprise identifier
    pub id: EnterpriseId,
    /// Display name for the organization
    pub name: String,
    /// URL-safe identifier (e.g. "acme-corp")
    pub slug: String,
    /// Whether the enterprise is active
    pub is_active: bool,
    /// When the enterprise was created
    pub created_at: DateTime<Utc>,
    /// When the enterprise was last updated
    pub updated_at: DateTime<Utc>,
}

impl Enterprise {
    /// Create a new enterprise
    #[must_use]
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EnterpriseId::new(),
            name: name.into(),
            slug: slug.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Employment status of a user within one enterprise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed
    Employed,
    /// No longer employed; the record is retained
    Resigned,
}

impl EmploymentStatus {
    /// Convert to storage string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employed => "employed",
            Self::Resigned => "resigned",
        }
    }
}

/// Membership of a user in an enterprise
///
/// Unique per (user, enterprise) pair; created by onboarding collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employment {
    /// Unique record identifier
    pub id: Uuid,
    /// User this record belongs to
    pub user_id: Uuid,
    /// Enterprise this record belongs to
    pub enterprise_id: EnterpriseId,
    /// Current employment status
    pub status: EmploymentStatus,
    /// When the user joined the enterprise
    pub joined_at: DateTime<Utc>,
}

impl Employment {
    /// Create a new employed record
    #[must_use]
    pub fn new(user_id: Uuid, enterprise_id: EnterpriseId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            enterprise_id,
            status: EmploymentStatus::Employed,
            joined_at: Utc::now(),
        }
    }
}

/// Role of a user within one enterprise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// Highest capability within the enterprise
    EnterpriseAdmin,
    /// Manages a department
    DepartmentManager,
    /// Leads a team
    TeamLeader,
    /// Ordinary staff member
    RegularStaff,
    /// External contractor
    Contractor,
}

impl RoleType {
    /// Convert from storage string
    #[must_use]
    pub fn from_db_string(s: &str) -> Self {
        match s {
            "enterprise_admin" => Self::EnterpriseAdmin,
            "department_manager" => Self::DepartmentManager,
            "team_leader" => Self::TeamLeader,
            "regular_staff" => Self::RegularStaff,
            "contractor" => Self::Contractor,
            _ => {
                // Log unknown role but fall back to the weakest role for safety
                tracing::warn!("Unknown role type '{}' encountered, defaulting to RegularStaff", s);
                Self::RegularStaff
            }
        }
    }

    /// Convert to storage string
    #[must_use]
    pub const fn to_db_string(&self) -> &'static str {
        match self {
            Self::EnterpriseAdmin => "enterprise_admin",
            Self::DepartmentManager => "department_manager",
            Self::TeamLeader => "team_leader",
            Self::RegularStaff => "regular_staff",
            Self::Contractor => "contractor",
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Role assignment attached to one employment record
///
/// Created lazily alongside an employment record; never implicitly deleted.
/// Capability from an assignment never crosses the enterprise boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Role within the enterprise
    pub role_type: RoleType,
    /// Whether the assignment currently grants capability
    pub is_active: bool,
    /// When the role was granted
    pub granted_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// Create a new active assignment
    #[must_use]
    pub fn new(role_type: RoleType) -> Self {
        Self {
            role_type,
            is_active: true,
            granted_at: Utc::now(),
        }
    }

    /// True when this assignment is an active `enterprise_admin` grant
    #[must_use]
    pub const fn is_active_admin(&self) -> bool {
        self.is_active && matches!(self.role_type, RoleType::EnterpriseAdmin)
    }
}
