// ABOUTME: Integration tests for the app registry and built-in applications
// ABOUTME: Validates registration semantics, metadata, and the certification admin predicate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use atrium::apps::{builtin, AppDescriptor, AppRegistry};
use atrium::models::RoleType;
use atrium::session::Session;
use atrium::employment::EmploymentRegistry;
use atrium::tenant::TenantResolver;

#[test]
fn test_descriptor_metadata() {
    let app = builtin::skill_certification();
    assert_eq!(app.code, "skill_certification");
    assert_eq!(app.version, "1.0.0");
    assert!(app
        .capabilities
        .iter()
        .any(|capability| capability == "manage_certification"));
    assert!(app
        .capabilities
        .iter()
        .any(|capability| capability == "view_reports"));
}

#[test]
fn test_registry_lookup_surface() {
    let registry = AppRegistry::builder()
        .register(builtin::skill_certification())
        .register(AppDescriptor::new("hr_review", "HR Review", |_, _| false))
        .build();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("skill_certification"));
    assert!(!registry.contains("ghost"));
    assert_eq!(
        registry.get("hr_review").map(|app| app.name.as_str()),
        Some("HR Review")
    );

    let codes: Vec<&str> = registry
        .available_apps()
        .iter()
        .map(|app| app.code.as_str())
        .collect();
    assert_eq!(codes, vec!["hr_review", "skill_certification"]);
}

#[tokio::test]
async fn test_certification_admin_predicate_follows_the_resolved_role() {
    let directory = common::create_test_directory();
    let manager = common::create_test_user(&directory, "manager");
    let admin = common::create_test_user(&directory, "admin");
    let staff = common::create_test_user(&directory, "staff");
    let enterprise = common::create_test_enterprise(&directory, "Certify Co", "certify");
    directory.employ_with_role(manager.id, enterprise.id, RoleType::DepartmentManager);
    directory.employ_with_role(admin.id, enterprise.id, RoleType::EnterpriseAdmin);
    directory.employ_with_role(staff.id, enterprise.id, RoleType::RegularStaff);

    let app = builtin::skill_certification();
    let registry: Arc<dyn EmploymentRegistry> = directory.clone();
    let resolver = TenantResolver::new(registry);

    for (user, expected) in [(&manager, true), (&admin, true), (&staff, false)] {
        let mut session = Session::new(user.id);
        let context = resolver
            .resolve_context(user, &mut session)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.is_admin(user, Some(&context)), expected);
    }

    // Without a resolved tenant there is nothing to administer
    assert!(!app.is_admin(&manager, None));
}
