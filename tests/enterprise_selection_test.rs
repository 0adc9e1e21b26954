// ABOUTME: Integration tests for the enterprise selection state machine
// ABOUTME: Validates login routing, choice validation, switching, and logout clearing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atrium Platform

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use atrium::models::EnterpriseId;
use atrium::session::Session;
use atrium::employment::EmploymentRegistry;
use atrium::tenant::{EnterpriseSelection, SelectionOutcome, SelectionRejected};

#[tokio::test]
async fn test_login_clears_prior_selection_before_routing() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "two.jobs");
    let a = common::create_test_enterprise(&directory, "Alpha", "alpha");
    let b = common::create_test_enterprise(&directory, "Beta", "beta");
    directory.employ(user.id, a.id);
    directory.employ(user.id, b.id);

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);
    // Selection left over from a previous login on the same client
    session.select(a.id);

    let outcome = selection.on_login(&user, &mut session).await.unwrap();
    // Cleared unconditionally, then selection required again
    assert!(session.selected_enterprise().is_none());
    match outcome {
        SelectionOutcome::SelectionRequired(choices) => assert_eq!(choices.len(), 2),
        other => panic!("expected SelectionRequired, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_with_single_enterprise_auto_selects_and_persists() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "one.job");
    let enterprise = common::create_test_enterprise(&directory, "Solo Works", "solo");
    directory.employ(user.id, enterprise.id);

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);

    let outcome = selection.on_login(&user, &mut session).await.unwrap();
    match outcome {
        SelectionOutcome::AutoSelected(selected) => assert_eq!(selected.id, enterprise.id),
        other => panic!("expected AutoSelected, got {other:?}"),
    }
    assert_eq!(
        session.selected_enterprise(),
        Some(enterprise.id.to_string().as_str())
    );
}

#[tokio::test]
async fn test_login_with_no_employment_is_unaffiliated() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "independent");

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);
    session.set_selected_enterprise("stale-garbage");

    let outcome = selection.on_login(&user, &mut session).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Unaffiliated));
    assert!(session.selected_enterprise().is_none());
}

#[tokio::test]
async fn test_superuser_login_skips_employment_lookup() {
    let directory = common::create_test_directory();
    let root = common::create_test_superuser(&directory, "root");
    common::create_test_enterprise(&directory, "Anything", "anything");

    let counting = Arc::new(common::CountingRegistry::new(Arc::clone(&directory)));
    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = counting.clone();
        registry
    });
    let mut session = Session::new(root.id);

    let outcome = selection.on_login(&root, &mut session).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Unaffiliated));
    assert_eq!(counting.employed_calls(), 0);
}

#[tokio::test]
async fn test_submit_commits_a_valid_choice() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "chooser");
    let a = common::create_test_enterprise(&directory, "Alpha", "alpha");
    let b = common::create_test_enterprise(&directory, "Beta", "beta");
    directory.employ(user.id, a.id);
    directory.employ(user.id, b.id);

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);

    let submitted = selection
        .submit(&user, &mut session, &b.id.to_string())
        .await
        .unwrap();
    assert_eq!(submitted.unwrap().id, b.id);
    assert_eq!(
        session.selected_enterprise(),
        Some(b.id.to_string().as_str())
    );
}

#[tokio::test]
async fn test_submit_rejects_choices_outside_the_employed_set() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "overreach");
    let a = common::create_test_enterprise(&directory, "Alpha", "alpha");
    let b = common::create_test_enterprise(&directory, "Beta", "beta");
    let elsewhere = common::create_test_enterprise(&directory, "Elsewhere", "elsewhere");
    directory.employ(user.id, a.id);
    directory.employ(user.id, b.id);

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);

    // An enterprise the user is not employed at
    let submitted = selection
        .submit(&user, &mut session, &elsewhere.id.to_string())
        .await
        .unwrap();
    assert_eq!(submitted.unwrap_err(), SelectionRejected::NotEmployed);
    // AwaitingSelection -> AwaitingSelection: no state change
    assert!(session.selected_enterprise().is_none());

    // A resigned enterprise is just as invalid
    directory.resign(user.id, b.id);
    let submitted = selection
        .submit(&user, &mut session, &b.id.to_string())
        .await
        .unwrap();
    assert_eq!(submitted.unwrap_err(), SelectionRejected::NotEmployed);
    assert!(session.selected_enterprise().is_none());
}

#[tokio::test]
async fn test_submit_rejects_empty_and_malformed_choices() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "typo");
    let enterprise = common::create_test_enterprise(&directory, "Alpha", "alpha");
    directory.employ(user.id, enterprise.id);

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);

    let submitted = selection.submit(&user, &mut session, "  ").await.unwrap();
    assert_eq!(submitted.unwrap_err(), SelectionRejected::Empty);

    let submitted = selection
        .submit(&user, &mut session, "definitely-not-a-uuid")
        .await
        .unwrap();
    assert_eq!(submitted.unwrap_err(), SelectionRejected::Malformed);
    assert!(session.selected_enterprise().is_none());
}

#[tokio::test]
async fn test_superuser_submit_validates_existence_not_employment() {
    let directory = common::create_test_directory();
    let root = common::create_test_superuser(&directory, "root");
    let enterprise = common::create_test_enterprise(&directory, "Target", "target");

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(root.id);

    let submitted = selection
        .submit(&root, &mut session, &enterprise.id.to_string())
        .await
        .unwrap();
    assert_eq!(submitted.unwrap().id, enterprise.id);

    let submitted = selection
        .submit(&root, &mut session, &EnterpriseId::new().to_string())
        .await
        .unwrap();
    assert_eq!(submitted.unwrap_err(), SelectionRejected::Unknown);
}

#[tokio::test]
async fn test_switch_reenters_the_state_machine() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "switcher");
    let a = common::create_test_enterprise(&directory, "Alpha", "alpha");
    let b = common::create_test_enterprise(&directory, "Beta", "beta");
    directory.employ(user.id, a.id);
    directory.employ(user.id, b.id);

    let selection = EnterpriseSelection::new({
        let registry: Arc<dyn EmploymentRegistry> = directory.clone();
        registry
    });
    let mut session = Session::new(user.id);
    session.select(a.id);

    let outcome = selection.switch(&user, &mut session).await.unwrap();
    assert!(session.selected_enterprise().is_none());
    assert!(matches!(outcome, SelectionOutcome::SelectionRequired(_)));

    // With B resigned, switching auto-selects the only remaining enterprise
    directory.resign(user.id, b.id);
    let outcome = selection.switch(&user, &mut session).await.unwrap();
    match outcome {
        SelectionOutcome::AutoSelected(selected) => assert_eq!(selected.id, a.id),
        other => panic!("expected AutoSelected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_clears_the_selection() {
    let directory = common::create_test_directory();
    let user = common::create_test_user(&directory, "leaver");
    let enterprise = common::create_test_enterprise(&directory, "Alpha", "alpha");
    directory.employ(user.id, enterprise.id);

    let mut session = Session::new(user.id);
    session.select(enterprise.id);

    EnterpriseSelection::logout(&mut session);
    assert!(session.selected_enterprise().is_none());
}
