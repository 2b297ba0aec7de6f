// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use colab_realtime_core::EffectiveChannel;
use colab_server_auth::{
	AuthError, Condition, EvaluationContext, HierarchicalPosition, Operation,
};
use colab_server_model::{DirectorySecurity, ModelError};
use serde_json::json;

use super::support::{channels, drain, update_for, Fixture};

#[test]
fn creator_becomes_owner() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let bob = fixture.user("bob");
	let project = fixture.project_with(&alice, &[]);

	assert_eq!(
		fixture.member_of(&alice, project.id).position,
		HierarchicalPosition::Owner
	);

	let security = DirectorySecurity::new(&*fixture.directory);
	let is_owner = Condition::IsProjectOwner(project.id);
	assert!(is_owner.eval(&mut EvaluationContext::for_user(alice.id), &security));
	assert!(!is_owner.eval(&mut EvaluationContext::for_user(bob.id), &security));
}

#[test]
fn rename_reaches_team_and_admins() {
	let fixture = Fixture::new();
	let second_admin = fixture.directory.register_user("ops", true);
	let alice = fixture.user("alice");
	let bob = fixture.user("bob");
	let carol = fixture.user("carol");
	let project = fixture.project_with(&alice, &[(&bob, HierarchicalPosition::Internal)]);

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.rename_project(project.id, "Artemis").unwrap();
	let prepared = scope.prepare();

	let expected: BTreeSet<_> = [alice.id, bob.id, fixture.admin.id, second_admin.id]
		.into_iter()
		.map(EffectiveChannel::User)
		.collect();
	assert_eq!(channels(&prepared), expected);
	assert!(!channels(&prepared).contains(&EffectiveChannel::User(carol.id)));

	let message = update_for(&prepared, EffectiveChannel::User(bob.id));
	assert_eq!(message["@class"], "WsUpdateMessage");
	assert_eq!(message["updated"][0]["@class"], "Project");
	assert_eq!(message["updated"][0]["name"], "Artemis");
	assert_eq!(message["deleted"], json!([]));
}

#[tokio::test]
async fn commit_delivers_to_connected_members() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let bob = fixture.user("bob");
	let carol = fixture.user("carol");
	let project = fixture.project_with(&alice, &[(&bob, HierarchicalPosition::Internal)]);

	let (_bob_session, mut bob_rx) = fixture.connect_as(&bob).await;
	let (_carol_session, mut carol_rx) = fixture.connect_as(&carol).await;

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.rename_project(project.id, "Artemis").unwrap();
	let report = scope.commit();

	assert!(report.errors.is_empty());
	assert_eq!(report.dispatch.delivered, 1);
	let received = drain(&mut bob_rx);
	assert_eq!(received.len(), 1);
	assert_eq!(received[0]["updated"][0]["id"], json!(project.id.get()));
	assert!(drain(&mut carol_rx).is_empty());
}

#[tokio::test]
async fn rollback_never_propagates() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let project = fixture.project_with(&alice, &[]);
	let (_session, mut alice_rx) = fixture.connect_as(&alice).await;

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.rename_project(project.id, "Draft").unwrap();
	scope.rollback();

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.rename_project(project.id, "Dropped").unwrap();
	drop(scope);

	assert!(drain(&mut alice_rx).is_empty());
}

#[test]
fn outsiders_cannot_see_or_rename() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let mallory = fixture.user("mallory");
	let guest = fixture.user("guest");
	let project = fixture.project_with(&alice, &[(&guest, HierarchicalPosition::Guest)]);

	let mut scope = fixture.state.begin(Some(mallory.id));
	assert!(matches!(
		scope.get_project(project.id),
		Err(ModelError::Auth(AuthError::NotFound { .. }))
	));

	let mut scope = fixture.state.begin(Some(guest.id));
	assert!(scope.get_project(project.id).is_ok());
	assert!(matches!(
		scope.rename_project(project.id, "Mine"),
		Err(ModelError::Auth(AuthError::Forbidden {
			operation: Operation::Update,
			..
		}))
	));
	assert!(scope.unit_of_work().is_empty());
}

#[test]
fn admins_bypass_conditions() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let project = fixture.project_with(&alice, &[]);

	let mut scope = fixture.state.begin(Some(fixture.admin.id));
	assert_eq!(
		scope.rename_project(project.id, "Audited").unwrap().name,
		"Audited"
	);
}

#[test]
fn global_project_broadcasts_until_snapshot_refresh() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let project = fixture.project_with(&alice, &[]);

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.set_project_global(project.id, true).unwrap();
	assert!(channels(&scope.prepare()).contains(&EffectiveChannel::Broadcast));
	scope.commit();

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.refresh_project_snapshot(project.id).unwrap();
	scope.set_project_global(project.id, false).unwrap();
	assert!(channels(&scope.prepare()).contains(&EffectiveChannel::Broadcast));
	scope.commit();

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.refresh_project_snapshot(project.id).unwrap();
	scope.rename_project(project.id, "Private").unwrap();
	assert!(!channels(&scope.prepare()).contains(&EffectiveChannel::Broadcast));
}
