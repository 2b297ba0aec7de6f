// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use colab_realtime_core::EffectiveChannel;
use colab_server_auth::HierarchicalPosition;
use colab_server_model::ModelError;
use serde_json::json;

use super::support::{channels, drain, update_for, Fixture};

#[test]
fn deleted_member_and_remaining_team_are_notified() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let bob = fixture.user("bob");
	let carol = fixture.user("carol");
	let project = fixture.project_with(
		&alice,
		&[
			(&bob, HierarchicalPosition::Internal),
			(&carol, HierarchicalPosition::Guest),
		],
	);
	let member = fixture.member_of(&bob, project.id);

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.delete_team_member(member.id).unwrap();
	let prepared = scope.prepare();

	let expected: BTreeSet<_> = [alice.id, bob.id, carol.id, fixture.admin.id]
		.into_iter()
		.map(EffectiveChannel::User)
		.collect();
	assert_eq!(channels(&prepared), expected);

	let message = update_for(&prepared, EffectiveChannel::User(bob.id));
	assert_eq!(message["updated"], json!([]));
	assert_eq!(
		message["deleted"],
		json!([{
			"type": "TeamMember",
			"id": member.id.get(),
			"payload": { "projectId": project.id.get() },
		}])
	);
	assert_eq!(
		update_for(&prepared, EffectiveChannel::User(carol.id))["deleted"],
		message["deleted"]
	);
}

#[tokio::test]
async fn removed_member_receives_deletion_after_losing_access() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let bob = fixture.user("bob");
	let project = fixture.project_with(&alice, &[(&bob, HierarchicalPosition::Internal)]);
	let member = fixture.member_of(&bob, project.id);
	let (_session, mut bob_rx) = fixture.connect_as(&bob).await;

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.delete_team_member(member.id).unwrap();
	scope.commit();

	let received = drain(&mut bob_rx);
	assert_eq!(received.len(), 1);
	assert_eq!(received[0]["deleted"][0]["id"], json!(member.id.get()));

	let mut scope = fixture.state.begin(Some(bob.id));
	assert!(scope.get_project(project.id).is_err());
}

#[test]
fn last_owner_cannot_leave() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let project = fixture.project_with(&alice, &[]);
	let owner = fixture.member_of(&alice, project.id);

	let mut scope = fixture.state.begin(Some(alice.id));
	assert!(matches!(
		scope.delete_team_member(owner.id),
		Err(ModelError::DataIntegrity(_))
	));
}

#[test]
fn invited_user_accepts_own_invitation() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let dave = fixture.user("dave");
	let project = fixture.project_with(&alice, &[]);

	let mut scope = fixture.state.begin(Some(alice.id));
	let invitation = scope
		.invite_team_member(project.id, "Dave", HierarchicalPosition::Internal)
		.unwrap();
	let prepared = scope.prepare();
	assert!(!channels(&prepared).contains(&EffectiveChannel::User(dave.id)));
	scope.commit();

	let mut scope = fixture.state.begin(Some(dave.id));
	let member = scope.link_team_member(invitation.id, dave.id).unwrap();
	assert_eq!(member.user, Some(dave.id));
	let prepared = scope.prepare();
	assert!(channels(&prepared).contains(&EffectiveChannel::User(dave.id)));
	assert!(channels(&prepared).contains(&EffectiveChannel::User(alice.id)));
	scope.commit();

	let mut scope = fixture.state.begin(Some(dave.id));
	assert!(scope.get_project(project.id).is_ok());
}
