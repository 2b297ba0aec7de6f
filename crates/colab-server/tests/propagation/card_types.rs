// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use colab_realtime_core::EffectiveChannel;
use colab_server_auth::HierarchicalPosition;

use super::support::{channels, drain, Fixture};

#[test]
fn published_global_type_is_broadcast() {
	let fixture = Fixture::new();
	let mut scope = fixture.state.begin(Some(fixture.admin.id));
	let card_type = scope.create_card_type(None, "Risk").unwrap();
	scope.commit();

	let mut scope = fixture.state.begin(Some(fixture.admin.id));
	scope.set_card_type_published(card_type.id, true).unwrap();
	let prepared = scope.prepare();
	assert_eq!(
		channels(&prepared),
		BTreeSet::from([EffectiveChannel::Broadcast])
	);
}

#[test]
fn unpublished_type_reaches_former_audience_until_refresh() {
	let fixture = Fixture::new();
	let admin = fixture.admin.clone();
	let alice = fixture.user("alice");
	let project = fixture.project_with(&alice, &[]);

	let mut scope = fixture.state.begin(Some(admin.id));
	let global = scope.create_card_type(None, "Risk").unwrap();
	scope.set_card_type_published(global.id, true).unwrap();
	scope.refresh_publication_snapshot(global.id).unwrap();
	scope.commit();

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.reference_card_type(project.id, global.id).unwrap();
	scope.commit();

	let mut scope = fixture.state.begin(Some(admin.id));
	scope.set_card_type_published(global.id, false).unwrap();
	let prepared = scope.prepare();
	assert_eq!(
		channels(&prepared),
		BTreeSet::from([
			EffectiveChannel::Broadcast,
			EffectiveChannel::ProjectContent(project.id),
		])
	);
	scope.commit();

	let mut scope = fixture.state.begin(Some(admin.id));
	scope.refresh_publication_snapshot(global.id).unwrap();
	scope.commit();

	let mut scope = fixture.state.begin(Some(admin.id));
	scope.set_card_type_published(global.id, false).unwrap();
	let prepared = scope.prepare();
	assert_eq!(
		channels(&prepared),
		BTreeSet::from([EffectiveChannel::User(admin.id)])
	);
}

#[tokio::test]
async fn project_content_subscribers_see_referenced_type_changes() {
	let fixture = Fixture::new();
	let alice = fixture.user("alice");
	let bob = fixture.user("bob");
	let project = fixture.project_with(&alice, &[(&bob, HierarchicalPosition::Guest)]);

	let mut scope = fixture.state.begin(Some(fixture.admin.id));
	let global = scope.create_card_type(None, "Risk").unwrap();
	scope.set_card_type_published(global.id, true).unwrap();
	scope.commit();

	let mut scope = fixture.state.begin(Some(alice.id));
	scope.reference_card_type(project.id, global.id).unwrap();
	scope.commit();

	let (session, mut bob_rx) = fixture.connect_as(&bob).await;
	fixture
		.state
		.subscribe(session, EffectiveChannel::ProjectContent(project.id))
		.unwrap();

	let mut scope = fixture.state.begin(Some(fixture.admin.id));
	scope.set_card_type_published(global.id, true).unwrap();
	scope.commit();

	// Broadcast and project content each carry one update.
	let received = drain(&mut bob_rx);
	assert_eq!(received.len(), 2);
	for message in &received {
		assert_eq!(message["updated"][0]["@class"], "CardType");
	}
}
