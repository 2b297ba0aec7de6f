// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_realtime_core::EffectiveChannel;
use colab_server::AppError;
use colab_server_auth::{AuthError, HierarchicalPosition};
use colab_server_config::ServerConfig;
use colab_server_realtime::{RegistryError, SessionToken};

use super::support::{drain, secret_of, Fixture};

mod sign_in {
	use super::*;

	#[tokio::test]
	async fn binds_session_to_user() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let (session, _rx) = fixture.connect_as(&alice).await;

		assert_eq!(fixture.state.registry.user_of(session), Some(alice.id));
		assert_eq!(fixture.state.registry.sessions_of(alice.id), vec![session]);
	}

	#[tokio::test]
	async fn unknown_user_and_wrong_secret_look_alike() {
		let fixture = Fixture::new();
		fixture.user("alice");
		let (session, _rx) = fixture.state.connect();

		let wrong = fixture.state.sign_in(session, "alice", "guess").unwrap_err();
		let unknown = fixture
			.state
			.sign_in(session, "nobody", &secret_of("nobody"))
			.unwrap_err();
		assert_eq!(wrong.auth(), Some(&AuthError::InvalidCredentials));
		assert_eq!(unknown.auth(), Some(&AuthError::InvalidCredentials));
		assert_eq!(fixture.state.registry.user_of(session), None);
	}

	#[tokio::test]
	async fn repeated_failures_are_throttled() {
		let mut config = ServerConfig::default();
		config.auth.max_failed_attempts = 2;
		let fixture = Fixture::with_config(config);
		let alice = fixture.user("alice");
		let (session, _rx) = fixture.state.connect();

		for _ in 0..2 {
			assert!(fixture.state.sign_in(session, "alice", "guess").is_err());
		}
		let blocked = fixture
			.state
			.sign_in(session, "alice", &secret_of("alice"))
			.unwrap_err();
		assert_eq!(blocked.auth(), Some(&AuthError::Throttled));
		assert_eq!(fixture.state.failures.failures(&alice.username), 2);
	}

	#[tokio::test]
	async fn success_resets_failures() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let (session, _rx) = fixture.state.connect();

		assert!(fixture.state.sign_in(session, "alice", "guess").is_err());
		fixture
			.state
			.sign_in(session, "alice", &secret_of("alice"))
			.unwrap();
		assert_eq!(fixture.state.failures.failures(&alice.username), 0);
	}

	#[tokio::test]
	async fn unknown_session_is_rejected() {
		let fixture = Fixture::new();
		fixture.user("alice");
		let err = fixture
			.state
			.sign_in(SessionToken::generate(), "alice", &secret_of("alice"))
			.unwrap_err();
		assert!(matches!(
			err,
			AppError::Registry(RegistryError::UnknownSession(_))
		));
	}
}

mod sign_out {
	use super::*;

	#[tokio::test]
	async fn sign_out_notifies_connection() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let (session, mut rx) = fixture.connect_as(&alice).await;

		assert_eq!(fixture.state.sign_out(session).unwrap(), Some(alice.id));
		let received = drain(&mut rx);
		assert_eq!(received.len(), 1);
		assert_eq!(received[0]["@class"], "WsSignOutMessage");
	}

	#[tokio::test]
	async fn sign_out_everywhere_reaches_every_session() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let (first, mut first_rx) = fixture.connect_as(&alice).await;
		let (second, mut second_rx) = fixture.connect_as(&alice).await;

		let report = fixture
			.state
			.sign_out_everywhere(Some(alice.id), alice.id)
			.unwrap();
		assert_eq!(report.dispatch.delivered, 2);

		for rx in [&mut first_rx, &mut second_rx] {
			let received = drain(rx);
			assert_eq!(received.len(), 1);
			assert_eq!(received[0]["@class"], "WsSignOutMessage");
		}
		assert_eq!(fixture.state.registry.user_of(first), None);
		assert_eq!(fixture.state.registry.user_of(second), None);
	}

	#[tokio::test]
	async fn only_user_or_admin_may_sign_out_everywhere() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let bob = fixture.user("bob");
		fixture.project_with(&alice, &[(&bob, HierarchicalPosition::Internal)]);
		let (session, _rx) = fixture.connect_as(&alice).await;

		let err = fixture
			.state
			.sign_out_everywhere(Some(bob.id), alice.id)
			.unwrap_err();
		assert!(matches!(err.auth(), Some(AuthError::Forbidden { .. })));
		assert_eq!(fixture.state.registry.user_of(session), Some(alice.id));

		fixture
			.state
			.sign_out_everywhere(Some(fixture.admin.id), alice.id)
			.unwrap();
		assert_eq!(fixture.state.registry.user_of(session), None);
	}
}

mod subscribe {
	use super::*;

	#[tokio::test]
	async fn members_may_follow_project_content() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let mallory = fixture.user("mallory");
		let project = fixture.project_with(&alice, &[]);
		let channel = EffectiveChannel::ProjectContent(project.id);

		let (session, _rx) = fixture.connect_as(&alice).await;
		assert!(fixture.state.subscribe(session, channel).unwrap());

		let (intruder, _rx) = fixture.connect_as(&mallory).await;
		let err = fixture.state.subscribe(intruder, channel).unwrap_err();
		assert!(matches!(err.auth(), Some(AuthError::NotFound { .. })));
		assert_eq!(fixture.state.registry.subscriber_count(&channel), 1);
	}

	#[tokio::test]
	async fn anonymous_sessions_cannot_follow_users() {
		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let (session, _rx) = fixture.state.connect();

		assert!(fixture
			.state
			.subscribe(session, EffectiveChannel::User(alice.id))
			.is_err());
		assert!(fixture
			.state
			.subscribe(session, EffectiveChannel::Broadcast)
			.is_ok());
	}

	#[tokio::test]
	async fn unknown_session_is_rejected() {
		let fixture = Fixture::new();
		let err = fixture
			.state
			.subscribe(SessionToken::generate(), EffectiveChannel::Broadcast)
			.unwrap_err();
		assert!(matches!(
			err,
			AppError::Registry(RegistryError::UnknownSession(_))
		));
	}

	#[tokio::test]
	async fn block_followers_receive_block_updates() {
		use colab_server_model::Directory as _;

		let fixture = Fixture::new();
		let alice = fixture.user("alice");
		let project = fixture.project_with(&alice, &[]);
		let root = fixture.directory.cards(project.id).remove(0);
		let content = fixture.directory.card_contents(root.id).remove(0);

		let mut scope = fixture.state.begin(Some(alice.id));
		let block = scope.create_block(content.id, "hello").unwrap();
		scope.commit();

		let (session, mut rx) = fixture.connect_as(&alice).await;
		fixture
			.state
			.subscribe(session, EffectiveChannel::Block(block.id))
			.unwrap();

		let mut scope = fixture.state.begin(Some(alice.id));
		scope.update_block(block.id, "hello, world").unwrap();
		let report = scope.commit();

		// Block channel plus nothing else this connection follows.
		assert_eq!(report.dispatch.delivered, 1);
		let received = drain(&mut rx);
		assert_eq!(received[0]["updated"][0]["@class"], "Block");
		assert_eq!(received[0]["updated"][0]["text"], "hello, world");
	}
}
