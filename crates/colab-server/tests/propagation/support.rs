// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;
use std::sync::Arc;

use colab_realtime_core::{EffectiveChannel, PreparedMessages};
use colab_server::{AppState, InMemoryCredentials};
use colab_server_auth::{HierarchicalPosition, ProjectId};
use colab_server_config::ServerConfig;
use colab_server_model::{InMemoryDirectory, Project, TeamMember, User};
use colab_server_realtime::SessionToken;
use serde_json::Value;
use tokio::sync::mpsc::Receiver;

pub struct Fixture {
	pub directory: Arc<InMemoryDirectory>,
	pub credentials: Arc<InMemoryCredentials>,
	pub state: AppState,
	pub admin: User,
}

impl Fixture {
	pub fn new() -> Self {
		Self::with_config(ServerConfig::default())
	}

	pub fn with_config(config: ServerConfig) -> Self {
		let directory = Arc::new(InMemoryDirectory::new());
		let credentials = Arc::new(InMemoryCredentials::new());
		let state = AppState::new(config, directory.clone(), credentials.clone());
		let admin = directory.register_user("root", true);
		credentials.set(admin.id, secret_of("root"));
		Self {
			directory,
			credentials,
			state,
			admin,
		}
	}

	pub fn user(&self, username: &str) -> User {
		let user = self.directory.register_user(username, false);
		self.credentials.set(user.id, secret_of(username));
		user
	}

	/// Opens a connection, skips the greeting and signs `user` in.
	pub async fn connect_as(&self, user: &User) -> (SessionToken, Receiver<Arc<str>>) {
		let (session, mut receiver) = self.state.connect();
		receiver.recv().await.unwrap();
		self
			.state
			.sign_in(session, &user.username, &secret_of(&user.username))
			.unwrap();
		(session, receiver)
	}

	/// `owner` creates a project; the others join with the given positions.
	pub fn project_with(&self, owner: &User, others: &[(&User, HierarchicalPosition)]) -> Project {
		let mut scope = self.state.begin(Some(owner.id));
		let project = scope.create_project("Apollo").unwrap();
		for (user, position) in others {
			scope.add_team_member(project.id, user.id, *position).unwrap();
		}
		scope.commit();
		project
	}

	pub fn member_of(&self, user: &User, project: ProjectId) -> TeamMember {
		use colab_server_model::Directory as _;
		self.directory.team_member_of(user.id, project).unwrap()
	}
}

pub fn secret_of(username: &str) -> String {
	format!("pw-{username}")
}

pub fn channels(prepared: &PreparedMessages) -> BTreeSet<EffectiveChannel> {
	prepared.channels().copied().collect()
}

/// The single update message prepared for `channel`.
pub fn update_for(prepared: &PreparedMessages, channel: EffectiveChannel) -> Value {
	let messages = prepared.get(&channel).unwrap();
	assert_eq!(messages.len(), 1, "expected one message for {channel}");
	serde_json::from_str(&messages[0]).unwrap()
}

/// Messages received so far, oldest first.
pub fn drain(receiver: &mut Receiver<Arc<str>>) -> Vec<Value> {
	let mut messages = Vec::new();
	while let Ok(message) = receiver.try_recv() {
		messages.push(serde_json::from_str(&message).unwrap());
	}
	messages
}
