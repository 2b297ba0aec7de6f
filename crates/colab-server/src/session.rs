// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Websocket sessions: connect, sign in and out, subscribe.

use std::sync::Arc;

use colab_realtime_core::{ChannelBuilder, EffectiveChannel, RawMessage};
use colab_server_auth::{AuthError, Operation, UserId};
use colab_server_model::{Subscription, User};
use colab_server_realtime::{RegistryError, SessionToken};
use tokio::sync::mpsc::Receiver;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::scope::CommitReport;
use crate::state::AppState;

impl AppState {
	/// Opens an anonymous connection.
	pub fn connect(&self) -> (SessionToken, Receiver<Arc<str>>) {
		self.registry.open()
	}

	pub fn disconnect(&self, session: SessionToken) -> bool {
		self.registry.close(session)
	}

	/// Verifies credentials and binds the session to the user.
	///
	/// Unknown users and wrong secrets fail the same way. Repeated failures
	/// for one username are throttled.
	#[instrument(skip(self, secret))]
	pub fn sign_in(&self, session: SessionToken, username: &str, secret: &str) -> Result<User> {
		self.failures.check(username)?;

		let user = self
			.directory
			.user_by_username(username)
			.filter(|user| self.verifier.verify(user, secret));
		let Some(user) = user else {
			let failures = self.failures.record_failure(username);
			warn!(failures, "sign-in failed");
			return Err(AuthError::InvalidCredentials.into());
		};

		self.failures.reset(username);
		self.registry.authenticate(session, user.id)?;
		info!(user_id = %user.id, "signed in");
		Ok(user)
	}

	pub fn sign_out(&self, session: SessionToken) -> Result<Option<UserId>> {
		Ok(self.registry.sign_out(session)?)
	}

	/// Signs `user` out of every connection. Allowed for the user and admins.
	#[instrument(skip(self))]
	pub fn sign_out_everywhere(&self, actor: Option<UserId>, user: UserId) -> Result<CommitReport> {
		let mut scope = self.begin(actor);
		let target = scope.get_user(user)?;
		scope.authorize(&target, Operation::Update)?;
		scope.queue_raw(
			ChannelBuilder::effective(EffectiveChannel::User(user)),
			RawMessage::SignOut,
		);
		let report = scope.commit();

		for session in self.registry.sessions_of(user) {
			self.registry.unbind(session)?;
		}
		Ok(report)
	}

	/// Subscribes the session to `channel` if its user may read it.
	pub fn subscribe(&self, session: SessionToken, channel: EffectiveChannel) -> Result<bool> {
		if self.registry.connection(session).is_none() {
			return Err(RegistryError::UnknownSession(session).into());
		}
		let actor = self.registry.user_of(session);
		let mut scope = self.begin(actor);
		scope.authorize_subscription(Subscription(channel))?;
		scope.rollback();
		Ok(self.registry.subscribe(session, channel)?)
	}

	pub fn unsubscribe(&self, session: SessionToken, channel: EffectiveChannel) -> Result<bool> {
		Ok(self.registry.unsubscribe(session, channel)?)
	}
}
