// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request scope: run operations, then commit to propagate.

use std::ops::{Deref, DerefMut};

use colab_realtime_core::{prepare_messages, PreparedMessages, PropagationError};
use colab_server_auth::UserId;
use colab_server_model::{Directory, Request};
use colab_server_realtime::{ConnectionRegistry, DispatchReport};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// What a commit pushed to connected clients.
#[derive(Debug, Default)]
pub struct CommitReport {
	pub channels: usize,
	pub dispatch: DispatchReport,
	pub errors: Vec<PropagationError>,
}

/// A [`Request`] bound to the server's registry.
///
/// Operations run through `Deref` to the request. [`commit`](Self::commit)
/// prepares and dispatches the collected changes; [`rollback`](Self::rollback)
/// or dropping the scope discards them.
pub struct RequestScope<'a> {
	registry: &'a ConnectionRegistry,
	request: Request<'a, dyn Directory>,
}

impl<'a> RequestScope<'a> {
	pub(crate) fn new(state: &'a AppState, actor: Option<UserId>) -> Self {
		Self {
			registry: &state.registry,
			request: Request::new(&*state.directory, actor),
		}
	}

	/// Resolves the pending changes without dispatching them.
	pub fn prepare(&self) -> PreparedMessages {
		prepare_messages(self.request.unit_of_work(), self.request.directory())
	}

	pub fn commit(self) -> CommitReport {
		if self.request.unit_of_work().is_empty() {
			debug!(user_id = ?self.request.actor(), "nothing to propagate");
			return CommitReport::default();
		}

		let mut prepared = self.prepare();
		let errors = prepared.take_errors();
		for error in &errors {
			warn!(error = %error, "propagation failure");
		}
		let dispatch = self.registry.dispatch(&prepared);

		info!(
			user_id = ?self.request.actor(),
			channels = prepared.len(),
			messages = prepared.message_count(),
			delivered = dispatch.delivered,
			dropped = dispatch.dropped,
			"request committed"
		);
		CommitReport {
			channels: prepared.len(),
			dispatch,
			errors,
		}
	}

	/// Discards pending propagation. Directory writes already made stay.
	pub fn rollback(self) {
		let work = self.request.into_unit_of_work();
		debug!(
			updated = work.updated().count(),
			deleted = work.deleted().count(),
			"request rolled back"
		);
	}
}

impl<'a> Deref for RequestScope<'a> {
	type Target = Request<'a, dyn Directory>;

	fn deref(&self) -> &Self::Target {
		&self.request
	}
}

impl DerefMut for RequestScope<'_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.request
	}
}
