// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request state shared by business operations.

use std::fmt;

use colab_realtime_core::{ChannelBuilder, RawMessage, UnitOfWork, WithChannels};
use colab_server_auth::{authorize, EvaluationContext, Operation, UserId, WithPermission};
use tracing::debug;

use crate::directory::Directory;
use crate::entities::ColabEntity;
use crate::error::{ModelError, Result};
use crate::security::DirectorySecurity;
use crate::subscription::Subscription;

/// One request: the actor's evaluation context plus the changes to
/// propagate once the request commits.
///
/// Operations authorize before mutating. Directory writes are immediate;
/// the unit of work only governs what is pushed to clients.
pub struct Request<'a, D: ?Sized> {
	directory: &'a D,
	ctx: EvaluationContext,
	work: UnitOfWork<ColabEntity>,
}

impl<'a, D: Directory + ?Sized> Request<'a, D> {
	pub fn new(directory: &'a D, actor: Option<UserId>) -> Self {
		Self {
			directory,
			ctx: EvaluationContext::new(actor),
			work: UnitOfWork::new(),
		}
	}

	pub fn actor(&self) -> Option<UserId> {
		self.ctx.current_user()
	}

	pub fn directory(&self) -> &'a D {
		self.directory
	}

	pub fn context(&self) -> &EvaluationContext {
		&self.ctx
	}

	pub fn unit_of_work(&self) -> &UnitOfWork<ColabEntity> {
		&self.work
	}

	pub fn into_unit_of_work(self) -> UnitOfWork<ColabEntity> {
		self.work
	}

	pub fn queue_raw(&mut self, channels: ChannelBuilder, message: RawMessage) {
		self.work.queue_raw(channels, message);
	}

	pub(crate) fn require_actor(&self) -> Result<UserId> {
		self.actor().ok_or(ModelError::Unauthenticated)
	}

	/// Checks `operation` on `entity` for the current actor.
	pub fn authorize<E>(&mut self, entity: &E, operation: Operation) -> Result<()>
	where
		E: WithPermission<D> + fmt::Display,
	{
		let security = DirectorySecurity::new(self.directory);
		authorize(entity, operation, self.directory, &mut self.ctx, &security)?;
		Ok(())
	}

	/// Checks that the actor may listen on the subscription's channel.
	pub fn authorize_subscription(&mut self, subscription: Subscription) -> Result<()> {
		self.authorize(&subscription, Operation::Read)
	}

	/// Forgets memoized answers after relationship changes (team membership,
	/// positions, access control) made within this request.
	pub(crate) fn relationships_changed(&mut self) {
		self.ctx.invalidate();
	}

	/// Stores `entity` and schedules its propagation.
	pub(crate) fn save(&mut self, entity: impl Into<ColabEntity>) {
		let entity = entity.into();
		self.directory.insert(entity.clone());
		if !self.work.register_update(entity) {
			debug!("saved entity was already deleted in this request");
		}
	}

	/// Schedules propagation of an entity whose audience or derived state
	/// changed without a write of its own.
	pub(crate) fn touch(&mut self, entity: impl Into<ColabEntity>) {
		self.work.register_update(entity.into());
	}

	/// Removes `entity`, capturing its audience before it is detached.
	pub(crate) fn delete(&mut self, entity: impl Into<ColabEntity>) {
		let entity = entity.into();
		let channels = entity.channels(self.directory);
		self.directory.remove(&entity);
		self.work.register_deletion(&entity, channels);
	}
}
