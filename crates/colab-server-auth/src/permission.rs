// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-entity permission providers and the authorization check.
//!
//! Every protected entity implements [`WithPermission`], building its four
//! conditions from its current state and the lookup service `L` (used to walk
//! relationships such as "the card owning this block"). [`authorize`] is the
//! single entry point callers use before create, read, update or delete.

use std::fmt;

use tracing::{debug, instrument};

use crate::condition::{Condition, EvaluationContext};
use crate::error::AuthError;
use crate::security::SecurityService;
use crate::types::Operation;

/// Capability implemented by every protected entity.
pub trait WithPermission<L: ?Sized> {
	fn read_condition(&self, lookup: &L) -> Condition;

	fn update_condition(&self, lookup: &L) -> Condition;

	fn create_condition(&self, lookup: &L) -> Condition {
		self.update_condition(lookup)
	}

	fn delete_condition(&self, lookup: &L) -> Condition {
		self.update_condition(lookup)
	}

	/// Returns the condition guarding `operation`.
	fn condition_for(&self, operation: Operation, lookup: &L) -> Condition {
		match operation {
			Operation::Create => self.create_condition(lookup),
			Operation::Read => self.read_condition(lookup),
			Operation::Update => self.update_condition(lookup),
			Operation::Delete => self.delete_condition(lookup),
		}
	}
}

/// Checks whether the context's actor may perform `operation` on `entity`.
///
/// Admins pass every check. A denied read yields [`AuthError::NotFound`]; any
/// other denial yields [`AuthError::Forbidden`].
#[instrument(
	level = "debug",
	skip_all,
	fields(
		user_id = ?ctx.current_user(),
		operation = %operation,
		entity = %entity,
	)
)]
pub fn authorize<E, L>(
	entity: &E,
	operation: Operation,
	lookup: &L,
	ctx: &mut EvaluationContext,
	security: &dyn SecurityService,
) -> Result<(), AuthError>
where
	E: WithPermission<L> + fmt::Display,
	L: ?Sized,
{
	if Condition::IsAdmin.eval(ctx, security) {
		debug!("allowed for admin");
		return Ok(());
	}

	let condition = entity.condition_for(operation, lookup);
	if condition.eval(ctx, security) {
		debug!(%condition, "allowed");
		return Ok(());
	}

	debug!(%condition, "denied");
	Err(match operation {
		Operation::Read => AuthError::NotFound {
			entity: entity.to_string(),
		},
		_ => AuthError::Forbidden {
			operation,
			entity: entity.to_string(),
		},
	})
}

/// Evaluates `operation` on `entity` without producing an error.
pub fn is_allowed<E, L>(
	entity: &E,
	operation: Operation,
	lookup: &L,
	ctx: &mut EvaluationContext,
	security: &dyn SecurityService,
) -> bool
where
	E: WithPermission<L> + fmt::Display,
	L: ?Sized,
{
	authorize(entity, operation, lookup, ctx, security).is_ok()
}
