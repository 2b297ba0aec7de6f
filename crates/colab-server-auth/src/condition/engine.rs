// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Condition evaluation.
//!
//! [`Condition::eval`] memoizes every node it evaluates in the request's
//! [`EvaluationContext`], so a condition shared by several permission checks in
//! one request queries the [`SecurityService`] only once.

use tracing::trace;

use super::{Condition, EvaluationContext};
use crate::security::SecurityService;
use crate::types::UserId;

impl Condition {
	/// Evaluates the condition for the context's current actor.
	///
	/// Never fails: missing actors and unknown entities evaluate to `false`.
	pub fn eval(&self, ctx: &mut EvaluationContext, security: &dyn SecurityService) -> bool {
		if let Some(value) = ctx.cached(self) {
			trace!(condition = %self, value, "cached");
			return value;
		}

		let value = self.internal_eval(ctx, security);
		trace!(condition = %self, value, "evaluated");
		ctx.store(self.clone(), value);
		value
	}

	fn internal_eval(&self, ctx: &mut EvaluationContext, security: &dyn SecurityService) -> bool {
		let actor = ctx.current_user();
		let as_actor = |check: &dyn Fn(UserId) -> bool| actor.is_some_and(check);

		match self {
			Condition::AlwaysTrue => true,
			Condition::AlwaysFalse => false,
			Condition::And(children) => children.iter().all(|c| c.eval(ctx, security)),
			Condition::Or(children) => children.iter().any(|c| c.eval(ctx, security)),
			Condition::Not(inner) => !inner.eval(ctx, security),
			Condition::IsAuthenticated => actor.is_some(),
			Condition::IsAdmin => as_actor(&|a| security.is_admin(a)),
			Condition::IsCurrentUser(user) => actor == Some(*user),
			Condition::IsProjectMember(project) => {
				as_actor(&|a| security.is_project_member(a, *project))
			}
			Condition::IsProjectOwner(project) => {
				as_actor(&|a| security.is_project_owner(a, *project))
			}
			Condition::IsProjectInternal(project) => {
				as_actor(&|a| security.is_project_internal(a, *project))
			}
			Condition::IsTeamMateOf(user) => as_actor(&|a| security.are_team_mates(a, *user)),
			Condition::WorksOnSameProjectAs(user) => {
				as_actor(&|a| security.work_on_same_project(a, *user))
			}
			Condition::HasCardWriteRight(card) => {
				as_actor(&|a| security.has_card_write_right(a, *card))
			}
			Condition::HasCardReadRight(card) => {
				as_actor(&|a| security.has_card_read_right(a, *card))
			}
		}
	}
}
