// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The [`Condition`] expression tree.
//!
//! A condition is an immutable value. Equality and hashing are structural, so
//! two conditions built independently for the same entities share one slot in
//! the [`EvaluationContext`](super::EvaluationContext) cache.

use std::fmt;

use crate::types::{CardId, ProjectId, UserId};

/// An authorization rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
	AlwaysTrue,
	AlwaysFalse,
	/// True when every child is true; evaluated left to right, stops at the first false.
	And(Vec<Condition>),
	/// True when any child is true; evaluated left to right, stops at the first true.
	Or(Vec<Condition>),
	Not(Box<Condition>),
	/// An actor is attached to the request.
	IsAuthenticated,
	/// The actor carries the admin flag.
	IsAdmin,
	/// The actor is the given user.
	IsCurrentUser(UserId),
	/// The actor has a team member in the project.
	IsProjectMember(ProjectId),
	/// The actor is an owner of the project.
	IsProjectOwner(ProjectId),
	/// The actor is an owner or internal member of the project.
	IsProjectInternal(ProjectId),
	/// The actor and the user are team members of a common project.
	IsTeamMateOf(UserId),
	/// The actor and the user work on related projects (common team, or one
	/// builds on card types published by the other's project).
	WorksOnSameProjectAs(UserId),
	HasCardWriteRight(CardId),
	HasCardReadRight(CardId),
}

impl Condition {
	/// Conjunction of the given conditions.
	pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
		Condition::And(conditions.into_iter().collect())
	}

	/// Disjunction of the given conditions.
	pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
		Condition::Or(conditions.into_iter().collect())
	}

	/// Negation of the given condition.
	#[allow(clippy::should_implement_trait)]
	pub fn not(condition: Condition) -> Self {
		Condition::Not(Box::new(condition))
	}
}

impl From<bool> for Condition {
	fn from(value: bool) -> Self {
		if value {
			Condition::AlwaysTrue
		} else {
			Condition::AlwaysFalse
		}
	}
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, children: &[Condition]) -> fmt::Result {
	write!(f, "{name}(")?;
	for (i, child) in children.iter().enumerate() {
		if i > 0 {
			write!(f, ", ")?;
		}
		write!(f, "{child}")?;
	}
	write!(f, ")")
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Condition::AlwaysTrue => write!(f, "AlwaysTrue"),
			Condition::AlwaysFalse => write!(f, "AlwaysFalse"),
			Condition::And(children) => write_list(f, "And", children),
			Condition::Or(children) => write_list(f, "Or", children),
			Condition::Not(inner) => write!(f, "Not({inner})"),
			Condition::IsAuthenticated => write!(f, "IsAuthenticated"),
			Condition::IsAdmin => write!(f, "IsAdmin"),
			Condition::IsCurrentUser(user) => write!(f, "IsCurrentUser(user#{user})"),
			Condition::IsProjectMember(project) => write!(f, "IsProjectMember(project#{project})"),
			Condition::IsProjectOwner(project) => write!(f, "IsProjectOwner(project#{project})"),
			Condition::IsProjectInternal(project) => {
				write!(f, "IsProjectInternal(project#{project})")
			}
			Condition::IsTeamMateOf(user) => write!(f, "IsTeamMateOf(user#{user})"),
			Condition::WorksOnSameProjectAs(user) => write!(f, "WorksOnSameProjectAs(user#{user})"),
			Condition::HasCardWriteRight(card) => write!(f, "HasCardWriteRight(card#{card})"),
			Condition::HasCardReadRight(card) => write!(f, "HasCardReadRight(card#{card})"),
		}
	}
}
