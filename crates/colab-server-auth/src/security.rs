// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Relationship queries backing the leaf conditions.

use crate::types::{CardId, ProjectId, UserId};

/// Answers the questions leaf conditions ask about an actor.
///
/// Implementations read already-loaded relationship data (team membership,
/// positions, card access control); they never fail and answer `false` for
/// unknown entities.
pub trait SecurityService: Send + Sync {
	fn is_admin(&self, actor: UserId) -> bool;

	fn is_project_member(&self, actor: UserId, project: ProjectId) -> bool;

	fn is_project_owner(&self, actor: UserId, project: ProjectId) -> bool;

	/// Owners and internal members.
	fn is_project_internal(&self, actor: UserId, project: ProjectId) -> bool;

	fn are_team_mates(&self, actor: UserId, user: UserId) -> bool;

	fn work_on_same_project(&self, actor: UserId, user: UserId) -> bool;

	fn has_card_read_right(&self, actor: UserId, card: CardId) -> bool;

	fn has_card_write_right(&self, actor: UserId, card: CardId) -> bool;
}
