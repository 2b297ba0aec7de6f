// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lookup and storage seam for entities.

use std::collections::BTreeSet;

use colab_realtime_core::ChannelLookup;
use colab_server_auth::{
	AccessControlId, ActivityFlowLinkId, BlockId, CardContentId, CardId, CardTypeId, ProjectId,
	StickyNoteLinkId, TeamMemberId, TeamRoleId, UserId,
};

use crate::entities::{
	AccessControl, ActivityFlowLink, Block, Card, CardContent, CardType, ColabEntity, Project,
	StickyNoteLink, TeamMember, TeamRole, User,
};

/// Entity store consulted by permission providers, channel builders and
/// business operations.
///
/// Queries return owned snapshots and never fail; a missing entity is `None`
/// or an empty list. Writes apply immediately.
pub trait Directory: ChannelLookup + Send + Sync {
	/// Allocates a fresh identifier, unique across entity kinds.
	fn next_id(&self) -> u64;

	/// Inserts or replaces an entity.
	fn insert(&self, entity: ColabEntity);

	fn remove(&self, entity: &ColabEntity);

	fn user(&self, id: UserId) -> Option<User>;

	fn user_by_username(&self, username: &str) -> Option<User>;

	fn project(&self, id: ProjectId) -> Option<Project>;

	fn team_member(&self, id: TeamMemberId) -> Option<TeamMember>;

	/// Members of a project, pending invitations included.
	fn team_members(&self, project: ProjectId) -> Vec<TeamMember>;

	/// Memberships of a user across projects.
	fn memberships(&self, user: UserId) -> Vec<TeamMember>;

	fn team_role(&self, id: TeamRoleId) -> Option<TeamRole>;

	fn team_roles(&self, project: ProjectId) -> Vec<TeamRole>;

	fn card(&self, id: CardId) -> Option<Card>;

	fn cards(&self, project: ProjectId) -> Vec<Card>;

	fn card_content(&self, id: CardContentId) -> Option<CardContent>;

	fn card_contents(&self, card: CardId) -> Vec<CardContent>;

	fn block(&self, id: BlockId) -> Option<Block>;

	fn card_type(&self, id: CardTypeId) -> Option<CardType>;

	/// Card types owned by `project`, or global types for `None`.
	fn card_types(&self, project: Option<ProjectId>) -> Vec<CardType>;

	/// Types whose `target` is `id`.
	fn direct_references(&self, id: CardTypeId) -> Vec<CardType>;

	fn access_control(&self, id: AccessControlId) -> Option<AccessControl>;

	fn access_controls(&self, card: CardId) -> Vec<AccessControl>;

	fn access_controls_of_member(&self, member: TeamMemberId) -> Vec<AccessControl>;

	fn sticky_note_link(&self, id: StickyNoteLinkId) -> Option<StickyNoteLink>;

	fn activity_flow_link(&self, id: ActivityFlowLinkId) -> Option<ActivityFlowLink>;

	fn team_member_of(&self, user: UserId, project: ProjectId) -> Option<TeamMember> {
		self
			.memberships(user)
			.into_iter()
			.find(|member| member.project == Some(project))
	}

	fn projects_of_user(&self, user: UserId) -> BTreeSet<ProjectId> {
		self
			.memberships(user)
			.into_iter()
			.filter_map(|member| member.project)
			.collect()
	}
}
