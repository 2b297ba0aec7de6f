// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process [`Directory`] backed by ordered maps.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use colab_realtime_core::{ChannelLookup, Propagated};
use colab_server_auth::{
	AccessControlId, ActivityFlowLinkId, BlockId, CardContentId, CardId, CardTypeId, ProjectId,
	StickyNoteLinkId, TeamMemberId, TeamRoleId, UserId,
};
use parking_lot::RwLock;
use tracing::trace;

use crate::directory::Directory;
use crate::entities::{
	AccessControl, ActivityFlowLink, Block, Card, CardContent, CardType, ColabEntity, Project,
	StickyNoteLink, TeamMember, TeamRole, User,
};

#[derive(Default)]
struct Tables {
	users: BTreeMap<UserId, User>,
	projects: BTreeMap<ProjectId, Project>,
	team_members: BTreeMap<TeamMemberId, TeamMember>,
	team_roles: BTreeMap<TeamRoleId, TeamRole>,
	cards: BTreeMap<CardId, Card>,
	card_contents: BTreeMap<CardContentId, CardContent>,
	card_types: BTreeMap<CardTypeId, CardType>,
	blocks: BTreeMap<BlockId, Block>,
	sticky_note_links: BTreeMap<StickyNoteLinkId, StickyNoteLink>,
	activity_flow_links: BTreeMap<ActivityFlowLinkId, ActivityFlowLink>,
	access_controls: BTreeMap<AccessControlId, AccessControl>,
}

fn select<K, V, F>(table: &BTreeMap<K, V>, predicate: F) -> Vec<V>
where
	V: Clone,
	F: Fn(&V) -> bool,
{
	table.values().filter(|v| predicate(v)).cloned().collect()
}

pub struct InMemoryDirectory {
	tables: RwLock<Tables>,
	sequence: AtomicU64,
}

impl Default for InMemoryDirectory {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryDirectory {
	pub fn new() -> Self {
		Self {
			tables: RwLock::new(Tables::default()),
			sequence: AtomicU64::new(1),
		}
	}

	/// Creates a user directly, bypassing authorization. Used when
	/// provisioning accounts.
	pub fn register_user(&self, username: impl Into<String>, is_admin: bool) -> User {
		let user = User {
			id: UserId::new(self.next_id()),
			username: username.into(),
			is_admin,
		};
		self.insert(ColabEntity::User(user.clone()));
		user
	}

	pub fn users(&self) -> Vec<User> {
		self.tables.read().users.values().cloned().collect()
	}
}

impl ChannelLookup for InMemoryDirectory {
	fn admin_users(&self) -> Vec<UserId> {
		let tables = self.tables.read();
		tables
			.users
			.values()
			.filter(|user| user.is_admin)
			.map(|user| user.id)
			.collect()
	}

	fn project_team_users(&self, project: ProjectId) -> Vec<UserId> {
		let tables = self.tables.read();
		tables
			.team_members
			.values()
			.filter(|member| member.project == Some(project))
			.filter_map(|member| member.user)
			.collect()
	}
}

impl Directory for InMemoryDirectory {
	fn next_id(&self) -> u64 {
		self.sequence.fetch_add(1, Ordering::Relaxed)
	}

	fn insert(&self, entity: ColabEntity) {
		trace!(entity = %entity, "insert");
		let mut tables = self.tables.write();
		match entity {
			ColabEntity::User(e) => {
				tables.users.insert(e.id, e);
			}
			ColabEntity::Project(e) => {
				tables.projects.insert(e.id, e);
			}
			ColabEntity::TeamMember(e) => {
				tables.team_members.insert(e.id, e);
			}
			ColabEntity::TeamRole(e) => {
				tables.team_roles.insert(e.id, e);
			}
			ColabEntity::Card(e) => {
				tables.cards.insert(e.id, e);
			}
			ColabEntity::CardContent(e) => {
				tables.card_contents.insert(e.id, e);
			}
			ColabEntity::CardType(e) => {
				tables.card_types.insert(e.id, e);
			}
			ColabEntity::Block(e) => {
				tables.blocks.insert(e.id, e);
			}
			ColabEntity::StickyNoteLink(e) => {
				tables.sticky_note_links.insert(e.id, e);
			}
			ColabEntity::ActivityFlowLink(e) => {
				tables.activity_flow_links.insert(e.id, e);
			}
			ColabEntity::AccessControl(e) => {
				tables.access_controls.insert(e.id, e);
			}
		}
	}

	fn remove(&self, entity: &ColabEntity) {
		trace!(entity = %entity.entity_key(), "remove");
		let mut tables = self.tables.write();
		match entity {
			ColabEntity::User(e) => {
				tables.users.remove(&e.id);
			}
			ColabEntity::Project(e) => {
				tables.projects.remove(&e.id);
			}
			ColabEntity::TeamMember(e) => {
				tables.team_members.remove(&e.id);
			}
			ColabEntity::TeamRole(e) => {
				tables.team_roles.remove(&e.id);
			}
			ColabEntity::Card(e) => {
				tables.cards.remove(&e.id);
			}
			ColabEntity::CardContent(e) => {
				tables.card_contents.remove(&e.id);
			}
			ColabEntity::CardType(e) => {
				tables.card_types.remove(&e.id);
			}
			ColabEntity::Block(e) => {
				tables.blocks.remove(&e.id);
			}
			ColabEntity::StickyNoteLink(e) => {
				tables.sticky_note_links.remove(&e.id);
			}
			ColabEntity::ActivityFlowLink(e) => {
				tables.activity_flow_links.remove(&e.id);
			}
			ColabEntity::AccessControl(e) => {
				tables.access_controls.remove(&e.id);
			}
		}
	}

	fn user(&self, id: UserId) -> Option<User> {
		self.tables.read().users.get(&id).cloned()
	}

	fn user_by_username(&self, username: &str) -> Option<User> {
		let tables = self.tables.read();
		tables
			.users
			.values()
			.find(|user| user.username.eq_ignore_ascii_case(username))
			.cloned()
	}

	fn project(&self, id: ProjectId) -> Option<Project> {
		self.tables.read().projects.get(&id).cloned()
	}

	fn team_member(&self, id: TeamMemberId) -> Option<TeamMember> {
		self.tables.read().team_members.get(&id).cloned()
	}

	fn team_members(&self, project: ProjectId) -> Vec<TeamMember> {
		select(&self.tables.read().team_members, |m| m.project == Some(project))
	}

	fn memberships(&self, user: UserId) -> Vec<TeamMember> {
		select(&self.tables.read().team_members, |m| m.user == Some(user))
	}

	fn team_role(&self, id: TeamRoleId) -> Option<TeamRole> {
		self.tables.read().team_roles.get(&id).cloned()
	}

	fn team_roles(&self, project: ProjectId) -> Vec<TeamRole> {
		select(&self.tables.read().team_roles, |r| r.project == Some(project))
	}

	fn card(&self, id: CardId) -> Option<Card> {
		self.tables.read().cards.get(&id).cloned()
	}

	fn cards(&self, project: ProjectId) -> Vec<Card> {
		select(&self.tables.read().cards, |c| c.project == Some(project))
	}

	fn card_content(&self, id: CardContentId) -> Option<CardContent> {
		self.tables.read().card_contents.get(&id).cloned()
	}

	fn card_contents(&self, card: CardId) -> Vec<CardContent> {
		select(&self.tables.read().card_contents, |c| c.card == Some(card))
	}

	fn block(&self, id: BlockId) -> Option<Block> {
		self.tables.read().blocks.get(&id).cloned()
	}

	fn card_type(&self, id: CardTypeId) -> Option<CardType> {
		self.tables.read().card_types.get(&id).cloned()
	}

	fn card_types(&self, project: Option<ProjectId>) -> Vec<CardType> {
		select(&self.tables.read().card_types, |t| t.project == project)
	}

	fn direct_references(&self, id: CardTypeId) -> Vec<CardType> {
		select(&self.tables.read().card_types, |t| t.target == Some(id))
	}

	fn access_control(&self, id: AccessControlId) -> Option<AccessControl> {
		self.tables.read().access_controls.get(&id).cloned()
	}

	fn access_controls(&self, card: CardId) -> Vec<AccessControl> {
		select(&self.tables.read().access_controls, |a| a.card == Some(card))
	}

	fn access_controls_of_member(&self, member: TeamMemberId) -> Vec<AccessControl> {
		select(&self.tables.read().access_controls, |a| a.member == Some(member))
	}

	fn sticky_note_link(&self, id: StickyNoteLinkId) -> Option<StickyNoteLink> {
		self.tables.read().sticky_note_links.get(&id).cloned()
	}

	fn activity_flow_link(&self, id: ActivityFlowLinkId) -> Option<ActivityFlowLink> {
		self.tables.read().activity_flow_links.get(&id).cloned()
	}
}
