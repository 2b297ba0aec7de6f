// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! [`SecurityService`] answering leaf conditions from a [`Directory`].

use std::collections::{BTreeSet, HashSet};

use colab_server_auth::{
	CardId, HierarchicalPosition, InvolvementLevel, ProjectId, SecurityService, TeamRoleId, UserId,
};
use tracing::trace;

use crate::directory::Directory;
use crate::entities::{AccessControl, AccessSubject};

pub struct DirectorySecurity<'a, D: ?Sized> {
	directory: &'a D,
}

impl<'a, D: Directory + ?Sized> DirectorySecurity<'a, D> {
	pub fn new(directory: &'a D) -> Self {
		Self { directory }
	}

	fn position(&self, actor: UserId, project: ProjectId) -> Option<HierarchicalPosition> {
		self
			.directory
			.team_member_of(actor, project)
			.map(|member| member.position)
	}

	/// Resolves the actor's involvement in `card`.
	///
	/// Walks from the card up through its ancestors. On each card, an entry
	/// for the actor's team member wins over role entries, and among role
	/// entries the most permissive one applies. Without any entry the
	/// member's position default is used. Non-members have no involvement.
	pub fn involvement(&self, actor: UserId, card: CardId) -> Option<InvolvementLevel> {
		let project = self.directory.card(card)?.project?;
		let member = self.directory.team_member_of(actor, project)?;
		let roles: HashSet<TeamRoleId> = self
			.directory
			.team_roles(project)
			.into_iter()
			.filter(|role| role.members.contains(&member.id))
			.map(|role| role.id)
			.collect();

		let mut visited = HashSet::new();
		let mut current = Some(card);
		while let Some(id) = current {
			if !visited.insert(id) {
				break;
			}
			let entries = self.directory.access_controls(id);
			let subject = AccessSubject::Member(member.id);
			if let Some(level) = explicit_level(&entries, subject, &roles) {
				trace!(card = %id, ?level, "involvement from access control");
				return Some(level);
			}
			current = self
				.directory
				.card(id)
				.and_then(|c| c.parent)
				.and_then(|content| self.directory.card_content(content))
				.and_then(|content| content.card);
		}

		Some(member.position.default_involvement())
	}

	fn projects_sharing_types(&self, projects: &BTreeSet<ProjectId>) -> BTreeSet<ProjectId> {
		let mut related = BTreeSet::new();
		for project in projects {
			for card_type in self.directory.card_types(Some(*project)) {
				related.extend(card_type.referencing_projects(self.directory));
				let owner = card_type
					.target
					.and_then(|target| self.directory.card_type(target))
					.and_then(|target| target.project);
				related.extend(owner);
			}
		}
		related
	}
}

fn explicit_level(
	entries: &[AccessControl],
	member: AccessSubject,
	roles: &HashSet<TeamRoleId>,
) -> Option<InvolvementLevel> {
	if let Some(entry) = entries.iter().find(|entry| entry.applies_to(member)) {
		return Some(entry.level);
	}
	entries
		.iter()
		.filter(|entry| {
			matches!(entry.subject(), Some(AccessSubject::Role(role)) if roles.contains(&role))
		})
		.map(|entry| entry.level)
		.max_by_key(InvolvementLevel::capability_rank)
}

impl<D: Directory + ?Sized> SecurityService for DirectorySecurity<'_, D> {
	fn is_admin(&self, actor: UserId) -> bool {
		self.directory.user(actor).is_some_and(|user| user.is_admin)
	}

	fn is_project_member(&self, actor: UserId, project: ProjectId) -> bool {
		self.position(actor, project).is_some()
	}

	fn is_project_owner(&self, actor: UserId, project: ProjectId) -> bool {
		self.position(actor, project) == Some(HierarchicalPosition::Owner)
	}

	fn is_project_internal(&self, actor: UserId, project: ProjectId) -> bool {
		self
			.position(actor, project)
			.is_some_and(|position| position.is_internal())
	}

	fn are_team_mates(&self, actor: UserId, user: UserId) -> bool {
		let mine = self.directory.projects_of_user(actor);
		let theirs = self.directory.projects_of_user(user);
		!mine.is_disjoint(&theirs)
	}

	fn work_on_same_project(&self, actor: UserId, user: UserId) -> bool {
		let mine = self.directory.projects_of_user(actor);
		let theirs = self.directory.projects_of_user(user);
		if !mine.is_disjoint(&theirs) {
			return true;
		}
		!self.projects_sharing_types(&mine).is_disjoint(&theirs)
	}

	fn has_card_read_right(&self, actor: UserId, card: CardId) -> bool {
		self
			.involvement(actor, card)
			.is_some_and(|level| level.can_read())
	}

	fn has_card_write_right(&self, actor: UserId, card: CardId) -> bool {
		self
			.involvement(actor, card)
			.is_some_and(|level| level.can_write())
	}
}
