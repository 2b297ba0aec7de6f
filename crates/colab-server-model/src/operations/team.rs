// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use colab_server_auth::{
	HierarchicalPosition, Operation, ProjectId, TeamMemberId, TeamRoleId, UserId,
};
use tracing::{info, instrument};

use super::found;
use crate::directory::Directory;
use crate::entities::{TeamMember, TeamRole};
use crate::error::{ModelError, Result};
use crate::request::Request;

impl<D: Directory + ?Sized> Request<'_, D> {
	/// Adds an existing user to a project team.
	pub fn add_team_member(
		&mut self,
		project: ProjectId,
		user: UserId,
		position: HierarchicalPosition,
	) -> Result<TeamMember> {
		let directory = self.directory();
		found(directory.project(project), "Project", project)?;
		let user = found(directory.user(user), "User", user)?;
		if directory.team_member_of(user.id, project).is_some() {
			return Err(ModelError::integrity(format!(
				"{user} is already a member of Project#{project}"
			)));
		}

		let member = TeamMember {
			id: TeamMemberId::new(directory.next_id()),
			project: Some(project),
			user: Some(user.id),
			position,
			display_name: Some(user.username.clone()),
		};
		self.authorize(&member, Operation::Create)?;
		self.save(member.clone());
		self.relationships_changed();
		self.touch(user);
		Ok(member)
	}

	/// Adds a pending member, linked to a user once the invitation is accepted.
	pub fn invite_team_member(
		&mut self,
		project: ProjectId,
		display_name: &str,
		position: HierarchicalPosition,
	) -> Result<TeamMember> {
		let directory = self.directory();
		found(directory.project(project), "Project", project)?;
		let member = TeamMember {
			id: TeamMemberId::new(directory.next_id()),
			project: Some(project),
			user: None,
			position,
			display_name: Some(display_name.trim().to_string()),
		};
		self.authorize(&member, Operation::Create)?;
		self.save(member.clone());
		Ok(member)
	}

	/// Links a pending member to `user`. Authorized against the linked
	/// state, so the invited user may accept on their own.
	pub fn link_team_member(&mut self, id: TeamMemberId, user: UserId) -> Result<TeamMember> {
		let directory = self.directory();
		let mut member = found(directory.team_member(id), "TeamMember", id)?;
		if !member.is_pending() {
			return Err(ModelError::integrity(format!("{member} is already linked")));
		}
		let project = member
			.project
			.ok_or_else(|| ModelError::integrity(format!("{member} has no project")))?;
		let user = found(directory.user(user), "User", user)?;
		if directory.team_member_of(user.id, project).is_some() {
			return Err(ModelError::integrity(format!(
				"{user} is already a member of Project#{project}"
			)));
		}

		member.user = Some(user.id);
		self.authorize(&member, Operation::Update)?;
		self.save(member.clone());
		self.relationships_changed();
		self.touch(user);
		Ok(member)
	}

	/// Removes a member from its team, its roles and every access control
	/// entry naming it. The last owner of a project cannot be removed.
	#[instrument(skip(self), fields(user_id = ?self.actor()))]
	pub fn delete_team_member(&mut self, id: TeamMemberId) -> Result<()> {
		let directory = self.directory();
		let member = found(directory.team_member(id), "TeamMember", id)?;
		self.authorize(&member, Operation::Delete)?;

		if let Some(project) = member.project {
			let owners = directory
				.team_members(project)
				.iter()
				.filter(|m| m.position == HierarchicalPosition::Owner && !m.is_pending())
				.count();
			let linked_owner =
				member.position == HierarchicalPosition::Owner && !member.is_pending();
			if linked_owner && owners <= 1 {
				return Err(ModelError::integrity(format!(
					"cannot remove the last owner of Project#{project}"
				)));
			}
			for mut role in directory.team_roles(project) {
				if role.members.remove(&member.id) {
					self.save(role);
				}
			}
		}
		for access in directory.access_controls_of_member(member.id) {
			self.delete(access);
		}
		self.delete(member.clone());
		self.relationships_changed();
		info!(member = %member, "team member removed");
		Ok(())
	}

	pub fn create_team_role(&mut self, project: ProjectId, name: &str) -> Result<TeamRole> {
		let directory = self.directory();
		found(directory.project(project), "Project", project)?;
		let role = TeamRole {
			id: TeamRoleId::new(directory.next_id()),
			project: Some(project),
			name: name.trim().to_string(),
			members: BTreeSet::new(),
		};
		self.authorize(&role, Operation::Create)?;
		self.save(role.clone());
		Ok(role)
	}

	pub fn assign_role(&mut self, role: TeamRoleId, member: TeamMemberId) -> Result<TeamRole> {
		let directory = self.directory();
		let mut role = found(directory.team_role(role), "TeamRole", role)?;
		let member = found(directory.team_member(member), "TeamMember", member)?;
		if role.project.is_none() || role.project != member.project {
			return Err(ModelError::integrity(format!(
				"{member} and {role} belong to different projects"
			)));
		}
		self.authorize(&role, Operation::Update)?;
		if role.members.insert(member.id) {
			self.save(role.clone());
			self.relationships_changed();
		}
		Ok(role)
	}
}
