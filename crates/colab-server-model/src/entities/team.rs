// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use colab_realtime_core::{ChannelBuilder, EffectiveChannel, MetaChannel, WithChannels};
use colab_server_auth::{
	Condition, HierarchicalPosition, ProjectId, TeamMemberId, TeamRoleId, UserId, WithPermission,
};
use serde::Serialize;
use serde_json::json;

use crate::directory::Directory;

/// Membership of a user in a project team. A member without a user is a
/// pending invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
	pub id: TeamMemberId,
	pub project: Option<ProjectId>,
	pub user: Option<UserId>,
	pub position: HierarchicalPosition,
	pub display_name: Option<String>,
}

entity_identity!(TeamMember, "TeamMember", |member| member
	.project
	.map(|project| json!({ "projectId": project })));

impl TeamMember {
	pub fn is_pending(&self) -> bool {
		self.user.is_none()
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for TeamMember {
	fn read_condition(&self, _: &D) -> Condition {
		match self.project {
			Some(project) => Condition::IsProjectMember(project),
			None => Condition::AlwaysTrue,
		}
	}

	fn update_condition(&self, _: &D) -> Condition {
		let Some(project) = self.project else {
			return Condition::AlwaysFalse;
		};
		let mut editors = vec![Condition::IsProjectInternal(project)];
		if let Some(user) = self.user {
			editors.push(Condition::IsCurrentUser(user));
		}
		Condition::Or(editors)
	}

	fn create_condition(&self, _: &D) -> Condition {
		self
			.project
			.map_or(Condition::AlwaysFalse, Condition::IsProjectInternal)
	}

	fn delete_condition(&self, directory: &D) -> Condition {
		self.create_condition(directory)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for TeamMember {
	fn channels(&self, _: &D) -> ChannelBuilder {
		let Some(project) = self.project else {
			return ChannelBuilder::empty();
		};
		let mut builder = ChannelBuilder::meta(MetaChannel::ProjectOverview(project));
		if let Some(user) = self.user {
			builder.push(EffectiveChannel::User(user));
		}
		builder
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRole {
	pub id: TeamRoleId,
	pub project: Option<ProjectId>,
	pub name: String,
	pub members: BTreeSet<TeamMemberId>,
}

entity_identity!(TeamRole, "TeamRole", |role| role
	.project
	.map(|project| json!({ "projectId": project })));

impl<D: Directory + ?Sized> WithPermission<D> for TeamRole {
	fn read_condition(&self, _: &D) -> Condition {
		self
			.project
			.map_or(Condition::AlwaysTrue, Condition::IsProjectMember)
	}

	fn update_condition(&self, _: &D) -> Condition {
		self
			.project
			.map_or(Condition::AlwaysFalse, Condition::IsProjectInternal)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for TeamRole {
	fn channels(&self, _: &D) -> ChannelBuilder {
		self
			.project
			.map(|project| ChannelBuilder::meta(MetaChannel::ProjectOverview(project)))
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::InMemoryDirectory;

	fn member(project: Option<u64>, user: Option<u64>) -> TeamMember {
		TeamMember {
			id: TeamMemberId::new(1),
			project: project.map(ProjectId::new),
			user: user.map(UserId::new),
			position: HierarchicalPosition::Guest,
			display_name: None,
		}
	}

	mod orphans {
		use super::*;

		#[test]
		fn orphan_member_has_no_audience() {
			let directory = InMemoryDirectory::new();
			assert!(member(None, Some(3)).channels(&directory).is_empty());
		}

		#[test]
		fn orphan_member_is_readable_but_frozen() {
			let directory = InMemoryDirectory::new();
			let orphan = member(None, Some(3));
			assert_eq!(orphan.read_condition(&directory), Condition::AlwaysTrue);
			assert_eq!(orphan.update_condition(&directory), Condition::AlwaysFalse);
			assert_eq!(orphan.delete_condition(&directory), Condition::AlwaysFalse);
		}

		#[test]
		fn orphan_role_has_no_audience() {
			let directory = InMemoryDirectory::new();
			let role = TeamRole {
				id: TeamRoleId::new(1),
				project: None,
				name: "r".to_string(),
				members: BTreeSet::new(),
			};
			assert!(role.channels(&directory).is_empty());
			assert_eq!(role.read_condition(&directory), Condition::AlwaysTrue);
		}
	}

	#[test]
	fn linked_member_reaches_its_user() {
		let directory = InMemoryDirectory::new();
		let builder = member(Some(2), Some(3)).channels(&directory);
		assert!(builder.contains(EffectiveChannel::User(UserId::new(3))));
		assert!(builder.contains(MetaChannel::ProjectOverview(ProjectId::new(2))));
	}

	#[test]
	fn member_may_update_itself() {
		let directory = InMemoryDirectory::new();
		assert_eq!(
			member(Some(2), Some(3)).update_condition(&directory),
			Condition::or([
				Condition::IsProjectInternal(ProjectId::new(2)),
				Condition::IsCurrentUser(UserId::new(3)),
			])
		);
	}

	#[test]
	fn deletion_entry_names_project() {
		use colab_realtime_core::Propagated;

		let entry = member(Some(2), Some(3)).index_entry();
		assert_eq!(entry.kind, "TeamMember");
		assert_eq!(entry.payload, Some(json!({ "projectId": 2 })));
	}
}
