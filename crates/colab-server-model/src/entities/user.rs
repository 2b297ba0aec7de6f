// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_realtime_core::{ChannelBuilder, EffectiveChannel, MetaChannel, WithChannels};
use colab_server_auth::{Condition, UserId, WithPermission};
use serde::Serialize;

use crate::directory::Directory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: UserId,
	pub username: String,
	pub is_admin: bool,
}

entity_identity!(User, "User");

impl<D: Directory + ?Sized> WithPermission<D> for User {
	fn read_condition(&self, _: &D) -> Condition {
		Condition::or([
			Condition::IsCurrentUser(self.id),
			Condition::IsTeamMateOf(self.id),
			Condition::WorksOnSameProjectAs(self.id),
		])
	}

	fn update_condition(&self, _: &D) -> Condition {
		Condition::IsCurrentUser(self.id)
	}

	fn create_condition(&self, _: &D) -> Condition {
		Condition::AlwaysTrue
	}

	fn delete_condition(&self, _: &D) -> Condition {
		Condition::AlwaysFalse
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for User {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		let mut builder = ChannelBuilder::effective(EffectiveChannel::User(self.id));
		builder.push(MetaChannel::Admin);
		for project in directory.projects_of_user(self.id) {
			builder.push(MetaChannel::ProjectOverview(project));
		}
		builder
	}
}
