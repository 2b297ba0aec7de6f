// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_realtime_core::{ChannelBuilder, EffectiveChannel, MetaChannel, WithChannels};
use colab_server_auth::{Condition, ProjectId, WithPermission};
use serde::Serialize;

use crate::directory::Directory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	pub id: ProjectId,
	pub name: String,
	/// Global projects are visible to every authenticated user.
	pub is_global: bool,
	/// `is_global` as of the last snapshot; a project made private keeps
	/// notifying its former public audience until the snapshot is refreshed.
	#[serde(skip)]
	pub was_global: bool,
}

entity_identity!(Project, "Project");

impl Project {
	pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
			is_global: false,
			was_global: false,
		}
	}

	pub fn refresh_snapshot(&mut self) {
		self.was_global = self.is_global;
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for Project {
	fn read_condition(&self, _: &D) -> Condition {
		let mut readers = vec![Condition::IsProjectMember(self.id)];
		if self.is_global {
			readers.push(Condition::IsAuthenticated);
		}
		Condition::Or(readers)
	}

	fn update_condition(&self, _: &D) -> Condition {
		Condition::IsProjectInternal(self.id)
	}

	fn create_condition(&self, _: &D) -> Condition {
		Condition::AlwaysTrue
	}

	fn delete_condition(&self, _: &D) -> Condition {
		Condition::IsProjectOwner(self.id)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for Project {
	fn channels(&self, _: &D) -> ChannelBuilder {
		let mut builder = ChannelBuilder::meta(MetaChannel::ProjectOverview(self.id));
		if self.is_global || self.was_global {
			builder.push(EffectiveChannel::Broadcast);
		}
		builder
	}
}
