// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::{BTreeSet, HashSet};

use colab_realtime_core::{ChannelBuilder, EffectiveChannel, MetaChannel, WithChannels};
use colab_server_auth::{CardTypeId, Condition, ProjectId, WithPermission};
use serde::Serialize;
use serde_json::json;

use crate::directory::Directory;

/// A card type, or a reference to one when `target` is set.
///
/// Types without a project are global and managed by admins. A project uses a
/// type owned elsewhere through a reference owned by that project; references
/// may themselves be referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardType {
	pub id: CardTypeId,
	pub project: Option<ProjectId>,
	pub target: Option<CardTypeId>,
	pub title: String,
	pub published: bool,
	/// `published` as of the last snapshot.
	#[serde(skip)]
	pub was_published: bool,
	pub deprecated: bool,
}

entity_identity!(CardType, "CardType", |card_type| card_type
	.project
	.map(|project| json!({ "projectId": project })));

impl CardType {
	pub fn is_global(&self) -> bool {
		self.project.is_none()
	}

	pub fn is_reference(&self) -> bool {
		self.target.is_some()
	}

	/// Published now or at the last snapshot.
	pub fn is_or_was_published(&self) -> bool {
		self.published || self.was_published
	}

	pub fn refresh_publication_snapshot(&mut self) {
		self.was_published = self.published;
	}

	/// Projects reaching this type through references, transitively.
	pub fn referencing_projects<D: Directory + ?Sized>(
		&self,
		directory: &D,
	) -> BTreeSet<ProjectId> {
		let mut visited = HashSet::from([self.id]);
		let mut pending = vec![self.id];
		let mut projects = BTreeSet::new();
		while let Some(id) = pending.pop() {
			for reference in directory.direct_references(id) {
				if !visited.insert(reference.id) {
					continue;
				}
				projects.extend(reference.project);
				pending.push(reference.id);
			}
		}
		if let Some(own) = self.project {
			projects.remove(&own);
		}
		projects
	}

	fn collect_channels<D: Directory + ?Sized>(
		&self,
		directory: &D,
		visited: &mut HashSet<CardTypeId>,
	) -> ChannelBuilder {
		if !visited.insert(self.id) {
			return ChannelBuilder::empty();
		}

		let mut builder = match self.project {
			Some(project) => {
				let mut builder =
					ChannelBuilder::effective(EffectiveChannel::ProjectContent(project));
				if self.is_or_was_published() {
					builder.push(MetaChannel::ProjectOverview(project));
				}
				builder
			}
			None if self.is_or_was_published() => {
				ChannelBuilder::effective(EffectiveChannel::Broadcast)
			}
			// Never shown outside the admins, so references are not followed.
			None => return ChannelBuilder::meta(MetaChannel::Admin),
		};

		for reference in directory.direct_references(self.id) {
			builder.extend(reference.collect_channels(directory, visited));
		}
		builder
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for CardType {
	fn read_condition(&self, directory: &D) -> Condition {
		match self.project {
			Some(project) => {
				let mut readers = vec![Condition::IsProjectMember(project)];
				readers.extend(
					self
						.referencing_projects(directory)
						.into_iter()
						.map(Condition::IsProjectMember),
				);
				if self.published {
					readers.push(Condition::IsAuthenticated);
				}
				Condition::Or(readers)
			}
			None if self.published => Condition::IsAuthenticated,
			None => Condition::AlwaysFalse,
		}
	}

	fn update_condition(&self, _: &D) -> Condition {
		self
			.project
			.map_or(Condition::AlwaysFalse, Condition::IsProjectInternal)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for CardType {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		self.collect_channels(directory, &mut HashSet::new())
	}
}
