// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use colab_realtime_core::{ChannelBuilder, EntityKey, IndexEntry, Propagated, WithChannels};
use colab_server_auth::{Condition, WithPermission};
use serde::Serialize;

use super::{
	AccessControl, ActivityFlowLink, Block, Card, CardContent, CardType, Project, StickyNoteLink,
	TeamMember, TeamRole, User,
};
use crate::directory::Directory;

/// Any entity tracked by a unit of work. Serialized with its kind as the
/// `"@class"` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@class")]
pub enum ColabEntity {
	User(User),
	Project(Project),
	TeamMember(TeamMember),
	TeamRole(TeamRole),
	Card(Card),
	CardContent(CardContent),
	CardType(CardType),
	Block(Block),
	StickyNoteLink(StickyNoteLink),
	ActivityFlowLink(ActivityFlowLink),
	AccessControl(AccessControl),
}

macro_rules! each_entity {
	($value:expr, $inner:ident => $body:expr) => {
		match $value {
			ColabEntity::User($inner) => $body,
			ColabEntity::Project($inner) => $body,
			ColabEntity::TeamMember($inner) => $body,
			ColabEntity::TeamRole($inner) => $body,
			ColabEntity::Card($inner) => $body,
			ColabEntity::CardContent($inner) => $body,
			ColabEntity::CardType($inner) => $body,
			ColabEntity::Block($inner) => $body,
			ColabEntity::StickyNoteLink($inner) => $body,
			ColabEntity::ActivityFlowLink($inner) => $body,
			ColabEntity::AccessControl($inner) => $body,
		}
	};
}

macro_rules! impl_from_entity {
	($($variant:ident),* $(,)?) => {
		$(
			impl From<$variant> for ColabEntity {
				fn from(entity: $variant) -> Self {
					ColabEntity::$variant(entity)
				}
			}
		)*
	};
}

impl_from_entity!(
	User,
	Project,
	TeamMember,
	TeamRole,
	Card,
	CardContent,
	CardType,
	Block,
	StickyNoteLink,
	ActivityFlowLink,
	AccessControl,
);

impl Propagated for ColabEntity {
	fn entity_key(&self) -> EntityKey {
		each_entity!(self, entity => entity.entity_key())
	}

	fn index_entry(&self) -> IndexEntry {
		each_entity!(self, entity => entity.index_entry())
	}
}

impl fmt::Display for ColabEntity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		each_entity!(self, entity => fmt::Display::fmt(entity, f))
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for ColabEntity {
	fn read_condition(&self, directory: &D) -> Condition {
		each_entity!(self, entity => entity.read_condition(directory))
	}

	fn update_condition(&self, directory: &D) -> Condition {
		each_entity!(self, entity => entity.update_condition(directory))
	}

	fn create_condition(&self, directory: &D) -> Condition {
		each_entity!(self, entity => entity.create_condition(directory))
	}

	fn delete_condition(&self, directory: &D) -> Condition {
		each_entity!(self, entity => entity.delete_condition(directory))
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for ColabEntity {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		each_entity!(self, entity => entity.channels(directory))
	}
}
