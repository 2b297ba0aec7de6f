// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain entities.
//!
//! Every entity implements [`WithPermission`](colab_server_auth::WithPermission)
//! and [`WithChannels`](colab_realtime_core::WithChannels) over any
//! [`Directory`]. Relationships are stored as optional ids; a missing or
//! dangling relationship makes the entity an orphan, which is readable by
//! anyone, writable by no one (admins aside) and has no audience.

use colab_realtime_core::{ChannelBuilder, EffectiveChannel};
use colab_server_auth::{CardContentId, CardId, Condition, ProjectId};

use crate::directory::Directory;

/// Implements `Propagated` and `Display` (`Kind#id`) for an entity with an
/// `id` field. The optional closure builds the deletion payload.
macro_rules! entity_identity {
	($ty:ty, $kind:literal) => {
		entity_identity!($ty, $kind, |_entity| None);
	};
	($ty:ty, $kind:literal, |$entity:ident| $payload:expr) => {
		impl colab_realtime_core::Propagated for $ty {
			fn entity_key(&self) -> colab_realtime_core::EntityKey {
				colab_realtime_core::EntityKey::new($kind, self.id.get())
			}

			fn index_entry(&self) -> colab_realtime_core::IndexEntry {
				let $entity = self;
				let payload: Option<serde_json::Value> = $payload;
				colab_realtime_core::IndexEntry {
					payload,
					..colab_realtime_core::IndexEntry::from(self.entity_key())
				}
			}
		}

		impl std::fmt::Display for $ty {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}#{}", $kind, self.id)
			}
		}
	};
}

mod access;
mod card;
mod card_type;
mod colab_entity;
mod link;
mod project;
mod team;
mod user;

pub use access::{AccessControl, AccessSubject};
pub use card::{Block, Card, CardContent};
pub use card_type::CardType;
pub use colab_entity::ColabEntity;
pub use link::{ActivityFlowLink, StickyNoteLink, StickyNoteSource};
pub use project::Project;
pub use team::{TeamMember, TeamRole};
pub use user::User;

/// Card owning `content`, if both resolve.
pub(crate) fn card_of_content<D: Directory + ?Sized>(
	directory: &D,
	content: Option<CardContentId>,
) -> Option<CardId> {
	content
		.and_then(|id| directory.card_content(id))
		.and_then(|content| content.card)
}

/// Project of `card`, if the card resolves and is attached to one.
pub(crate) fn project_of_card<D: Directory + ?Sized>(
	directory: &D,
	card: Option<CardId>,
) -> Option<ProjectId> {
	card.and_then(|id| directory.card(id)).and_then(|card| card.project)
}

/// Read right on an owning card; unresolvable owners are readable.
pub(crate) fn owning_card_read<D: Directory + ?Sized>(
	directory: &D,
	card: Option<CardId>,
) -> Condition {
	match card.filter(|_| project_of_card(directory, card).is_some()) {
		Some(id) => Condition::HasCardReadRight(id),
		None => Condition::AlwaysTrue,
	}
}

/// Write right on an owning card; unresolvable owners are never writable.
pub(crate) fn owning_card_write<D: Directory + ?Sized>(
	directory: &D,
	card: Option<CardId>,
) -> Condition {
	match card.filter(|_| project_of_card(directory, card).is_some()) {
		Some(id) => Condition::HasCardWriteRight(id),
		None => Condition::AlwaysFalse,
	}
}

/// Content editors of the project owning `card`.
pub(crate) fn owning_card_channels<D: Directory + ?Sized>(
	directory: &D,
	card: Option<CardId>,
) -> ChannelBuilder {
	project_of_card(directory, card)
		.map(|project| ChannelBuilder::effective(EffectiveChannel::ProjectContent(project)))
		.unwrap_or_default()
}
