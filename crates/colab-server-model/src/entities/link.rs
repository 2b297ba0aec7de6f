// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_realtime_core::{ChannelBuilder, WithChannels};
use colab_server_auth::{
	ActivityFlowLinkId, BlockId, CardContentId, CardId, Condition, StickyNoteLinkId, WithPermission,
};
use serde::Serialize;

use super::{card_of_content, owning_card_channels, owning_card_read, owning_card_write};
use crate::directory::Directory;

/// The element a sticky note link starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyNoteSource {
	Card(CardId),
	CardContent(CardContentId),
	Block(BlockId),
}

/// Sticky note pinned on a destination card, linking back to its source.
/// Exactly one of the `src_*` fields is set on a valid link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNoteLink {
	pub id: StickyNoteLinkId,
	pub src_card: Option<CardId>,
	pub src_card_content: Option<CardContentId>,
	pub src_block: Option<BlockId>,
	pub destination: Option<CardId>,
	pub teaser: String,
}

entity_identity!(StickyNoteLink, "StickyNoteLink");

impl StickyNoteLink {
	/// The single source, or `None` when zero or several are set.
	pub fn source(&self) -> Option<StickyNoteSource> {
		match (self.src_card, self.src_card_content, self.src_block) {
			(Some(card), None, None) => Some(StickyNoteSource::Card(card)),
			(None, Some(content), None) => Some(StickyNoteSource::CardContent(content)),
			(None, None, Some(block)) => Some(StickyNoteSource::Block(block)),
			_ => None,
		}
	}

	/// Card holding the source element.
	fn source_card<D: Directory + ?Sized>(&self, directory: &D) -> Option<CardId> {
		match self.source()? {
			StickyNoteSource::Card(card) => Some(card),
			StickyNoteSource::CardContent(content) => card_of_content(directory, Some(content)),
			StickyNoteSource::Block(block) => {
				card_of_content(directory, directory.block(block).and_then(|b| b.card_content))
			}
		}
	}

	fn source_read<D: Directory + ?Sized>(&self, directory: &D) -> Option<Condition> {
		self
			.source()
			.map(|_| owning_card_read(directory, self.source_card(directory)))
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for StickyNoteLink {
	fn read_condition(&self, directory: &D) -> Condition {
		let mut readers: Vec<Condition> = self.source_read(directory).into_iter().collect();
		readers.push(owning_card_read(directory, self.destination));
		Condition::Or(readers)
	}

	fn update_condition(&self, directory: &D) -> Condition {
		owning_card_write(directory, self.destination)
	}

	fn create_condition(&self, directory: &D) -> Condition {
		let mut requirements: Vec<Condition> = self.source_read(directory).into_iter().collect();
		requirements.push(owning_card_write(directory, self.destination));
		Condition::And(requirements)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for StickyNoteLink {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		owning_card_channels(directory, self.destination)
			.union(owning_card_channels(directory, self.source_card(directory)))
	}
}

/// Ordering edge between two cards of an activity flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFlowLink {
	pub id: ActivityFlowLinkId,
	pub previous: Option<CardId>,
	pub next: Option<CardId>,
}

entity_identity!(ActivityFlowLink, "ActivityFlowLink");

impl<D: Directory + ?Sized> WithPermission<D> for ActivityFlowLink {
	fn read_condition(&self, directory: &D) -> Condition {
		Condition::or([
			owning_card_read(directory, self.previous),
			owning_card_read(directory, self.next),
		])
	}

	fn update_condition(&self, directory: &D) -> Condition {
		Condition::and([
			owning_card_write(directory, self.previous),
			owning_card_write(directory, self.next),
		])
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for ActivityFlowLink {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		owning_card_channels(directory, self.previous)
			.union(owning_card_channels(directory, self.next))
	}
}
