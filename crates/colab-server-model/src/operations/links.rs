// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_server_auth::{ActivityFlowLinkId, CardId, Operation, StickyNoteLinkId};

use super::found;
use crate::directory::Directory;
use crate::entities::{ActivityFlowLink, StickyNoteLink, StickyNoteSource};
use crate::error::{ModelError, Result};
use crate::request::Request;

impl<D: Directory + ?Sized> Request<'_, D> {
	/// Pins a sticky note on `destination` pointing back at `source`.
	pub fn create_sticky_note_link(
		&mut self,
		source: StickyNoteSource,
		destination: CardId,
		teaser: &str,
	) -> Result<StickyNoteLink> {
		let (src_card, src_card_content, src_block) = match source {
			StickyNoteSource::Card(card) => (Some(card), None, None),
			StickyNoteSource::CardContent(content) => (None, Some(content), None),
			StickyNoteSource::Block(block) => (None, None, Some(block)),
		};
		self.insert_sticky_note_link(StickyNoteLink {
			id: StickyNoteLinkId::new(self.directory().next_id()),
			src_card,
			src_card_content,
			src_block,
			destination: Some(destination),
			teaser: teaser.trim().to_string(),
		})
	}

	/// Stores a fully described link; exactly one source must be set.
	pub fn insert_sticky_note_link(&mut self, link: StickyNoteLink) -> Result<StickyNoteLink> {
		let directory = self.directory();
		let source = link.source().ok_or_else(|| {
			ModelError::integrity(format!("{link} must have exactly one source"))
		})?;
		match source {
			StickyNoteSource::Card(id) => {
				found(directory.card(id), "Card", id)?;
			}
			StickyNoteSource::CardContent(id) => {
				found(directory.card_content(id), "CardContent", id)?;
			}
			StickyNoteSource::Block(id) => {
				found(directory.block(id), "Block", id)?;
			}
		}
		let destination = link
			.destination
			.ok_or_else(|| ModelError::integrity(format!("{link} has no destination")))?;
		found(directory.card(destination), "Card", destination)?;

		self.authorize(&link, Operation::Create)?;
		self.save(link.clone());
		Ok(link)
	}

	pub fn delete_sticky_note_link(&mut self, id: StickyNoteLinkId) -> Result<()> {
		let link = found(self.directory().sticky_note_link(id), "StickyNoteLink", id)?;
		self.authorize(&link, Operation::Delete)?;
		self.delete(link);
		Ok(())
	}

	pub fn create_activity_flow_link(
		&mut self,
		previous: CardId,
		next: CardId,
	) -> Result<ActivityFlowLink> {
		let directory = self.directory();
		if previous == next {
			return Err(ModelError::integrity(format!(
				"Card#{previous} cannot follow itself"
			)));
		}
		found(directory.card(previous), "Card", previous)?;
		found(directory.card(next), "Card", next)?;
		let link = ActivityFlowLink {
			id: ActivityFlowLinkId::new(directory.next_id()),
			previous: Some(previous),
			next: Some(next),
		};
		self.authorize(&link, Operation::Create)?;
		self.save(link.clone());
		Ok(link)
	}
}
