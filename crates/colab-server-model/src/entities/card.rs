// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_realtime_core::{ChannelBuilder, EffectiveChannel, WithChannels};
use colab_server_auth::{
	BlockId, CardContentId, CardId, CardTypeId, Condition, ProjectId, WithPermission,
};
use serde::Serialize;

use super::{card_of_content, owning_card_channels, owning_card_read, owning_card_write};
use crate::directory::Directory;

/// A card. Root cards have no parent content; every other card is nested in
/// a content of another card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
	pub id: CardId,
	pub project: Option<ProjectId>,
	pub parent: Option<CardContentId>,
	pub card_type: Option<CardTypeId>,
	pub title: String,
}

entity_identity!(Card, "Card");

impl<D: Directory + ?Sized> WithPermission<D> for Card {
	fn read_condition(&self, _: &D) -> Condition {
		match self.project {
			Some(_) => Condition::HasCardReadRight(self.id),
			None => Condition::AlwaysTrue,
		}
	}

	fn update_condition(&self, _: &D) -> Condition {
		match self.project {
			Some(_) => Condition::HasCardWriteRight(self.id),
			None => Condition::AlwaysFalse,
		}
	}

	/// Nested cards need write access on the parent card; root cards need an
	/// internal position in the project.
	fn create_condition(&self, directory: &D) -> Condition {
		match (self.project, self.parent) {
			(None, _) => Condition::AlwaysFalse,
			(Some(project), None) => Condition::IsProjectInternal(project),
			(Some(_), Some(parent)) => {
				owning_card_write(directory, card_of_content(directory, Some(parent)))
			}
		}
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for Card {
	fn channels(&self, _: &D) -> ChannelBuilder {
		self
			.project
			.map(|project| ChannelBuilder::effective(EffectiveChannel::ProjectContent(project)))
			.unwrap_or_default()
	}
}

/// One variant of a card's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
	pub id: CardContentId,
	pub card: Option<CardId>,
	pub title: String,
}

entity_identity!(CardContent, "CardContent");

impl<D: Directory + ?Sized> WithPermission<D> for CardContent {
	fn read_condition(&self, directory: &D) -> Condition {
		owning_card_read(directory, self.card)
	}

	fn update_condition(&self, directory: &D) -> Condition {
		owning_card_write(directory, self.card)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for CardContent {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		owning_card_channels(directory, self.card)
	}
}

/// A text block of a card content document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
	pub id: BlockId,
	pub card_content: Option<CardContentId>,
	pub text: String,
}

entity_identity!(Block, "Block");

impl<D: Directory + ?Sized> WithPermission<D> for Block {
	fn read_condition(&self, directory: &D) -> Condition {
		owning_card_read(directory, card_of_content(directory, self.card_content))
	}

	fn update_condition(&self, directory: &D) -> Condition {
		owning_card_write(directory, card_of_content(directory, self.card_content))
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for Block {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		let card = card_of_content(directory, self.card_content);
		let content = owning_card_channels(directory, card);
		if content.is_empty() {
			return content;
		}
		content.union(ChannelBuilder::effective(EffectiveChannel::Block(self.id)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entities::ColabEntity;
	use crate::memory::InMemoryDirectory;
	use crate::Directory as _;

	fn directory() -> InMemoryDirectory {
		let directory = InMemoryDirectory::new();
		directory.insert(ColabEntity::Card(Card {
			id: CardId::new(1),
			project: Some(ProjectId::new(9)),
			parent: None,
			card_type: None,
			title: "root".to_string(),
		}));
		directory.insert(ColabEntity::CardContent(CardContent {
			id: CardContentId::new(2),
			card: Some(CardId::new(1)),
			title: "v1".to_string(),
		}));
		directory
	}

	fn block(content: Option<u64>) -> Block {
		Block {
			id: BlockId::new(3),
			card_content: content.map(CardContentId::new),
			text: "hello".to_string(),
		}
	}

	#[test]
	fn block_inherits_card_rights() {
		let directory = directory();
		let block = block(Some(2));
		assert_eq!(
			block.read_condition(&directory),
			Condition::HasCardReadRight(CardId::new(1))
		);
		assert_eq!(
			block.update_condition(&directory),
			Condition::HasCardWriteRight(CardId::new(1))
		);
	}

	#[test]
	fn block_reaches_its_editors_and_project_content() {
		let directory = directory();
		let builder = block(Some(2)).channels(&directory);
		assert!(builder.contains(EffectiveChannel::Block(BlockId::new(3))));
		assert!(builder.contains(EffectiveChannel::ProjectContent(ProjectId::new(9))));
	}

	#[test]
	fn dangling_block_is_an_orphan() {
		let directory = directory();
		let orphan = block(Some(77));
		assert!(orphan.channels(&directory).is_empty());
		assert_eq!(orphan.read_condition(&directory), Condition::AlwaysTrue);
		assert_eq!(orphan.create_condition(&directory), Condition::AlwaysFalse);
	}

	#[test]
	fn nested_card_creation_needs_parent_write() {
		let directory = directory();
		let nested = Card {
			id: CardId::new(5),
			project: Some(ProjectId::new(9)),
			parent: Some(CardContentId::new(2)),
			card_type: None,
			title: "child".to_string(),
		};
		assert_eq!(
			nested.create_condition(&directory),
			Condition::HasCardWriteRight(CardId::new(1))
		);
	}

	#[test]
	fn root_card_creation_needs_internal_position() {
		let directory = directory();
		let root = Card {
			id: CardId::new(6),
			project: Some(ProjectId::new(9)),
			parent: None,
			card_type: None,
			title: "root".to_string(),
		};
		assert_eq!(
			root.create_condition(&directory),
			Condition::IsProjectInternal(ProjectId::new(9))
		);
	}
}
