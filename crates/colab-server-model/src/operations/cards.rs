// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_server_auth::{
	AccessControlId, BlockId, CardContentId, CardId, CardTypeId, InvolvementLevel, Operation,
};

use super::found;
use crate::directory::Directory;
use crate::entities::{AccessControl, AccessSubject, Block, Card, CardContent};
use crate::error::{ModelError, Result};
use crate::request::Request;

impl<D: Directory + ?Sized> Request<'_, D> {
	pub fn get_card(&mut self, id: CardId) -> Result<Card> {
		let card = found(self.directory().card(id), "Card", id)?;
		self.authorize(&card, Operation::Read)?;
		Ok(card)
	}

	/// Creates a card nested in `parent`, with one empty content.
	pub fn create_card(
		&mut self,
		parent: CardContentId,
		title: &str,
		card_type: Option<CardTypeId>,
	) -> Result<Card> {
		let directory = self.directory();
		let content = found(directory.card_content(parent), "CardContent", parent)?;
		let project = content
			.card
			.and_then(|card| directory.card(card))
			.and_then(|card| card.project)
			.ok_or_else(|| {
				ModelError::integrity(format!("{content} is detached from any project"))
			})?;
		if let Some(card_type) = card_type {
			found(directory.card_type(card_type), "CardType", card_type)?;
		}

		let card = Card {
			id: CardId::new(directory.next_id()),
			project: Some(project),
			parent: Some(parent),
			card_type,
			title: title.trim().to_string(),
		};
		self.authorize(&card, Operation::Create)?;
		self.save(card.clone());
		self.save(CardContent {
			id: CardContentId::new(directory.next_id()),
			card: Some(card.id),
			title: String::new(),
		});
		Ok(card)
	}

	/// Adds a content variant to a card.
	pub fn create_card_content(&mut self, card: CardId, title: &str) -> Result<CardContent> {
		let directory = self.directory();
		found(directory.card(card), "Card", card)?;
		let content = CardContent {
			id: CardContentId::new(directory.next_id()),
			card: Some(card),
			title: title.trim().to_string(),
		};
		self.authorize(&content, Operation::Create)?;
		self.save(content.clone());
		Ok(content)
	}

	pub fn create_block(&mut self, content: CardContentId, text: &str) -> Result<Block> {
		let directory = self.directory();
		found(directory.card_content(content), "CardContent", content)?;
		let block = Block {
			id: BlockId::new(directory.next_id()),
			card_content: Some(content),
			text: text.to_string(),
		};
		self.authorize(&block, Operation::Create)?;
		self.save(block.clone());
		Ok(block)
	}

	pub fn update_block(&mut self, id: BlockId, text: &str) -> Result<Block> {
		let mut block = found(self.directory().block(id), "Block", id)?;
		self.authorize(&block, Operation::Update)?;
		block.text = text.to_string();
		self.save(block.clone());
		Ok(block)
	}

	/// Sets the involvement of a member or role in a card, replacing any
	/// entry for the same subject.
	pub fn set_access_control(
		&mut self,
		card: CardId,
		subject: AccessSubject,
		level: InvolvementLevel,
	) -> Result<AccessControl> {
		let directory = self.directory();
		let card = found(directory.card(card), "Card", card)?;
		let project = card
			.project
			.ok_or_else(|| ModelError::integrity(format!("{card} has no project")))?;
		let subject_project = match subject {
			AccessSubject::Member(member) => {
				found(directory.team_member(member), "TeamMember", member)?.project
			}
			AccessSubject::Role(role) => {
				found(directory.team_role(role), "TeamRole", role)?.project
			}
		};
		if subject_project != Some(project) {
			return Err(ModelError::integrity(format!(
				"access control subject is not part of Project#{project}"
			)));
		}

		let existing = directory
			.access_controls(card.id)
			.into_iter()
			.find(|entry| entry.applies_to(subject));
		let operation = if existing.is_some() {
			Operation::Update
		} else {
			Operation::Create
		};
		let (member, role) = match subject {
			AccessSubject::Member(member) => (Some(member), None),
			AccessSubject::Role(role) => (None, Some(role)),
		};
		let entry = AccessControl {
			id: existing.map_or_else(|| AccessControlId::new(directory.next_id()), |e| e.id),
			card: Some(card.id),
			member,
			role,
			level,
		};
		self.authorize(&entry, operation)?;
		self.save(entry.clone());
		self.relationships_changed();
		Ok(entry)
	}
}

#[cfg(test)]
mod tests {
	use colab_realtime_core::{prepare_messages, EffectiveChannel};
	use colab_server_auth::{HierarchicalPosition, ProjectId, UserId};

	use super::*;
	use crate::memory::InMemoryDirectory;

	struct Board {
		directory: InMemoryDirectory,
		owner: UserId,
		guest: UserId,
		project: ProjectId,
		root_content: CardContentId,
	}

	fn board() -> Board {
		let directory = InMemoryDirectory::new();
		let owner = directory.register_user("owner", false).id;
		let guest = directory.register_user("guest", false).id;
		let mut request = Request::new(&directory, Some(owner));
		let project = request.create_project("Apollo").unwrap().id;
		request
			.add_team_member(project, guest, HierarchicalPosition::Guest)
			.unwrap();
		let root = directory
			.cards(project)
			.into_iter()
			.find(|card| card.parent.is_none())
			.unwrap();
		let root_content = directory.card_contents(root.id)[0].id;
		Board {
			directory,
			owner,
			guest,
			project,
			root_content,
		}
	}

	#[test]
	fn owner_builds_card_tree() {
		let b = board();
		let mut request = Request::new(&b.directory, Some(b.owner));
		let card = request.create_card(b.root_content, "Task", None).unwrap();
		assert_eq!(card.project, Some(b.project));
		let content = request.create_card_content(card.id, "v2").unwrap();
		let block = request.create_block(content.id, "hello").unwrap();

		let prepared = prepare_messages(request.unit_of_work(), &b.directory);
		let editors = prepared
			.get(&EffectiveChannel::ProjectContent(b.project))
			.unwrap();
		let body: serde_json::Value = serde_json::from_str(&editors[0]).unwrap();
		assert_eq!(body["updated"].as_array().unwrap().len(), 4);
		assert!(prepared.get(&EffectiveChannel::Block(block.id)).is_some());
	}

	#[test]
	fn guest_reads_but_cannot_write() {
		let b = board();
		let card = Request::new(&b.directory, Some(b.owner))
			.create_card(b.root_content, "Task", None)
			.unwrap();
		let mut request = Request::new(&b.directory, Some(b.guest));
		assert!(request.get_card(card.id).is_ok());
		assert!(matches!(
			request.create_card_content(card.id, "mine"),
			Err(ModelError::Auth(_))
		));
	}

	#[test]
	fn access_control_grants_write_to_guest() {
		let b = board();
		let mut request = Request::new(&b.directory, Some(b.owner));
		let card = request.create_card(b.root_content, "Task", None).unwrap();
		let guest = b.directory.team_member_of(b.guest, b.project).unwrap();
		let subject = AccessSubject::Member(guest.id);
		let first = request
			.set_access_control(card.id, subject, InvolvementLevel::ConsultedReadOnly)
			.unwrap();
		let second = request
			.set_access_control(card.id, subject, InvolvementLevel::Accountable)
			.unwrap();
		assert_eq!(first.id, second.id);

		let mut request = Request::new(&b.directory, Some(b.guest));
		assert!(request.create_card_content(card.id, "mine").is_ok());
	}

	#[test]
	fn missing_parent_is_not_found() {
		let b = board();
		let mut request = Request::new(&b.directory, Some(b.owner));
		assert_eq!(
			request.create_card(CardContentId::new(999), "x", None),
			Err(ModelError::NotFound {
				kind: "CardContent",
				id: 999
			})
		);
	}
}
