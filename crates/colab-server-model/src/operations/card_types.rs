// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_server_auth::{CardTypeId, Operation, ProjectId};
use tracing::info;

use super::found;
use crate::directory::Directory;
use crate::entities::CardType;
use crate::error::{ModelError, Result};
use crate::request::Request;

impl<D: Directory + ?Sized> Request<'_, D> {
	/// Creates a card type in `project`, or a global one for `None` (admins
	/// only).
	pub fn create_card_type(
		&mut self,
		project: Option<ProjectId>,
		title: &str,
	) -> Result<CardType> {
		let directory = self.directory();
		if let Some(project) = project {
			found(directory.project(project), "Project", project)?;
		}
		let card_type = CardType {
			id: CardTypeId::new(directory.next_id()),
			project,
			target: None,
			title: title.trim().to_string(),
			published: false,
			was_published: false,
			deprecated: false,
		};
		self.authorize(&card_type, Operation::Create)?;
		self.save(card_type.clone());
		Ok(card_type)
	}

	pub fn get_card_type(&mut self, id: CardTypeId) -> Result<CardType> {
		let card_type = found(self.directory().card_type(id), "CardType", id)?;
		self.authorize(&card_type, Operation::Read)?;
		Ok(card_type)
	}

	/// Makes a type owned elsewhere usable in `project` through a reference.
	pub fn reference_card_type(
		&mut self,
		project: ProjectId,
		target: CardTypeId,
	) -> Result<CardType> {
		let directory = self.directory();
		found(directory.project(project), "Project", project)?;
		let target = self.get_card_type(target)?;
		if target.project == Some(project) {
			return Err(ModelError::integrity(format!(
				"{target} already belongs to Project#{project}"
			)));
		}
		if directory
			.card_types(Some(project))
			.iter()
			.any(|existing| existing.target == Some(target.id))
		{
			return Err(ModelError::integrity(format!(
				"{target} is already referenced by Project#{project}"
			)));
		}

		let reference = CardType {
			id: CardTypeId::new(directory.next_id()),
			project: Some(project),
			target: Some(target.id),
			title: target.title.clone(),
			published: false,
			was_published: false,
			deprecated: false,
		};
		self.authorize(&reference, Operation::Create)?;
		self.save(reference.clone());
		Ok(reference)
	}

	/// Publishing opens a type to other projects. Unpublishing keeps the
	/// previous audience informed until the snapshot is refreshed.
	pub fn set_card_type_published(&mut self, id: CardTypeId, published: bool) -> Result<CardType> {
		let mut card_type = found(self.directory().card_type(id), "CardType", id)?;
		self.authorize(&card_type, Operation::Update)?;
		card_type.published = published;
		self.save(card_type.clone());
		info!(card_type = %card_type, published, "card type publication changed");
		Ok(card_type)
	}

	/// Aligns `was_published` with `published`. Not propagated.
	pub fn refresh_publication_snapshot(&mut self, id: CardTypeId) -> Result<CardType> {
		let mut card_type = found(self.directory().card_type(id), "CardType", id)?;
		self.authorize(&card_type, Operation::Update)?;
		card_type.refresh_publication_snapshot();
		self.directory().insert(card_type.clone().into());
		Ok(card_type)
	}

	/// Deletes a type that no other type references.
	pub fn delete_card_type(&mut self, id: CardTypeId) -> Result<()> {
		let directory = self.directory();
		let card_type = found(directory.card_type(id), "CardType", id)?;
		self.authorize(&card_type, Operation::Delete)?;
		if !directory.direct_references(id).is_empty() {
			return Err(ModelError::integrity(format!("{card_type} is still referenced")));
		}
		self.delete(card_type);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use colab_realtime_core::{prepare_messages, EffectiveChannel};
	use colab_server_auth::{AuthError, UserId};

	use super::*;
	use crate::memory::InMemoryDirectory;

	struct Catalog {
		directory: InMemoryDirectory,
		admin: UserId,
		alice: UserId,
		project: ProjectId,
	}

	fn catalog() -> Catalog {
		let directory = InMemoryDirectory::new();
		let admin = directory.register_user("admin", true).id;
		let alice = directory.register_user("alice", false).id;
		let project = Request::new(&directory, Some(alice))
			.create_project("Apollo")
			.unwrap()
			.id;
		Catalog {
			directory,
			admin,
			alice,
			project,
		}
	}

	#[test]
	fn only_admins_create_global_types() {
		let c = catalog();
		assert!(matches!(
			Request::new(&c.directory, Some(c.alice)).create_card_type(None, "Task"),
			Err(ModelError::Auth(AuthError::Forbidden { .. }))
		));
		assert!(Request::new(&c.directory, Some(c.admin))
			.create_card_type(None, "Task")
			.is_ok());
	}

	#[test]
	fn unpublished_global_type_cannot_be_referenced() {
		let c = catalog();
		let global = Request::new(&c.directory, Some(c.admin))
			.create_card_type(None, "Task")
			.unwrap();
		let mut request = Request::new(&c.directory, Some(c.alice));
		assert!(matches!(
			request.reference_card_type(c.project, global.id),
			Err(ModelError::Auth(AuthError::NotFound { .. }))
		));
	}

	#[test]
	fn published_global_type_is_referenced_once() {
		let c = catalog();
		let mut request = Request::new(&c.directory, Some(c.admin));
		let global = request.create_card_type(None, "Task").unwrap();
		request.set_card_type_published(global.id, true).unwrap();

		let mut request = Request::new(&c.directory, Some(c.alice));
		let reference = request.reference_card_type(c.project, global.id).unwrap();
		assert_eq!(reference.title, "Task");
		assert!(matches!(
			request.reference_card_type(c.project, global.id),
			Err(ModelError::DataIntegrity(_))
		));

		let prepared = prepare_messages(request.unit_of_work(), &c.directory);
		assert!(prepared
			.get(&EffectiveChannel::ProjectContent(c.project))
			.is_some());
	}

	#[test]
	fn referenced_type_cannot_be_deleted() {
		let c = catalog();
		let mut request = Request::new(&c.directory, Some(c.admin));
		let global = request.create_card_type(None, "Task").unwrap();
		request.set_card_type_published(global.id, true).unwrap();
		let reference = Request::new(&c.directory, Some(c.alice))
			.reference_card_type(c.project, global.id)
			.unwrap();

		let mut request = Request::new(&c.directory, Some(c.admin));
		assert!(matches!(
			request.delete_card_type(global.id),
			Err(ModelError::DataIntegrity(_))
		));
		Request::new(&c.directory, Some(c.alice))
			.delete_card_type(reference.id)
			.unwrap();
		request.delete_card_type(global.id).unwrap();
		assert!(c.directory.card_type(global.id).is_none());
	}
}
