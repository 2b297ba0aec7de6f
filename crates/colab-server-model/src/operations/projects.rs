// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_server_auth::{
	CardContentId, CardId, HierarchicalPosition, Operation, ProjectId, TeamMemberId,
};
use tracing::{info, instrument};

use super::found;
use crate::directory::Directory;
use crate::entities::{Card, CardContent, Project, TeamMember};
use crate::error::Result;
use crate::request::Request;

impl<D: Directory + ?Sized> Request<'_, D> {
	/// Creates a project owned by the actor, with its root card.
	#[instrument(skip(self), fields(user_id = ?self.actor()))]
	pub fn create_project(&mut self, name: &str) -> Result<Project> {
		let actor = self.require_actor()?;
		let directory = self.directory();

		let project = Project::new(ProjectId::new(directory.next_id()), name.trim());
		self.authorize(&project, Operation::Create)?;
		self.save(project.clone());

		self.save(TeamMember {
			id: TeamMemberId::new(directory.next_id()),
			project: Some(project.id),
			user: Some(actor),
			position: HierarchicalPosition::Owner,
			display_name: directory.user(actor).map(|user| user.username),
		});
		self.relationships_changed();

		let root = Card {
			id: CardId::new(directory.next_id()),
			project: Some(project.id),
			parent: None,
			card_type: None,
			title: project.name.clone(),
		};
		self.authorize(&root, Operation::Create)?;
		self.save(root.clone());
		self.save(CardContent {
			id: CardContentId::new(directory.next_id()),
			card: Some(root.id),
			title: String::new(),
		});

		info!(project_id = %project.id, "project created");
		Ok(project)
	}

	pub fn get_project(&mut self, id: ProjectId) -> Result<Project> {
		let project = found(self.directory().project(id), "Project", id)?;
		self.authorize(&project, Operation::Read)?;
		Ok(project)
	}

	pub fn rename_project(&mut self, id: ProjectId, name: &str) -> Result<Project> {
		let mut project = found(self.directory().project(id), "Project", id)?;
		self.authorize(&project, Operation::Update)?;
		project.name = name.trim().to_string();
		self.save(project.clone());
		Ok(project)
	}

	/// Makes a project visible to every authenticated user, or private again.
	/// A project made private keeps broadcasting until
	/// [`refresh_project_snapshot`](Self::refresh_project_snapshot).
	pub fn set_project_global(&mut self, id: ProjectId, global: bool) -> Result<Project> {
		let mut project = found(self.directory().project(id), "Project", id)?;
		self.authorize(&project, Operation::Update)?;
		project.is_global = global;
		self.save(project.clone());
		Ok(project)
	}

	/// Aligns `was_global` with `is_global`. Not propagated.
	pub fn refresh_project_snapshot(&mut self, id: ProjectId) -> Result<Project> {
		let mut project = found(self.directory().project(id), "Project", id)?;
		self.authorize(&project, Operation::Update)?;
		project.refresh_snapshot();
		self.directory().insert(project.clone().into());
		Ok(project)
	}
}
