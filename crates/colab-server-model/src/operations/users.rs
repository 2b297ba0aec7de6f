// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_server_auth::{Operation, UserId};
use tracing::info;

use super::found;
use crate::directory::Directory;
use crate::entities::User;
use crate::error::{ModelError, Result};
use crate::request::Request;

impl<D: Directory + ?Sized> Request<'_, D> {
	/// Signs up a new, non-admin user.
	pub fn create_user(&mut self, username: &str) -> Result<User> {
		let username = valid_username(username)?;
		let directory = self.directory();
		if directory.user_by_username(username).is_some() {
			return Err(ModelError::integrity(format!("username {username} is taken")));
		}
		let user = User {
			id: UserId::new(directory.next_id()),
			username: username.to_string(),
			is_admin: false,
		};
		self.authorize(&user, Operation::Create)?;
		self.save(user.clone());
		info!(user_id = %user.id, "user created");
		Ok(user)
	}

	pub fn get_user(&mut self, id: UserId) -> Result<User> {
		let user = found(self.directory().user(id), "User", id)?;
		self.authorize(&user, Operation::Read)?;
		Ok(user)
	}

	pub fn rename_user(&mut self, id: UserId, username: &str) -> Result<User> {
		let username = valid_username(username)?;
		let mut user = found(self.directory().user(id), "User", id)?;
		self.authorize(&user, Operation::Update)?;
		if self
			.directory()
			.user_by_username(username)
			.is_some_and(|other| other.id != id)
		{
			return Err(ModelError::integrity(format!("username {username} is taken")));
		}
		user.username = username.to_string();
		self.save(user.clone());
		Ok(user)
	}
}

fn valid_username(username: &str) -> Result<&str> {
	let username = username.trim();
	if username.is_empty() {
		return Err(ModelError::integrity("username must not be empty"));
	}
	Ok(username)
}
