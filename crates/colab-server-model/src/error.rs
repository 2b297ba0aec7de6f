// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for business operations.

use colab_server_auth::AuthError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	#[error("{kind}#{id} not found")]
	NotFound { kind: &'static str, id: u64 },

	#[error("authentication required")]
	Unauthenticated,

	#[error(transparent)]
	Auth(#[from] AuthError),

	/// The operation would leave the model in an inconsistent state.
	#[error("data integrity violation: {0}")]
	DataIntegrity(String),
}

impl ModelError {
	pub(crate) fn not_found(kind: &'static str, id: impl Into<u64>) -> Self {
		Self::NotFound {
			kind,
			id: id.into(),
		}
	}

	pub(crate) fn integrity(message: impl Into<String>) -> Self {
		Self::DataIntegrity(message.into())
	}
}
