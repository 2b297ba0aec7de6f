// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::session::SessionToken;

#[derive(Debug, Error)]
pub enum RegistryError {
	#[error("unknown session {0}")]
	UnknownSession(SessionToken),

	#[error("failed to serialize message: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
