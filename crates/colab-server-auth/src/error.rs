// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for authorization.

use thiserror::Error;

use crate::types::Operation;

/// Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors surfaced to callers when an operation is not authorized.
///
/// A `false` condition is an ordinary outcome of evaluation; these values are
/// what the calling layer turns into "forbidden" or "not found" responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
	#[error("authentication required")]
	Unauthenticated,

	#[error("{operation} forbidden on {entity}")]
	Forbidden { operation: Operation, entity: String },

	/// Denied reads are reported as missing so existence is not leaked.
	#[error("{entity} not found")]
	NotFound { entity: String },

	/// Unknown identifier and wrong credentials are deliberately the same error.
	#[error("invalid credentials")]
	InvalidCredentials,

	#[error("too many failed attempts, retry later")]
	Throttled,
}
