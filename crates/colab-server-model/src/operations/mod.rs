// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Business operations, implemented on [`Request`](crate::Request).
//!
//! Each operation loads what it needs, authorizes against the state it is
//! about to write, mutates the directory and registers the changes with the
//! request's unit of work.

mod card_types;
mod cards;
mod links;
mod projects;
mod team;
mod users;

use crate::error::{ModelError, Result};

fn found<T>(entity: Option<T>, kind: &'static str, id: impl Into<u64>) -> Result<T> {
	entity.ok_or_else(|| ModelError::not_found(kind, id))
}
