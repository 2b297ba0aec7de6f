// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request evaluation state.

use std::collections::HashMap;

use super::Condition;
use crate::types::UserId;

/// Request-scoped cache of condition results plus the current actor.
///
/// One context is created per request (or unit of work) and dropped with it;
/// it is never shared between requests.
#[derive(Debug, Default)]
pub struct EvaluationContext {
	current_user: Option<UserId>,
	cache: HashMap<Condition, bool>,
	hits: u64,
}

impl EvaluationContext {
	/// Creates a context for the given actor (`None` for anonymous requests).
	pub fn new(current_user: Option<UserId>) -> Self {
		Self {
			current_user,
			cache: HashMap::new(),
			hits: 0,
		}
	}

	/// Creates a context for an authenticated actor.
	pub fn for_user(user: UserId) -> Self {
		Self::new(Some(user))
	}

	/// Creates a context without an actor.
	pub fn anonymous() -> Self {
		Self::new(None)
	}

	pub fn current_user(&self) -> Option<UserId> {
		self.current_user
	}

	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}

	/// Returns the memoized result for `condition`, if any.
	pub fn cached(&mut self, condition: &Condition) -> Option<bool> {
		let value = self.cache.get(condition).copied();
		if value.is_some() {
			self.hits += 1;
		}
		value
	}

	pub(crate) fn store(&mut self, condition: Condition, value: bool) {
		self.cache.insert(condition, value);
	}

	/// Number of memoized conditions.
	pub fn cached_len(&self) -> usize {
		self.cache.len()
	}

	/// Number of lookups answered from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.hits
	}

	/// Drops every memoized result.
	///
	/// Needed when the request itself changed data a cached condition depends
	/// on (e.g. after adding the actor to a project team).
	pub fn invalidate(&mut self) {
		self.cache.clear();
	}
}
