// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication failure throttling.

use std::sync::Arc;

use chrono::Duration;
use tracing::warn;

use crate::cache::{KeyValueCache, TtlCache};
use crate::error::AuthError;

/// Counts failed sign-in attempts per identifier within a sliding window.
///
/// Once `max_attempts` failures are recorded, further attempts for that
/// identifier are refused until the window elapses without new failures.
#[derive(Clone)]
pub struct AuthenticationFailureTracker {
	counters: Arc<dyn KeyValueCache<String, u32>>,
	max_attempts: u32,
}

impl AuthenticationFailureTracker {
	pub fn new(max_attempts: u32, window: Duration) -> Self {
		Self::with_cache(Arc::new(TtlCache::new(window)), max_attempts)
	}

	pub fn with_cache(counters: Arc<dyn KeyValueCache<String, u32>>, max_attempts: u32) -> Self {
		Self {
			counters,
			max_attempts,
		}
	}

	/// Fails with [`AuthError::Throttled`] while the identifier is blocked.
	pub fn check(&self, identifier: &str) -> Result<(), AuthError> {
		if self.failures(identifier) >= self.max_attempts {
			return Err(AuthError::Throttled);
		}
		Ok(())
	}

	pub fn failures(&self, identifier: &str) -> u32 {
		self
			.counters
			.get(&normalize(identifier))
			.unwrap_or_default()
	}

	/// Records one failure and returns the updated count.
	pub fn record_failure(&self, identifier: &str) -> u32 {
		let count = self.counters.update(normalize(identifier), &|current: Option<u32>| {
			current.unwrap_or_default().saturating_add(1)
		});
		if count >= self.max_attempts {
			warn!(failures = count, "authentication blocked after repeated failures");
		}
		count
	}

	pub fn reset(&self, identifier: &str) {
		self.counters.remove(&normalize(identifier));
	}
}

fn normalize(identifier: &str) -> String {
	identifier.trim().to_lowercase()
}
