// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in throttling configuration section.

use serde::{Deserialize, Serialize};

/// Longest accepted failure window: one week.
pub const MAX_FAILURE_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthConfigLayer {
	pub max_failed_attempts: Option<u32>,
	pub failure_window_secs: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_failed_attempts.is_some() {
			self.max_failed_attempts = other.max_failed_attempts;
		}
		if other.failure_window_secs.is_some() {
			self.failure_window_secs = other.failure_window_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			max_failed_attempts: self.max_failed_attempts.unwrap_or(5),
			failure_window_secs: self.failure_window_secs.unwrap_or(900), // 15 minutes
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
	pub max_failed_attempts: u32,
	pub failure_window_secs: u64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			max_failed_attempts: 5,
			failure_window_secs: 900,
		}
	}
}
