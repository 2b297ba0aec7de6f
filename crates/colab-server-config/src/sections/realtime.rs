// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Realtime (websocket channel) configuration section.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_QUEUE_CAPACITY: usize = 256;
const DEFAULT_PING_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RealtimeConfigLayer {
	pub queue_capacity: Option<usize>,
	pub ping_interval_secs: Option<u64>,
}

impl RealtimeConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
		if other.ping_interval_secs.is_some() {
			self.ping_interval_secs = other.ping_interval_secs;
		}
	}

	pub fn finalize(self) -> RealtimeConfig {
		RealtimeConfig {
			queue_capacity: self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY),
			ping_interval_secs: self.ping_interval_secs.unwrap_or(DEFAULT_PING_INTERVAL_SECS),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeConfig {
	/// Per-connection outbound queue length; messages beyond it are dropped
	/// for that connection.
	pub queue_capacity: usize,
	/// Heartbeat period; zero disables the heartbeat.
	pub ping_interval_secs: u64,
}

impl RealtimeConfig {
	pub fn ping_interval(&self) -> Option<Duration> {
		(self.ping_interval_secs > 0).then(|| Duration::from_secs(self.ping_interval_secs))
	}
}

impl Default for RealtimeConfig {
	fn default() -> Self {
		RealtimeConfigLayer::default().finalize()
	}
}
