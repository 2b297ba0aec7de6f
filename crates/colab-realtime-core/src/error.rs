// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::channel::EffectiveChannel;
use crate::message::EntityKey;

/// Failure while preparing messages; never aborts the other channels.
#[derive(Debug, Error)]
pub enum PropagationError {
	#[error("failed to serialize {entity} for {} channel(s): {source}", .channels.len())]
	Serialization {
		entity: EntityKey,
		channels: Vec<EffectiveChannel>,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to assemble message for {channel}: {source}")]
	Message {
		channel: EffectiveChannel,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to serialize {message} message: {source}")]
	RawMessage {
		message: &'static str,
		#[source]
		source: serde_json::Error,
	},
}
