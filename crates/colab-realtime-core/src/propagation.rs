// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turns a committed [`UnitOfWork`] into per-channel wire messages.
//!
//! Each entity is serialized once into a raw JSON fragment which is then
//! embedded verbatim into the single `WsUpdateMessage` of every channel it
//! reaches. Finished message strings are reference counted so dispatching the
//! same message to many channels never copies it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::channel::{ChannelLookup, ChannelResolver, EffectiveChannel};
use crate::error::PropagationError;
use crate::message::UpdateMessage;
use crate::unit_of_work::{Propagated, UnitOfWork, WithChannels};

/// Output of [`prepare_messages`]: messages keyed by effective channel, plus
/// anything that could not be serialized.
#[derive(Debug, Default)]
pub struct PreparedMessages {
	messages: BTreeMap<EffectiveChannel, Vec<Arc<str>>>,
	errors: Vec<PropagationError>,
}

impl PreparedMessages {
	pub fn get(&self, channel: &EffectiveChannel) -> Option<&[Arc<str>]> {
		self.messages.get(channel).map(Vec::as_slice)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&EffectiveChannel, &[Arc<str>])> + '_ {
		self.messages.iter().map(|(c, m)| (c, m.as_slice()))
	}

	pub fn channels(&self) -> impl Iterator<Item = &EffectiveChannel> + '_ {
		self.messages.keys()
	}

	/// Number of channels with at least one message.
	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	pub fn message_count(&self) -> usize {
		self.messages.values().map(Vec::len).sum()
	}

	pub fn errors(&self) -> &[PropagationError] {
		&self.errors
	}

	pub fn take_errors(&mut self) -> Vec<PropagationError> {
		std::mem::take(&mut self.errors)
	}

	fn push(&mut self, channel: EffectiveChannel, message: Arc<str>) {
		self.messages.entry(channel).or_default().push(message);
	}
}

#[derive(Default)]
struct PendingUpdate {
	updated: Vec<usize>,
	deleted: Vec<usize>,
}

/// Resolves the audience of every change in `work` and assembles one update
/// message per channel, followed by any queued raw messages.
pub fn prepare_messages<E, L>(work: &UnitOfWork<E>, lookup: &L) -> PreparedMessages
where
	E: Propagated + WithChannels<L>,
	L: ChannelLookup + ?Sized,
{
	let mut resolver = ChannelResolver::new(lookup);
	let mut prepared = PreparedMessages::default();
	let mut pending: BTreeMap<EffectiveChannel, PendingUpdate> = BTreeMap::new();
	let mut updated: Vec<Box<RawValue>> = Vec::new();
	let mut deleted: Vec<Box<RawValue>> = Vec::new();

	for (key, entity) in work.updated() {
		let channels = resolver.resolve(&entity.channels(lookup));
		if channels.is_empty() {
			debug!(entity = %key, "update has no audience");
			continue;
		}
		match serde_json::value::to_raw_value(entity) {
			Ok(fragment) => {
				let index = updated.len();
				updated.push(fragment);
				for channel in channels {
					pending.entry(channel).or_default().updated.push(index);
				}
			}
			Err(source) => {
				warn!(entity = %key, error = %source, "failed to serialize updated entity");
				prepared.errors.push(PropagationError::Serialization {
					entity: *key,
					channels: channels.into_iter().collect(),
					source,
				});
			}
		}
	}

	for (key, deletion) in work.deleted() {
		let channels = resolver.resolve(&deletion.channels);
		if channels.is_empty() {
			debug!(entity = %key, "deletion has no audience");
			continue;
		}
		match serde_json::value::to_raw_value(&deletion.entry) {
			Ok(fragment) => {
				let index = deleted.len();
				deleted.push(fragment);
				for channel in channels {
					pending.entry(channel).or_default().deleted.push(index);
				}
			}
			Err(source) => {
				warn!(entity = %key, error = %source, "failed to serialize deleted entry");
				prepared.errors.push(PropagationError::Serialization {
					entity: *key,
					channels: channels.into_iter().collect(),
					source,
				});
			}
		}
	}

	for (channel, indexes) in pending {
		let message = UpdateMessage {
			updated: indexes.updated.iter().map(|&i| &*updated[i]).collect(),
			deleted: indexes.deleted.iter().map(|&i| &*deleted[i]).collect(),
		};
		match serde_json::to_string(&message) {
			Ok(json) => prepared.push(channel, Arc::from(json)),
			Err(source) => {
				warn!(%channel, error = %source, "failed to assemble update message");
				prepared
					.errors
					.push(PropagationError::Message { channel, source });
			}
		}
	}

	for queued in work.raw() {
		let channels = resolver.resolve(&queued.channels);
		if channels.is_empty() {
			debug!(message = queued.message.event_type(), "raw message has no audience");
			continue;
		}
		match serde_json::to_string(&queued.message) {
			Ok(json) => {
				let shared: Arc<str> = Arc::from(json);
				for channel in channels {
					prepared.push(channel, Arc::clone(&shared));
				}
			}
			Err(source) => prepared.errors.push(PropagationError::RawMessage {
				message: queued.message.event_type(),
				source,
			}),
		}
	}

	debug!(
		channels = prepared.len(),
		messages = prepared.message_count(),
		errors = prepared.errors.len(),
		"prepared propagation messages"
	);
	prepared
}
