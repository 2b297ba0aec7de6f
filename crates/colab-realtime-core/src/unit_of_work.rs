// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Changes collected during one request, propagated on commit.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::channel::ChannelBuilder;
use crate::message::{EntityKey, IndexEntry, RawMessage};

/// Entity whose changes are pushed to clients.
pub trait Propagated: Serialize {
	fn entity_key(&self) -> EntityKey;

	/// Entry sent to clients once the entity is deleted.
	fn index_entry(&self) -> IndexEntry {
		IndexEntry::from(self.entity_key())
	}
}

/// Computes the audience of an entity from its current state.
pub trait WithChannels<L: ?Sized> {
	fn channels(&self, lookup: &L) -> ChannelBuilder;
}

/// A deleted entity: its index entry plus the audience captured while the
/// entity still existed.
#[derive(Debug, Clone)]
pub struct Deletion {
	pub entry: IndexEntry,
	pub channels: ChannelBuilder,
}

#[derive(Debug, Clone)]
pub struct QueuedMessage {
	pub channels: ChannelBuilder,
	pub message: RawMessage,
}

/// Request-owned change set.
///
/// An entity is either updated or deleted, never both: a deletion evicts a
/// pending update, and updates of an entity already deleted in this unit
/// are ignored. Repeated updates keep the latest state.
#[derive(Debug)]
pub struct UnitOfWork<E> {
	updated: BTreeMap<EntityKey, E>,
	deleted: BTreeMap<EntityKey, Deletion>,
	raw: Vec<QueuedMessage>,
}

impl<E> Default for UnitOfWork<E> {
	fn default() -> Self {
		Self {
			updated: BTreeMap::new(),
			deleted: BTreeMap::new(),
			raw: Vec::new(),
		}
	}
}

impl<E: Propagated> UnitOfWork<E> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the latest state of `entity`. Returns false when the entity
	/// was already deleted in this unit.
	pub fn register_update(&mut self, entity: E) -> bool {
		let key = entity.entity_key();
		if self.deleted.contains_key(&key) {
			trace!(entity = %key, "ignoring update of deleted entity");
			return false;
		}
		self.updated.insert(key, entity);
		true
	}

	/// Registers the deletion of `entity`; `channels` must be computed before
	/// the entity is detached from its owners.
	pub fn register_deletion(&mut self, entity: &E, channels: ChannelBuilder) {
		let key = entity.entity_key();
		self.updated.remove(&key);
		match self.deleted.entry(key) {
			Entry::Occupied(mut existing) => {
				existing.get_mut().channels.extend(channels);
			}
			Entry::Vacant(slot) => {
				slot.insert(Deletion {
					entry: entity.index_entry(),
					channels,
				});
			}
		}
	}

	pub fn queue_raw(&mut self, channels: ChannelBuilder, message: RawMessage) {
		self.raw.push(QueuedMessage { channels, message });
	}

	pub fn updated(&self) -> impl Iterator<Item = (&EntityKey, &E)> + '_ {
		self.updated.iter()
	}

	pub fn deleted(&self) -> impl Iterator<Item = (&EntityKey, &Deletion)> + '_ {
		self.deleted.iter()
	}

	pub fn raw(&self) -> &[QueuedMessage] {
		&self.raw
	}

	pub fn is_updated(&self, key: &EntityKey) -> bool {
		self.updated.contains_key(key)
	}

	pub fn is_deleted(&self, key: &EntityKey) -> bool {
		self.deleted.contains_key(key)
	}

	pub fn is_empty(&self) -> bool {
		self.updated.is_empty() && self.deleted.is_empty() && self.raw.is_empty()
	}

	/// Drops every pending change.
	pub fn clear(&mut self) {
		self.updated.clear();
		self.deleted.clear();
		self.raw.clear();
	}
}
