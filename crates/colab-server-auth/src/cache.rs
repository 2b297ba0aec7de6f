// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Key-value cache with time-to-live eviction.
//!
//! Entries expire `ttl` after their last write. Expired entries are invisible
//! to readers immediately and are physically removed on the next access to the
//! same key or by [`TtlCache::purge_expired`].

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

/// Shared cache abstraction used for request-spanning state such as
/// authentication failure counters.
pub trait KeyValueCache<K, V>: Send + Sync {
	fn get(&self, key: &K) -> Option<V>;

	fn set(&self, key: K, value: V);

	fn remove(&self, key: &K) -> Option<V>;

	/// Replaces the value of `key` with `f(current)` as one atomic step and
	/// returns the stored value.
	fn update(&self, key: K, f: &dyn Fn(Option<V>) -> V) -> V;
}

struct Entry<V> {
	value: V,
	expires_at: DateTime<Utc>,
}

/// In-process [`KeyValueCache`] with a single TTL for all entries.
pub struct TtlCache<K, V> {
	ttl: Duration,
	entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
	K: Eq + Hash + Clone + Send + Sync,
	V: Clone + Send + Sync,
{
	pub fn new(ttl: Duration) -> Self {
		Self {
			ttl,
			entries: RwLock::new(HashMap::new()),
		}
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Reads `key` as of `now`.
	pub fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
		{
			let entries = self.entries.read();
			match entries.get(key) {
				Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
				Some(_) => {}
				None => return None,
			}
		}

		let mut entries = self.entries.write();
		if entries.get(key).is_some_and(|e| e.expires_at <= now) {
			entries.remove(key);
		}
		None
	}

	/// Writes `key` as of `now`; the entry expires at `now + ttl`.
	pub fn set_at(&self, key: K, value: V, now: DateTime<Utc>) {
		let expires_at = self.expiry(now);
		self.entries.write().insert(key, Entry { value, expires_at });
	}

	/// Read-modify-write of `key` under one write lock. An expired entry is
	/// passed to `f` as absent.
	pub fn update_at(&self, key: K, now: DateTime<Utc>, f: &dyn Fn(Option<V>) -> V) -> V {
		let expires_at = self.expiry(now);
		let mut entries = self.entries.write();
		let current = entries
			.remove(&key)
			.filter(|entry| entry.expires_at > now)
			.map(|entry| entry.value);
		let value = f(current);
		entries.insert(
			key,
			Entry {
				value: value.clone(),
				expires_at,
			},
		);
		value
	}

	fn expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
		now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
	}

	/// Removes every entry expired as of `now`, returning how many were dropped.
	pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
		let mut entries = self.entries.write();
		let before = entries.len();
		entries.retain(|_, entry| entry.expires_at > now);
		let purged = before - entries.len();
		if purged > 0 {
			debug!(purged, remaining = entries.len(), "purged expired cache entries");
		}
		purged
	}

	pub fn purge_expired(&self) -> usize {
		self.purge_expired_at(Utc::now())
	}

	/// Number of stored entries, including expired ones not yet purged.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<K, V> KeyValueCache<K, V> for TtlCache<K, V>
where
	K: Eq + Hash + Clone + Send + Sync,
	V: Clone + Send + Sync,
{
	fn get(&self, key: &K) -> Option<V> {
		self.get_at(key, Utc::now())
	}

	fn set(&self, key: K, value: V) {
		self.set_at(key, value, Utc::now());
	}

	fn remove(&self, key: &K) -> Option<V> {
		self.entries.write().remove(key).map(|entry| entry.value)
	}

	fn update(&self, key: K, f: &dyn Fn(Option<V>) -> V) -> V {
		self.update_at(key, Utc::now(), f)
	}
}
