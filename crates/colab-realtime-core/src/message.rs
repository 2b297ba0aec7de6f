// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire messages sent over client connections.
//!
//! Every message and entity carries an `"@class"` discriminator.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Key identifying one entity across kinds, e.g. `Project#3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
	pub kind: &'static str,
	pub id: u64,
}

impl EntityKey {
	pub const fn new(kind: &'static str, id: u64) -> Self {
		Self { kind, id }
	}
}

impl fmt::Display for EntityKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}#{}", self.kind, self.id)
	}
}

/// Minimal reference to a deleted entity, sent in place of its full state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
	#[serde(rename = "type")]
	pub kind: String,
	pub id: u64,
	/// Extra routing data clients need to locate the entity, such as its
	/// owning project.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload: Option<serde_json::Value>,
}

impl IndexEntry {
	pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
		self.payload = Some(payload);
		self
	}
}

impl From<EntityKey> for IndexEntry {
	fn from(key: EntityKey) -> Self {
		Self {
			kind: key.kind.to_string(),
			id: key.id,
			payload: None,
		}
	}
}

/// Custom messages addressed to channels outside of entity updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@class")]
pub enum RawMessage {
	/// First message on every connection; the client echoes the token when
	/// signing in.
	#[serde(rename = "WsSessionIdentifier", rename_all = "camelCase")]
	SessionIdentifier { session_id: String },

	#[serde(rename = "WsPing")]
	Ping { timestamp: i64 },

	#[serde(rename = "WsPong")]
	Pong { timestamp: i64 },

	/// The session was signed out server-side.
	#[serde(rename = "WsSignOutMessage")]
	SignOut,
}

impl RawMessage {
	pub fn ping() -> Self {
		Self::Ping {
			timestamp: Utc::now().timestamp_millis(),
		}
	}

	pub fn event_type(&self) -> &'static str {
		match self {
			Self::SessionIdentifier { .. } => "session_identifier",
			Self::Ping { .. } => "ping",
			Self::Pong { .. } => "pong",
			Self::SignOut => "sign_out",
		}
	}
}

/// Combined per-channel update; fragments are embedded verbatim.
#[derive(Serialize)]
#[serde(tag = "@class", rename = "WsUpdateMessage")]
pub(crate) struct UpdateMessage<'a> {
	pub updated: Vec<&'a RawValue>,
	pub deleted: Vec<&'a RawValue>,
}
