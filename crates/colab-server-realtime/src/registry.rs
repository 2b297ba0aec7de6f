// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Live connections and their channel subscriptions.
//!
//! ```text
//! ConnectionRegistry
//!   connections: SessionToken -> { queue, user, channels }
//!   subscribers: EffectiveChannel -> {SessionToken}
//!
//! PreparedMessages ── dispatch ──> try_send on every subscriber's queue
//! ```
//!
//! Each connection owns a bounded queue drained by its websocket writer.
//! Dispatch never waits: a full or closed queue loses the message for that
//! connection only.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use colab_realtime_core::{EffectiveChannel, PreparedMessages, RawMessage};
use colab_server_auth::UserId;
use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::session::SessionToken;

const DEFAULT_QUEUE_CAPACITY: usize = 256;
const DEFAULT_PING_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RegistryConfig {
	/// Outbound queue length per connection.
	pub queue_capacity: usize,
	pub ping_interval: Duration,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
			ping_interval: Duration::from_secs(DEFAULT_PING_INTERVAL_SECS),
		}
	}
}

/// Outcome of pushing messages to connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
	pub delivered: usize,
	pub dropped: usize,
}

impl DispatchReport {
	fn record(&mut self, outcome: SendOutcome) {
		match outcome {
			SendOutcome::Delivered => self.delivered += 1,
			SendOutcome::Full | SendOutcome::Closed => self.dropped += 1,
		}
	}
}

/// Snapshot of one connection, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
	pub session: SessionToken,
	pub user: Option<UserId>,
	pub connected_at: DateTime<Utc>,
	pub channels: BTreeSet<EffectiveChannel>,
}

struct Connection {
	sender: mpsc::Sender<Arc<str>>,
	user: Option<UserId>,
	connected_at: DateTime<Utc>,
	channels: BTreeSet<EffectiveChannel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendOutcome {
	Delivered,
	Full,
	Closed,
}

impl Connection {
	fn send(&self, message: &Arc<str>) -> SendOutcome {
		match self.sender.try_send(Arc::clone(message)) {
			Ok(()) => SendOutcome::Delivered,
			Err(TrySendError::Full(_)) => SendOutcome::Full,
			Err(TrySendError::Closed(_)) => SendOutcome::Closed,
		}
	}
}

#[derive(Default)]
struct State {
	connections: HashMap<SessionToken, Connection>,
	subscribers: HashMap<EffectiveChannel, BTreeSet<SessionToken>>,
}

impl State {
	fn connection_mut(&mut self, session: SessionToken) -> Result<&mut Connection> {
		self
			.connections
			.get_mut(&session)
			.ok_or(RegistryError::UnknownSession(session))
	}

	fn subscribe(&mut self, session: SessionToken, channel: EffectiveChannel) -> Result<bool> {
		let added = self.connection_mut(session)?.channels.insert(channel);
		if added {
			self.subscribers.entry(channel).or_default().insert(session);
		}
		Ok(added)
	}

	fn unsubscribe(&mut self, session: SessionToken, channel: EffectiveChannel) -> Result<bool> {
		let removed = self.connection_mut(session)?.channels.remove(&channel);
		if removed {
			self.detach(session, channel);
		}
		Ok(removed)
	}

	fn detach(&mut self, session: SessionToken, channel: EffectiveChannel) {
		if let Some(sessions) = self.subscribers.get_mut(&channel) {
			sessions.remove(&session);
			if sessions.is_empty() {
				self.subscribers.remove(&channel);
			}
		}
	}

	fn remove(&mut self, session: SessionToken) -> Option<Connection> {
		let connection = self.connections.remove(&session)?;
		for channel in &connection.channels {
			self.detach(session, *channel);
		}
		Some(connection)
	}
}

/// Tracks session token <-> connection <-> user and channel subscriptions.
pub struct ConnectionRegistry {
	config: RegistryConfig,
	state: RwLock<State>,
}

impl Default for ConnectionRegistry {
	fn default() -> Self {
		Self::new(RegistryConfig::default())
	}
}

impl ConnectionRegistry {
	pub fn new(config: RegistryConfig) -> Self {
		Self {
			config,
			state: RwLock::new(State::default()),
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Registers a new anonymous connection subscribed to the broadcast
	/// channel. The receiver's first message is the session identifier.
	pub fn open(&self) -> (SessionToken, mpsc::Receiver<Arc<str>>) {
		let (sender, receiver) = mpsc::channel(self.config.queue_capacity.max(1));
		let session = SessionToken::generate();
		let connection = Connection {
			sender,
			user: None,
			connected_at: Utc::now(),
			channels: BTreeSet::new(),
		};

		let mut state = self.state.write();
		state.connections.insert(session, connection);
		if let Err(e) = state.subscribe(session, EffectiveChannel::Broadcast) {
			warn!(%session, error = %e, "failed to subscribe new connection to broadcast");
		}
		let count = state.connections.len();
		drop(state);

		let greeting = RawMessage::SessionIdentifier {
			session_id: session.to_string(),
		};
		if let Err(e) = self.send_to(session, &greeting) {
			warn!(%session, error = %e, "failed to send session identifier");
		}

		info!(%session, connections = count, "connection opened");
		(session, receiver)
	}

	/// Removes the connection and every subscription it holds.
	pub fn close(&self, session: SessionToken) -> bool {
		let removed = self.state.write().remove(session);
		match removed {
			Some(connection) => {
				info!(
					%session,
					user = ?connection.user,
					channels = connection.channels.len(),
					"connection closed"
				);
				true
			}
			None => false,
		}
	}

	/// Binds the connection to `user` and subscribes it to the user's channel.
	pub fn authenticate(&self, session: SessionToken, user: UserId) -> Result<()> {
		let mut state = self.state.write();
		let previous = state.connection_mut(session)?.user.replace(user);
		if let Some(previous) = previous.filter(|p| *p != user) {
			state.unsubscribe(session, EffectiveChannel::User(previous))?;
		}
		state.subscribe(session, EffectiveChannel::User(user))?;
		info!(%session, %user, "connection authenticated");
		Ok(())
	}

	/// Unbinds the user and notifies the client. The connection stays open
	/// as anonymous.
	pub fn sign_out(&self, session: SessionToken) -> Result<Option<UserId>> {
		let user = self.unbind(session)?;
		self.send_to(session, &RawMessage::SignOut)?;
		Ok(user)
	}

	/// Unbinds the user without notifying the client.
	pub fn unbind(&self, session: SessionToken) -> Result<Option<UserId>> {
		let mut state = self.state.write();
		let user = state.connection_mut(session)?.user.take();
		if let Some(user) = user {
			state.unsubscribe(session, EffectiveChannel::User(user))?;
			info!(%session, %user, "connection signed out");
		}
		Ok(user)
	}

	/// Returns `false` if the connection was already subscribed.
	pub fn subscribe(&self, session: SessionToken, channel: EffectiveChannel) -> Result<bool> {
		let added = self.state.write().subscribe(session, channel)?;
		debug!(%session, %channel, added, "subscribe");
		Ok(added)
	}

	pub fn unsubscribe(&self, session: SessionToken, channel: EffectiveChannel) -> Result<bool> {
		let removed = self.state.write().unsubscribe(session, channel)?;
		debug!(%session, %channel, removed, "unsubscribe");
		Ok(removed)
	}

	/// Pushes every prepared message to the connections subscribed to its
	/// channel. Connections whose receiver is gone are closed afterwards.
	pub fn dispatch(&self, prepared: &PreparedMessages) -> DispatchReport {
		let mut report = DispatchReport::default();
		let mut closed = BTreeSet::new();

		{
			let state = self.state.read();
			for (channel, messages) in prepared.iter() {
				let Some(sessions) = state.subscribers.get(channel) else {
					debug!(%channel, "no subscribers");
					continue;
				};
				for session in sessions {
					let Some(connection) = state.connections.get(session) else {
						continue;
					};
					for message in messages {
						let outcome = connection.send(message);
						if outcome != SendOutcome::Delivered {
							warn!(
								%session,
								%channel,
								closed = outcome == SendOutcome::Closed,
								"dropping message for slow or closed connection"
							);
						}
						if outcome == SendOutcome::Closed {
							closed.insert(*session);
						}
						report.record(outcome);
					}
				}
			}
		}

		for session in closed {
			self.close(session);
		}

		debug!(
			delivered = report.delivered,
			dropped = report.dropped,
			"dispatched prepared messages"
		);
		report
	}

	/// Sends one message to a single connection.
	pub fn send_to(&self, session: SessionToken, message: &RawMessage) -> Result<bool> {
		let json: Arc<str> = Arc::from(serde_json::to_string(message)?);
		let state = self.state.read();
		let connection = state
			.connections
			.get(&session)
			.ok_or(RegistryError::UnknownSession(session))?;
		let outcome = connection.send(&json);
		if outcome != SendOutcome::Delivered {
			warn!(%session, message = message.event_type(), "dropping direct message");
		}
		Ok(outcome == SendOutcome::Delivered)
	}

	/// Sends a ping to every connection.
	pub fn broadcast_ping(&self) -> DispatchReport {
		let mut report = DispatchReport::default();
		let json = match serde_json::to_string(&RawMessage::ping()) {
			Ok(json) => Arc::<str>::from(json),
			Err(e) => {
				warn!(error = %e, "failed to serialize ping");
				return report;
			}
		};
		let state = self.state.read();
		for connection in state.connections.values() {
			report.record(connection.send(&json));
		}
		debug!(
			connections = state.connections.len(),
			dropped = report.dropped,
			"broadcast ping"
		);
		report
	}

	pub fn user_of(&self, session: SessionToken) -> Option<UserId> {
		self
			.state
			.read()
			.connections
			.get(&session)
			.and_then(|c| c.user)
	}

	pub fn sessions_of(&self, user: UserId) -> Vec<SessionToken> {
		let state = self.state.read();
		let mut sessions: Vec<_> = state
			.connections
			.iter()
			.filter(|(_, c)| c.user == Some(user))
			.map(|(session, _)| *session)
			.collect();
		sessions.sort();
		sessions
	}

	pub fn connection(&self, session: SessionToken) -> Option<ConnectionInfo> {
		let state = self.state.read();
		state.connections.get(&session).map(|c| ConnectionInfo {
			session,
			user: c.user,
			connected_at: c.connected_at,
			channels: c.channels.clone(),
		})
	}

	pub fn connection_count(&self) -> usize {
		self.state.read().connections.len()
	}

	pub fn subscriber_count(&self, channel: &EffectiveChannel) -> usize {
		self
			.state
			.read()
			.subscribers
			.get(channel)
			.map_or(0, BTreeSet::len)
	}

	/// Pings every connection each `interval` until the registry is dropped.
	pub fn spawn_heartbeat(registry: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
		let registry: Weak<Self> = Arc::downgrade(registry);
		tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			// The first tick completes immediately.
			ticker.tick().await;
			loop {
				ticker.tick().await;
				let Some(registry) = registry.upgrade() else {
					debug!("registry dropped, stopping heartbeat");
					break;
				};
				registry.broadcast_ping();
			}
		})
	}
}
