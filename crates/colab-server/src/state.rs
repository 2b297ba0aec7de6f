// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared server state.

use std::collections::HashMap;
use std::sync::Arc;

use colab_server_auth::{AuthenticationFailureTracker, UserId};
use colab_server_config::ServerConfig;
use colab_server_model::{Directory, User};
use colab_server_realtime::{ConnectionRegistry, RegistryConfig};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::scope::RequestScope;

/// Checks a user's sign-in secret.
pub trait CredentialVerifier: Send + Sync {
	fn verify(&self, user: &User, secret: &str) -> bool;
}

/// Secrets held in memory, for development and tests.
#[derive(Default)]
pub struct InMemoryCredentials {
	secrets: RwLock<HashMap<UserId, String>>,
}

impl InMemoryCredentials {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&self, user: UserId, secret: impl Into<String>) {
		self.secrets.write().insert(user, secret.into());
	}
}

impl CredentialVerifier for InMemoryCredentials {
	fn verify(&self, user: &User, secret: &str) -> bool {
		self
			.secrets
			.read()
			.get(&user.id)
			.is_some_and(|expected| expected == secret)
	}
}

pub struct AppState {
	pub config: ServerConfig,
	pub directory: Arc<dyn Directory>,
	pub registry: Arc<ConnectionRegistry>,
	pub failures: AuthenticationFailureTracker,
	pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
	pub fn new(
		config: ServerConfig,
		directory: Arc<dyn Directory>,
		verifier: Arc<dyn CredentialVerifier>,
	) -> Self {
		let registry = ConnectionRegistry::new(RegistryConfig {
			queue_capacity: config.realtime.queue_capacity,
			ping_interval: config.realtime.ping_interval().unwrap_or_default(),
		});
		let window = i64::try_from(config.auth.failure_window_secs)
			.ok()
			.and_then(chrono::Duration::try_seconds)
			.unwrap_or(chrono::Duration::MAX);
		let failures = AuthenticationFailureTracker::new(config.auth.max_failed_attempts, window);

		info!(
			queue_capacity = config.realtime.queue_capacity,
			max_failed_attempts = config.auth.max_failed_attempts,
			"server state created"
		);

		Self {
			config,
			directory,
			registry: Arc::new(registry),
			failures,
			verifier,
		}
	}

	/// Starts a request on behalf of `actor`.
	pub fn begin(&self, actor: Option<UserId>) -> RequestScope<'_> {
		RequestScope::new(self, actor)
	}

	/// Starts the ping task. A zero interval disables the heartbeat.
	pub fn start_heartbeat(&self) -> Option<JoinHandle<()>> {
		let interval = self.registry.config().ping_interval;
		if interval.is_zero() {
			return None;
		}
		info!(interval_secs = interval.as_secs(), "starting heartbeat");
		Some(ConnectionRegistry::spawn_heartbeat(&self.registry, interval))
	}
}

#[cfg(test)]
mod tests {
	use colab_server_model::InMemoryDirectory;

	use super::*;

	#[test]
	fn test_credentials_must_match() {
		let directory = InMemoryDirectory::new();
		let alice = directory.register_user("alice", false);
		let credentials = InMemoryCredentials::new();
		credentials.set(alice.id, "s3cret");

		assert!(credentials.verify(&alice, "s3cret"));
		assert!(!credentials.verify(&alice, "S3cret"));
		let bob = directory.register_user("bob", false);
		assert!(!credentials.verify(&bob, ""));
	}

	#[test]
	fn test_registry_follows_config() {
		let mut config = ServerConfig::default();
		config.realtime.queue_capacity = 4;
		config.realtime.ping_interval_secs = 0;
		let state = AppState::new(
			config,
			Arc::new(InMemoryDirectory::new()),
			Arc::new(InMemoryCredentials::new()),
		);
		assert_eq!(state.registry.config().queue_capacity, 4);
		assert!(state.start_heartbeat().is_none());
	}

	#[test]
	fn test_unbounded_failure_window_saturates() {
		let mut config = ServerConfig::default();
		config.auth.failure_window_secs = u64::MAX;
		let state = AppState::new(
			config,
			Arc::new(InMemoryDirectory::new()),
			Arc::new(InMemoryCredentials::new()),
		);
		assert_eq!(state.failures.record_failure("alice"), 1);
		assert_eq!(state.failures.failures("alice"), 1);
	}
}
