// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! co.LAB server binary: loads configuration, installs tracing and runs the
//! connection heartbeat until interrupted.

use std::sync::Arc;

use colab_server::{telemetry, AppState, InMemoryCredentials};
use colab_server_model::InMemoryDirectory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = match std::env::args().nth(1) {
		Some(path) => colab_server_config::load_config_with_file(path)?,
		None => colab_server_config::load_config()?,
	};
	telemetry::init(&config.logging)?;

	let state = AppState::new(
		config,
		Arc::new(InMemoryDirectory::new()),
		Arc::new(InMemoryCredentials::new()),
	);
	let heartbeat = state.start_heartbeat();
	tracing::info!("colab-server ready");

	tokio::signal::ctrl_c().await?;
	tracing::info!(
		connections = state.registry.connection_count(),
		"shutting down"
	);
	if let Some(heartbeat) = heartbeat {
		heartbeat.abort();
	}
	Ok(())
}
