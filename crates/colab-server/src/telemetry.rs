// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing subscriber setup.

use colab_server_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, Result};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Fails if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&config.level))
		.map_err(|e| AppError::Telemetry(e.to_string()))?;

	let registry = tracing_subscriber::registry().with(filter);
	let installed = match config.format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.try_init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
	};
	installed.map_err(|e| AppError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_level_is_reported() {
		if std::env::var_os("RUST_LOG").is_some() {
			return;
		}
		let config = LoggingConfig {
			level: "colab=verbose".to_string(),
			format: LogFormat::Pretty,
		};
		assert!(matches!(init(&config), Err(AppError::Telemetry(_))));
	}
}
