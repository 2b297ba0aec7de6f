// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the co.LAB server.
//!
//! Layered from built-in defaults, a TOML file and `COLAB_SERVER_*`
//! environment variables, in increasing precedence.
//!
//! ```ignore
//! use colab_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("queue capacity {}", config.realtime.queue_capacity);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::path::PathBuf;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
	pub realtime: RealtimeConfig,
	pub auth: AuthConfig,
	pub logging: LoggingConfig,
}

/// Loads configuration with `/etc/colab/server.toml` as the config file.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merges `sources` lowest precedence first and resolves the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		realtime: layer.realtime.unwrap_or_default().finalize(),
		auth: layer.auth.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		queue_capacity = config.realtime.queue_capacity,
		ping_interval_secs = config.realtime.ping_interval_secs,
		max_failed_attempts = config.auth.max_failed_attempts,
		log_format = %config.logging.format,
		"Server configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.realtime.queue_capacity == 0 {
		return Err(ConfigError::Validation(
			"realtime.queue_capacity must be greater than zero".to_string(),
		));
	}
	if config.auth.max_failed_attempts == 0 {
		return Err(ConfigError::Validation(
			"auth.max_failed_attempts must be greater than zero".to_string(),
		));
	}
	if config.auth.failure_window_secs > MAX_FAILURE_WINDOW_SECS {
		return Err(ConfigError::Validation(format!(
			"auth.failure_window_secs must be at most {MAX_FAILURE_WINDOW_SECS}"
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use proptest::prelude::*;

	use super::*;

	struct Fixed(Precedence, ServerConfigLayer);

	impl ConfigSource for Fixed {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn capacity_layer(capacity: usize) -> ServerConfigLayer {
		ServerConfigLayer {
			realtime: Some(RealtimeConfigLayer {
				queue_capacity: Some(capacity),
				ping_interval_secs: None,
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, ServerConfig::default());
	}

	#[test]
	fn test_toml_file_overrides_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[realtime]\nqueue_capacity = 8\n\n[auth]\nfailure_window_secs = 60\n"
		)
		.unwrap();

		let config = load_from_sources(vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(file.path())),
		])
		.unwrap();
		assert_eq!(config.realtime.queue_capacity, 8);
		assert_eq!(config.realtime.ping_interval_secs, 30);
		assert_eq!(config.auth.failure_window_secs, 60);
		assert_eq!(config.auth.max_failed_attempts, 5);
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(Fixed(Precedence::Environment, capacity_layer(3))),
			Box::new(Fixed(Precedence::ConfigFile, capacity_layer(9))),
		])
		.unwrap();
		assert_eq!(config.realtime.queue_capacity, 3);
	}

	#[test]
	fn test_zero_queue_capacity_rejected() {
		let err = load_from_sources(vec![Box::new(Fixed(
			Precedence::ConfigFile,
			capacity_layer(0),
		))])
		.unwrap_err();
		assert!(err.to_string().contains("queue_capacity"));
	}

	#[test]
	fn test_zero_failed_attempts_rejected() {
		let config = ServerConfig {
			auth: AuthConfig {
				max_failed_attempts: 0,
				..Default::default()
			},
			..Default::default()
		};
		assert!(matches!(
			validate_config(&config),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_failure_window_upper_bound() {
		let mut config = ServerConfig::default();
		config.auth.failure_window_secs = MAX_FAILURE_WINDOW_SECS;
		assert!(validate_config(&config).is_ok());

		config.auth.failure_window_secs = u64::MAX;
		let err = validate_config(&config).unwrap_err();
		assert!(err.to_string().contains("failure_window_secs"));
	}

	proptest! {
		#[test]
		fn prop_later_layer_wins(low in 1usize..10_000, high in 1usize..10_000) {
			let config = load_from_sources(vec![
				Box::new(Fixed(Precedence::Defaults, capacity_layer(low))),
				Box::new(Fixed(Precedence::ConfigFile, capacity_layer(high))),
			])
			.unwrap();
			prop_assert_eq!(config.realtime.queue_capacity, high);
		}
	}
}
