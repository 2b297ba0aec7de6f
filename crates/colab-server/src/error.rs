// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_server_auth::AuthError;
use colab_server_config::ConfigError;
use colab_server_model::ModelError;
use colab_server_realtime::RegistryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
	#[error(transparent)]
	Model(#[from] ModelError),

	#[error(transparent)]
	Auth(#[from] AuthError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("failed to initialise tracing: {0}")]
	Telemetry(String),
}

impl AppError {
	/// The authorization failure behind this error, if any.
	pub fn auth(&self) -> Option<&AuthError> {
		match self {
			AppError::Auth(e) | AppError::Model(ModelError::Auth(e)) => Some(e),
			_ => None,
		}
	}
}
