// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod auth;
mod logging;
mod realtime;

pub use auth::{AuthConfig, AuthConfigLayer, MAX_FAILURE_WINDOW_SECS};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use realtime::{RealtimeConfig, RealtimeConfigLayer};
