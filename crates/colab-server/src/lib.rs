// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! co.LAB server core.
//!
//! Wires the domain model, the connection registry and configuration
//! together:
//! - [`AppState`] owns the directory, registry and sign-in throttling
//! - [`RequestScope`] runs business operations for one actor and, on
//!   commit, propagates the collected changes to subscribed connections
//! - Sessions sign in and out and subscribe to channels they may read

pub mod error;
pub mod scope;
pub mod session;
pub mod state;
pub mod telemetry;

pub use error::{AppError, Result};
pub use scope::{CommitReport, RequestScope};
pub use state::{AppState, CredentialVerifier, InMemoryCredentials};
