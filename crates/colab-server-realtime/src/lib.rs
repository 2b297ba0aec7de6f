// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Websocket connection registry for co.LAB.
//!
//! Connections receive a [`SessionToken`] on open, are bound to a user on
//! sign-in and subscribe to effective channels. [`ConnectionRegistry::dispatch`]
//! fans prepared messages out to the subscribers of each channel.

pub mod error;
pub mod registry;
pub mod session;

pub use error::{RegistryError, Result};
pub use registry::{ConnectionInfo, ConnectionRegistry, DispatchReport, RegistryConfig};
pub use session::SessionToken;
