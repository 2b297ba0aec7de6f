// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! co.LAB domain model.
//!
//! This crate provides:
//! - The entities ([`Project`], [`TeamMember`], [`Card`], [`CardType`], ...)
//!   with their permission conditions and channel builders
//! - The [`Directory`] seam and an [`InMemoryDirectory`]
//! - [`DirectorySecurity`], answering leaf conditions from the directory
//! - [`Request`], running business operations that authorize, mutate and
//!   collect changes for propagation

pub mod directory;
pub mod entities;
pub mod error;
pub mod memory;
mod operations;
pub mod request;
pub mod security;
pub mod subscription;

pub use directory::Directory;
pub use entities::{
	AccessControl, AccessSubject, ActivityFlowLink, Block, Card, CardContent, CardType,
	ColabEntity, Project, StickyNoteLink, StickyNoteSource, TeamMember, TeamRole, User,
};
pub use error::{ModelError, Result};
pub use memory::InMemoryDirectory;
pub use request::Request;
pub use security::DirectorySecurity;
pub use subscription::Subscription;
