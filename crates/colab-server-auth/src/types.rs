// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by the permission engine and the rest of co.LAB.
//!
//! - **ID newtypes**: Type-safe wrappers around numeric identifiers for every
//!   entity kind ([`UserId`], [`ProjectId`], [`CardId`], etc.) preventing
//!   accidental mixing
//! - **Hierarchical positions**: A team member's standing in a project
//!   ([`HierarchicalPosition`])
//! - **Involvement levels**: Per-card RACI-style access ([`InvolvementLevel`])
//! - **Operations**: The four guarded operations ([`Operation`])
//!
//! All ID types serialize transparently as numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(
			Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
		)]
		#[serde(transparent)]
		pub struct $name(u64);

		impl $name {
			/// Create a new ID from its numeric value.
			pub const fn new(id: u64) -> Self {
				Self(id)
			}

			/// Get the inner numeric value.
			pub const fn get(self) -> u64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<u64> for $name {
			fn from(id: u64) -> Self {
				Self(id)
			}
		}

		impl From<$name> for u64 {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(ProjectId, "Unique identifier for a project.");
define_id_type!(TeamMemberId, "Unique identifier for a team member.");
define_id_type!(TeamRoleId, "Unique identifier for a team role.");
define_id_type!(CardId, "Unique identifier for a card.");
define_id_type!(CardContentId, "Unique identifier for a card content (variant).");
define_id_type!(CardTypeId, "Unique identifier for a card type or card type reference.");
define_id_type!(BlockId, "Unique identifier for a document block.");
define_id_type!(StickyNoteLinkId, "Unique identifier for a sticky note link.");
define_id_type!(ActivityFlowLinkId, "Unique identifier for an activity flow link.");
define_id_type!(AccessControlId, "Unique identifier for an access control entry.");

// =============================================================================
// Hierarchical Positions
// =============================================================================

/// Standing of a team member within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HierarchicalPosition {
	/// Full project control, including deletion.
	Owner,
	/// Project staff, may edit the project and its team.
	Internal,
	/// Invited collaborator with read access by default.
	Guest,
}

impl HierarchicalPosition {
	/// Returns all positions, most privileged first.
	pub fn all() -> &'static [HierarchicalPosition] {
		&[
			HierarchicalPosition::Owner,
			HierarchicalPosition::Internal,
			HierarchicalPosition::Guest,
		]
	}

	/// Returns true if this position has at least the privileges of the given one.
	pub fn has_position_of(&self, other: &HierarchicalPosition) -> bool {
		matches!(
			(self, other),
			(HierarchicalPosition::Owner, _)
				| (
					HierarchicalPosition::Internal,
					HierarchicalPosition::Internal | HierarchicalPosition::Guest
				) | (HierarchicalPosition::Guest, HierarchicalPosition::Guest)
		)
	}

	/// Returns true for owners and internal members.
	pub fn is_internal(&self) -> bool {
		self.has_position_of(&HierarchicalPosition::Internal)
	}

	/// Involvement applied to cards carrying no explicit access control.
	pub fn default_involvement(&self) -> InvolvementLevel {
		match self {
			HierarchicalPosition::Owner => InvolvementLevel::Responsible,
			HierarchicalPosition::Internal => InvolvementLevel::InformedReadWrite,
			HierarchicalPosition::Guest => InvolvementLevel::InformedReadOnly,
		}
	}
}

impl fmt::Display for HierarchicalPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HierarchicalPosition::Owner => write!(f, "owner"),
			HierarchicalPosition::Internal => write!(f, "internal"),
			HierarchicalPosition::Guest => write!(f, "guest"),
		}
	}
}

// =============================================================================
// Involvement Levels
// =============================================================================

/// Involvement of a member (or role) in a card.
///
/// Each level maps to a coarse read/write capability; the condition tree asks
/// for these capabilities through `HasCardReadRight` / `HasCardWriteRight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvolvementLevel {
	Responsible,
	Accountable,
	ConsultedReadWrite,
	ConsultedReadOnly,
	InformedReadWrite,
	InformedReadOnly,
	OutOfTheLoop,
}

impl InvolvementLevel {
	pub fn can_read(&self) -> bool {
		!matches!(self, InvolvementLevel::OutOfTheLoop)
	}

	pub fn can_write(&self) -> bool {
		matches!(
			self,
			InvolvementLevel::Responsible
				| InvolvementLevel::Accountable
				| InvolvementLevel::ConsultedReadWrite
				| InvolvementLevel::InformedReadWrite
		)
	}

	/// Ranks levels by capability: write > read > none.
	pub fn capability_rank(&self) -> u8 {
		if self.can_write() {
			2
		} else if self.can_read() {
			1
		} else {
			0
		}
	}
}

// =============================================================================
// Operations
// =============================================================================

/// The four operations guarded by a permission provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
	Create,
	Read,
	Update,
	Delete,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Operation::Create => write!(f, "create"),
			Operation::Read => write!(f, "read"),
			Operation::Update => write!(f, "update"),
			Operation::Delete => write!(f, "delete"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod ids {
		use super::*;

		#[test]
		fn ids_serialize_as_plain_numbers() {
			let json = serde_json::to_string(&UserId::new(42)).unwrap();
			assert_eq!(json, "42");
			let parsed: ProjectId = serde_json::from_str("7").unwrap();
			assert_eq!(parsed, ProjectId::new(7));
		}

		#[test]
		fn display_shows_value() {
			assert_eq!(CardId::new(12).to_string(), "12");
		}
	}

	mod positions {
		use super::*;

		#[test]
		fn owner_has_every_position() {
			for position in HierarchicalPosition::all() {
				assert!(HierarchicalPosition::Owner.has_position_of(position));
			}
		}

		#[test]
		fn guest_is_not_internal() {
			assert!(!HierarchicalPosition::Guest.is_internal());
			assert!(HierarchicalPosition::Internal.is_internal());
			assert!(HierarchicalPosition::Owner.is_internal());
		}

		#[test]
		fn default_involvement_follows_position() {
			assert!(HierarchicalPosition::Owner.default_involvement().can_write());
			assert!(HierarchicalPosition::Internal.default_involvement().can_write());
			let guest = HierarchicalPosition::Guest.default_involvement();
			assert!(guest.can_read());
			assert!(!guest.can_write());
		}
	}

	mod involvement {
		use super::*;

		#[test]
		fn out_of_the_loop_has_no_capability() {
			let level = InvolvementLevel::OutOfTheLoop;
			assert!(!level.can_read());
			assert!(!level.can_write());
			assert_eq!(level.capability_rank(), 0);
		}

		#[test]
		fn read_only_levels_rank_below_read_write() {
			assert!(
				InvolvementLevel::ConsultedReadOnly.capability_rank()
					< InvolvementLevel::ConsultedReadWrite.capability_rank()
			);
		}
	}
}
