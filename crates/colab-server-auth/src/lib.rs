// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization for co.LAB.
//!
//! This crate provides:
//! - [`Condition`] trees built by every protected entity and evaluated per
//!   request with memoization in an [`EvaluationContext`]
//! - The [`SecurityService`] seam answering relationship questions for leaves
//! - [`WithPermission`] and [`authorize`], the contract the request layer
//!   uses before any create, read, update or delete
//! - A [`TtlCache`] behind the [`KeyValueCache`] trait, used by the
//!   [`AuthenticationFailureTracker`]
//!
//! # Example
//!
//! ```
//! use colab_server_auth::{Condition, EvaluationContext, ProjectId, UserId};
//!
//! let ctx = EvaluationContext::for_user(UserId::new(42));
//! let rule = Condition::or([
//!     Condition::IsProjectMember(ProjectId::new(7)),
//!     Condition::IsAdmin,
//! ]);
//! assert!(ctx.is_authenticated());
//! assert_eq!(rule.to_string(), "Or(IsProjectMember(project#7), IsAdmin)");
//! ```

pub mod cache;
pub mod condition;
pub mod error;
pub mod failures;
pub mod permission;
pub mod security;
pub mod types;

pub use cache::{KeyValueCache, TtlCache};
pub use condition::{Condition, EvaluationContext};
pub use error::{AuthError, Result};
pub use failures::AuthenticationFailureTracker;
pub use permission::{authorize, is_allowed, WithPermission};
pub use security::SecurityService;
pub use types::{
	AccessControlId, ActivityFlowLinkId, BlockId, CardContentId, CardId, CardTypeId,
	HierarchicalPosition, InvolvementLevel, Operation, ProjectId, StickyNoteLinkId, TeamMemberId,
	TeamRoleId, UserId,
};
