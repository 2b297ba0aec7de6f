// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Composable authorization conditions.
//!
//! - [`Condition`]: an immutable boolean expression over the current actor
//! - [`EvaluationContext`]: the request-scoped actor and result cache
//!
//! Conditions are built fresh by each entity from its current state and
//! evaluated with [`Condition::eval`] against a
//! [`SecurityService`](crate::SecurityService).

mod context;
mod engine;
mod types;

pub use context::EvaluationContext;
pub use types::Condition;

#[cfg(test)]
pub(crate) use engine::tests::CountingSecurity;
