// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Change propagation for co.LAB.
//!
//! Entities changed during a request are collected in a [`UnitOfWork`]. On
//! commit, [`prepare_messages`] resolves each change's [`ChannelBuilder`] into
//! [`EffectiveChannel`]s and produces one serialized update message per
//! channel, ready for the connection registry to dispatch.
//!
//! ```
//! use colab_realtime_core::{ChannelBuilder, ChannelLookup, EffectiveChannel, MetaChannel};
//! use colab_server_auth::{ProjectId, UserId};
//!
//! struct Admins;
//!
//! impl ChannelLookup for Admins {
//! 	fn admin_users(&self) -> Vec<UserId> {
//! 		vec![UserId::new(1)]
//! 	}
//!
//! 	fn project_team_users(&self, _: ProjectId) -> Vec<UserId> {
//! 		vec![UserId::new(2)]
//! 	}
//! }
//!
//! let builder = ChannelBuilder::meta(MetaChannel::ProjectOverview(ProjectId::new(3)))
//! 	.union(ChannelBuilder::effective(EffectiveChannel::Broadcast));
//! let channels = builder.compute_effective_channels(&Admins);
//! assert_eq!(channels.len(), 3);
//! ```

pub mod channel;
pub mod error;
pub mod message;
pub mod propagation;
pub mod unit_of_work;

pub use channel::{
	Channel, ChannelBuilder, ChannelLookup, ChannelResolver, EffectiveChannel, MetaChannel,
};
pub use error::PropagationError;
pub use message::{EntityKey, IndexEntry, RawMessage};
pub use propagation::{prepare_messages, PreparedMessages};
pub use unit_of_work::{Deletion, Propagated, QueuedMessage, UnitOfWork, WithChannels};
