// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Who may listen on which channel.

use std::fmt;

use colab_realtime_core::EffectiveChannel;
use colab_server_auth::{Condition, WithPermission};

use crate::directory::Directory;
use crate::entities::card_of_content;

/// A request to receive messages on one channel; "reading" it means
/// subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(pub EffectiveChannel);

impl fmt::Display for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "channel {}", self.0)
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for Subscription {
	fn read_condition(&self, directory: &D) -> Condition {
		match self.0 {
			EffectiveChannel::User(user) => Condition::IsCurrentUser(user),
			EffectiveChannel::ProjectContent(project) => Condition::IsProjectMember(project),
			EffectiveChannel::Block(block) => {
				let content = directory.block(block).and_then(|b| b.card_content);
				card_of_content(directory, content)
					.map_or(Condition::AlwaysFalse, Condition::HasCardReadRight)
			}
			EffectiveChannel::Broadcast => Condition::AlwaysTrue,
		}
	}

	/// Channels are never written to by clients.
	fn update_condition(&self, _: &D) -> Condition {
		Condition::AlwaysFalse
	}
}
