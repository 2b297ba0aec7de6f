// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colab_realtime_core::{ChannelBuilder, WithChannels};
use colab_server_auth::{
	AccessControlId, CardId, Condition, InvolvementLevel, TeamMemberId, TeamRoleId, WithPermission,
};
use serde::Serialize;
use serde_json::json;

use super::{owning_card_channels, owning_card_read, owning_card_write};
use crate::directory::Directory;

/// Who an access control entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSubject {
	Member(TeamMemberId),
	Role(TeamRoleId),
}

/// Involvement of a member or a role in a card, overriding the member's
/// position default for that card and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControl {
	pub id: AccessControlId,
	pub card: Option<CardId>,
	pub member: Option<TeamMemberId>,
	pub role: Option<TeamRoleId>,
	pub level: InvolvementLevel,
}

entity_identity!(AccessControl, "AccessControl", |access| access
	.card
	.map(|card| json!({ "cardId": card })));

impl AccessControl {
	/// The subject, or `None` unless exactly one of member and role is set.
	pub fn subject(&self) -> Option<AccessSubject> {
		match (self.member, self.role) {
			(Some(member), None) => Some(AccessSubject::Member(member)),
			(None, Some(role)) => Some(AccessSubject::Role(role)),
			_ => None,
		}
	}

	pub fn applies_to(&self, subject: AccessSubject) -> bool {
		self.subject() == Some(subject)
	}
}

impl<D: Directory + ?Sized> WithPermission<D> for AccessControl {
	fn read_condition(&self, directory: &D) -> Condition {
		owning_card_read(directory, self.card)
	}

	fn update_condition(&self, directory: &D) -> Condition {
		owning_card_write(directory, self.card)
	}
}

impl<D: Directory + ?Sized> WithChannels<D> for AccessControl {
	fn channels(&self, directory: &D) -> ChannelBuilder {
		owning_card_channels(directory, self.card)
	}
}
