// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Channel model.
//!
//! A client connection subscribes to [`EffectiveChannel`]s. Entities describe
//! their audience with a [`ChannelBuilder`], which may also hold
//! [`MetaChannel`]s: audiences that only become concrete once resolved against
//! current data through a [`ChannelLookup`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use colab_server_auth::{BlockId, ProjectId, UserId};

/// Channel a connection can subscribe to and messages are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectiveChannel {
	/// Every connection of one user.
	User(UserId),
	/// Connections editing a project's content.
	ProjectContent(ProjectId),
	/// Connections editing one block.
	Block(BlockId),
	/// Every open connection.
	Broadcast,
}

impl fmt::Display for EffectiveChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::User(id) => write!(f, "user:{id}"),
			Self::ProjectContent(id) => write!(f, "project-content:{id}"),
			Self::Block(id) => write!(f, "block:{id}"),
			Self::Broadcast => write!(f, "broadcast"),
		}
	}
}

/// Audience computed from current data; never subscribed to directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaChannel {
	/// All admin users.
	Admin,
	/// Users linked to a project's team, plus all admins.
	ProjectOverview(ProjectId),
}

impl MetaChannel {
	/// Resolves to one [`EffectiveChannel::User`] per user in the audience.
	pub fn resolve<L: ChannelLookup + ?Sized>(&self, lookup: &L) -> BTreeSet<EffectiveChannel> {
		let mut users: BTreeSet<UserId> = lookup.admin_users().into_iter().collect();
		if let Self::ProjectOverview(project) = self {
			users.extend(lookup.project_team_users(*project));
		}
		users.into_iter().map(EffectiveChannel::User).collect()
	}
}

impl fmt::Display for MetaChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Admin => write!(f, "admin"),
			Self::ProjectOverview(id) => write!(f, "project-overview:{id}"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
	Effective(EffectiveChannel),
	Meta(MetaChannel),
}

impl From<EffectiveChannel> for Channel {
	fn from(channel: EffectiveChannel) -> Self {
		Self::Effective(channel)
	}
}

impl From<MetaChannel> for Channel {
	fn from(channel: MetaChannel) -> Self {
		Self::Meta(channel)
	}
}

impl fmt::Display for Channel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Effective(c) => c.fmt(f),
			Self::Meta(c) => c.fmt(f),
		}
	}
}

/// Data the resolver needs to turn meta channels into users.
pub trait ChannelLookup {
	/// Every user carrying the admin flag.
	fn admin_users(&self) -> Vec<UserId>;

	/// Users linked to a team member of `project`; pending invitations are
	/// excluded.
	fn project_team_users(&self, project: ProjectId) -> Vec<UserId>;
}

/// Set of channels an entity change must reach.
///
/// Builders compose by union, and an empty builder means the change has no
/// audience (the entity is orphaned or otherwise unreachable).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBuilder {
	channels: BTreeSet<Channel>,
}

impl ChannelBuilder {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn with(channel: impl Into<Channel>) -> Self {
		let mut builder = Self::empty();
		builder.push(channel);
		builder
	}

	pub fn effective(channel: EffectiveChannel) -> Self {
		Self::with(channel)
	}

	pub fn meta(channel: MetaChannel) -> Self {
		Self::with(channel)
	}

	pub fn push(&mut self, channel: impl Into<Channel>) -> &mut Self {
		self.channels.insert(channel.into());
		self
	}

	pub fn union(mut self, other: ChannelBuilder) -> Self {
		self.channels.extend(other.channels);
		self
	}

	pub fn extend(&mut self, other: ChannelBuilder) {
		self.channels.extend(other.channels);
	}

	pub fn channels(&self) -> impl Iterator<Item = &Channel> + '_ {
		self.channels.iter()
	}

	pub fn contains(&self, channel: impl Into<Channel>) -> bool {
		self.channels.contains(&channel.into())
	}

	pub fn len(&self) -> usize {
		self.channels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.channels.is_empty()
	}

	/// True when resolution needs no lookup.
	pub fn is_effective_only(&self) -> bool {
		self
			.channels
			.iter()
			.all(|c| matches!(c, Channel::Effective(_)))
	}

	/// Resolves every meta channel and returns the deduplicated union.
	pub fn compute_effective_channels<L: ChannelLookup + ?Sized>(
		&self,
		lookup: &L,
	) -> BTreeSet<EffectiveChannel> {
		ChannelResolver::new(lookup).resolve(self)
	}
}

impl<C: Into<Channel>> FromIterator<C> for ChannelBuilder {
	fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
		Self {
			channels: iter.into_iter().map(Into::into).collect(),
		}
	}
}

/// Resolves builders while memoizing meta-channel audiences, so one batch
/// queries "all admins" at most once.
pub struct ChannelResolver<'a, L: ?Sized> {
	lookup: &'a L,
	admins: Option<BTreeSet<UserId>>,
	overviews: HashMap<ProjectId, BTreeSet<UserId>>,
}

impl<'a, L: ChannelLookup + ?Sized> ChannelResolver<'a, L> {
	pub fn new(lookup: &'a L) -> Self {
		Self {
			lookup,
			admins: None,
			overviews: HashMap::new(),
		}
	}

	pub fn resolve(&mut self, builder: &ChannelBuilder) -> BTreeSet<EffectiveChannel> {
		let mut resolved = BTreeSet::new();
		for channel in builder.channels() {
			match channel {
				Channel::Effective(c) => {
					resolved.insert(*c);
				}
				Channel::Meta(meta) => {
					resolved.extend(self.audience(*meta).into_iter().map(EffectiveChannel::User));
				}
			}
		}
		resolved
	}

	fn audience(&mut self, meta: MetaChannel) -> BTreeSet<UserId> {
		let lookup = self.lookup;
		let admins = self
			.admins
			.get_or_insert_with(|| lookup.admin_users().into_iter().collect())
			.clone();
		match meta {
			MetaChannel::Admin => admins,
			MetaChannel::ProjectOverview(project) => {
				let team = self
					.overviews
					.entry(project)
					.or_insert_with(|| lookup.project_team_users(project).into_iter().collect());
				team.union(&admins).copied().collect()
			}
		}
	}
}
