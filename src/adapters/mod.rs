//! Boundary contracts to the outside world.
//!
//! The engine emits semantic [`GameEvent`]s and per-user stat deltas; how
//! those become chat messages, stickers, or database rows is the embedding
//! application's business. Localization also lives behind the messenger:
//! an event variant is the message key, its fields are the parameters, and
//! the messenger resolves them against the recipient's locale.
//!
//! Both traits are fire-and-forget from the engine's point of view: they
//! are invoked after the game lock is released, and their failures never
//! affect game state.

use async_trait::async_trait;

use crate::domain::events::GameEvent;
use crate::domain::{RoomId, UserId};

/// Where an event should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    Room(RoomId),
    User(UserId),
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn notify(&self, recipient: Recipient, event: &GameEvent);
}

/// Per-user counter deltas reported when a game completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsUpdate {
    pub user: UserId,
    pub won: bool,
    pub cards_played: u32,
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn record(&self, update: StatsUpdate);
}

/// Messenger that drops everything; useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct NoopMessenger;

#[async_trait]
impl Messenger for NoopMessenger {
    async fn notify(&self, _recipient: Recipient, _event: &GameEvent) {}
}

/// Stats sink that drops everything.
#[derive(Debug, Default)]
pub struct NoopStatsStore;

#[async_trait]
impl StatsStore for NoopStatsStore {
    async fn record(&self, _update: StatsUpdate) {}
}
