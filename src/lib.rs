#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Room-scoped card game engine: lobby management, turn scheduling with
//! timeout auto-skip, and the full play/draw/bluff rule set, behind
//! transport-agnostic messenger and stats boundaries.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod scheduler;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use adapters::{Messenger, NoopMessenger, NoopStatsStore, Recipient, StatsStore, StatsUpdate};
pub use config::EngineConfig;
pub use domain::cards::{Card, Color, Face};
pub use domain::events::{GameEvent, GameOutcome, PlayerTally};
pub use domain::game::{Game, Phase};
pub use domain::rules::GameMode;
pub use domain::snapshot::{GameSnapshot, PlayerView};
pub use domain::{RoomId, UserId};
pub use errors::EngineError;
pub use scheduler::TurnScheduler;
pub use services::{ActionResolver, GameHandle, SessionManager};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
