//! Domain layer: pure game logic, no locks, no I/O.

pub mod cards;
pub mod deck;
pub mod events;
pub mod game;
pub mod player;
pub mod rules;
pub mod snapshot;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests_bluff;
#[cfg(test)]
mod tests_props_conservation;

/// External user identity (e.g. a chat user id). The engine never inspects
/// it beyond equality.
pub type UserId = i64;
/// Chat-room identity; one active game per room.
pub type RoomId = i64;

// Re-exports for ergonomics
pub use cards::{Card, Color, Face};
pub use deck::Deck;
pub use events::{GameEvent, GameOutcome, PlayerTally};
pub use game::{Game, Phase};
pub use player::Player;
pub use rules::GameMode;
pub use snapshot::{GameSnapshot, PlayerView};
