//! Public rendering view of one game.
//!
//! A snapshot is taken under the game lock and handed to callers after the
//! lock is released, so rendering never blocks the game.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::cards::{Card, Color};
use crate::domain::game::Phase;
use crate::domain::rules::GameMode;
use crate::domain::{RoomId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub user: UserId,
    pub hand_size: usize,
    pub cards_played: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub room: RoomId,
    pub mode: GameMode,
    pub phase: Phase,
    pub open: bool,
    pub translate: bool,
    /// Seats in turn order.
    pub players: Vec<PlayerView>,
    pub current_player: Option<UserId>,
    /// +1 clockwise, -1 counter-clockwise.
    pub direction: i8,
    pub last_card: Option<Card>,
    pub current_color: Option<Color>,
    pub pending_draws: u32,
    pub draw_pile_len: usize,
    pub discard_pile_len: usize,
}
