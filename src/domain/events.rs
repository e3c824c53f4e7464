//! Semantic outcome events.
//!
//! The engine never formats or localizes text. Every state change is
//! reported as a `GameEvent`; the messenger boundary turns an event into
//! whatever the transport renders (text, sticker, button row). Event
//! variants double as message keys, their fields as message parameters.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::cards::{Card, Color};
use crate::domain::{RoomId, UserId};

/// How a game reached its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GameOutcome {
    /// A player shed their last card.
    Won { winner: UserId },
    /// Membership dropped below the minimum while active.
    NotEnoughPlayers,
    /// Explicitly ended by an owner.
    Ended,
}

/// Final per-player tally reported alongside `GameEnded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerTally {
    pub user: UserId,
    pub cards_played: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GameEvent {
    GameCreated {
        game: Uuid,
        room: RoomId,
    },
    /// A user who asked to be reminded should hear about the new game.
    NextGameReminder {
        user: UserId,
        room: RoomId,
    },
    PlayerJoined {
        user: UserId,
    },
    PlayerLeft {
        user: UserId,
        kicked: bool,
    },
    GameStarted {
        first_player: UserId,
        seed_card: Card,
        color: Color,
    },
    CardPlayed {
        player: UserId,
        card: Card,
        /// Current color after the play (the chosen one for wilds).
        color: Color,
        /// Cards left in the player's hand.
        remaining: usize,
    },
    PlayerDrew {
        player: UserId,
        count: u32,
    },
    /// The drawn card is playable; the player may play it or pass.
    DrawnCardPlayable {
        player: UserId,
    },
    TurnAdvanced {
        player: UserId,
        pending_draws: u32,
    },
    TurnSkipped {
        player: UserId,
        timeout: bool,
    },
    BluffResolved {
        challenger: UserId,
        offender: UserId,
        was_bluff: bool,
        cards_drawn: u32,
    },
    LobbyStateChanged {
        open: bool,
    },
    TranslationChanged {
        enabled: bool,
    },
    GameEnded {
        outcome: GameOutcome,
        tally: Vec<PlayerTally>,
    },
}
