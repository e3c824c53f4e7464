//! Engine-level error type used across the domain and service layers.
//!
//! Every action entry point returns `Result<T, EngineError>`. All variants
//! are recoverable by the caller re-issuing a corrected action; none of them
//! is fatal to the process. The engine carries no display text beyond the
//! diagnostic messages here — translating an error kind into a user-visible
//! message is the transport layer's job.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Action targets a room with no addressable game.
    #[error("no game is running in this room")]
    NoGameInRoom,

    /// Join attempted after the lobby was closed or the game started.
    #[error("the lobby is closed")]
    LobbyClosed,

    /// The user already holds a seat in this game.
    #[error("already joined this game")]
    AlreadyJoined,

    /// The user holds no seat in this game.
    #[error("not part of this game")]
    NotJoined,

    /// A deal or draw cannot be satisfied even after reshuffling the
    /// discard pile. The failed operation mutates nothing.
    #[error("not enough cards left in the deck")]
    DeckExhausted,

    /// Card not in hand, fails the color/face/wild legality check, or an
    /// action was attempted out of turn.
    #[error("illegal play: {0}")]
    IllegalPlay(String),

    /// Membership dropped below the minimum during an active game. This
    /// accompanies a forced end, it never rejects a request on its own.
    #[error("not enough players")]
    NotEnoughPlayers,

    /// Call-bluff attempted when no wild-draw-four is pending challenge.
    #[error("no wild draw four is awaiting a challenge")]
    BluffWindowClosed,

    /// A new game was requested while an unfinished one occupies the room.
    #[error("an unfinished game already occupies this room")]
    GameAlreadyRunning,

    /// The action requires an active game but the lobby has not started.
    #[error("the game has not started yet")]
    GameNotStarted,

    /// The action requires a lobby but the game already started.
    #[error("the game has already started")]
    AlreadyStarted,

    /// The action is reserved for game owners.
    #[error("only a game owner may do that")]
    NotGameOwner,

    /// Invalid engine configuration (environment overrides).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn illegal_play(detail: impl Into<String>) -> Self {
        Self::IllegalPlay(detail.into())
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }
}
