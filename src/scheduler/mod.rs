//! Per-game turn-timer bookkeeping.
//!
//! The scheduler only tracks one cancellation token per game; the actual
//! sleep-then-skip task is spawned by the action resolver, which knows how
//! to take the game lock and dispatch the resulting events. Arming a game
//! cancels its previous token, so at most one timer is live per game, and
//! stale expirations are additionally rejected by the game's turn epoch.

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct TurnScheduler {
    timers: DashMap<Uuid, CancellationToken>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any outstanding timer for `game` and hand out a fresh token
    /// for the next one.
    pub fn arm(&self, game: Uuid) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.timers.insert(game, token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel and forget the game's timer (game over, or timers disabled).
    pub fn cancel(&self, game: Uuid) {
        if let Some((_, token)) = self.timers.remove(&game) {
            token.cancel();
        }
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }
}
