//! Action entry points: the one layer that ties registries, game locks,
//! timers, messaging, and stats together.
//!
//! Every operation follows the same shape: locate the game through the
//! session registries, mutate it under its own lock, release the lock, then
//! notify the messenger and adjust the turn timer based on the returned
//! events. No await happens while a game lock is held.

use std::sync::{Arc, Weak};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapters::{Messenger, Recipient, StatsStore, StatsUpdate};
use crate::domain::cards::{Card, Color};
use crate::domain::events::{GameEvent, GameOutcome};
use crate::domain::rules::GameMode;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::{RoomId, UserId};
use crate::errors::EngineError;
use crate::scheduler::TurnScheduler;
use crate::services::session::{GameHandle, SessionManager};

pub struct ActionResolver {
    sessions: Arc<SessionManager>,
    scheduler: TurnScheduler,
    messenger: Arc<dyn Messenger>,
    stats: Arc<dyn StatsStore>,
}

impl ActionResolver {
    pub fn new(
        sessions: Arc<SessionManager>,
        messenger: Arc<dyn Messenger>,
        stats: Arc<dyn StatsStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            sessions,
            scheduler: TurnScheduler::new(),
            messenger,
            stats,
        })
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    // --- lobby management --------------------------------------------------

    /// Create a lobby in `room` and ping everyone who asked for a reminder.
    /// The creator still has to join like anyone else.
    pub async fn new_game(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
        mode: GameMode,
    ) -> Result<Uuid, EngineError> {
        let (handle, reminded) = self.sessions.new_game(room, user, mode)?;
        let game = handle.id();
        self.messenger
            .notify(Recipient::Room(room), &GameEvent::GameCreated { game, room })
            .await;
        for user in reminded {
            self.messenger
                .notify(
                    Recipient::User(user),
                    &GameEvent::NextGameReminder { user, room },
                )
                .await;
        }
        Ok(game)
    }

    pub async fn join_game(self: &Arc<Self>, user: UserId, room: RoomId) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = handle.lock().join(user)?;
        self.sessions.register_player(user, handle.clone());
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn leave_game(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
    ) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = handle.lock().leave(user, false)?;
        self.sessions.unregister_player(user, handle.id());
        self.dispatch(&handle, events).await;
        Ok(())
    }

    /// Owner-only removal of another player.
    pub async fn kick_player(
        self: &Arc<Self>,
        owner: UserId,
        room: RoomId,
        target: UserId,
    ) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = {
            let mut game = handle.lock();
            if !game.is_owner(owner) {
                return Err(EngineError::NotGameOwner);
            }
            game.leave(target, true)?
        };
        info!(room, owner, target, "player kicked");
        self.sessions.unregister_player(target, handle.id());
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn start_game(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
    ) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = handle.lock().start(user)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn close_lobby(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
    ) -> Result<(), EngineError> {
        self.set_lobby_open(user, room, false).await
    }

    pub async fn open_lobby(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
    ) -> Result<(), EngineError> {
        self.set_lobby_open(user, room, true).await
    }

    async fn set_lobby_open(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
        open: bool,
    ) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = handle.lock().set_open(user, open)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn set_translation(
        self: &Arc<Self>,
        user: UserId,
        room: RoomId,
        enabled: bool,
    ) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = handle.lock().set_translation(user, enabled)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn end_game(self: &Arc<Self>, user: UserId, room: RoomId) -> Result<(), EngineError> {
        let handle = self.sessions.active_game(room)?;
        let events = handle.lock().end(user)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    // --- turn actions --------------------------------------------------------
    //
    // These may arrive without room context (a private reply); the user's
    // disambiguation pointer then decides which game is meant.

    pub async fn play_card(
        self: &Arc<Self>,
        user: UserId,
        room: Option<RoomId>,
        card: Card,
        chosen_color: Option<Color>,
    ) -> Result<(), EngineError> {
        let handle = self.resolve(user, room)?;
        let events = handle.lock().play_card(user, card, chosen_color)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn draw_card(
        self: &Arc<Self>,
        user: UserId,
        room: Option<RoomId>,
    ) -> Result<(), EngineError> {
        let handle = self.resolve(user, room)?;
        let events = handle.lock().draw(user)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn skip_turn(
        self: &Arc<Self>,
        user: UserId,
        room: Option<RoomId>,
    ) -> Result<(), EngineError> {
        let handle = self.resolve(user, room)?;
        let events = handle.lock().skip(user)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    pub async fn call_bluff(
        self: &Arc<Self>,
        user: UserId,
        room: Option<RoomId>,
    ) -> Result<(), EngineError> {
        let handle = self.resolve(user, room)?;
        let events = handle.lock().call_bluff(user)?;
        self.dispatch(&handle, events).await;
        Ok(())
    }

    // --- queries and bookkeeping ---------------------------------------------

    /// Remember to ping `user` when this room's next lobby opens.
    pub fn notify_me(&self, user: UserId, room: RoomId) {
        self.sessions.remind_on_next_game(room, user);
    }

    /// Point the user's room-less actions at their seat in `room`.
    pub fn select_game(&self, user: UserId, room: RoomId) -> Result<Uuid, EngineError> {
        Ok(self.sessions.select_current(user, room)?.id())
    }

    pub fn game_info(&self, room: RoomId) -> Result<GameSnapshot, EngineError> {
        Ok(self.sessions.active_game(room)?.lock().snapshot())
    }

    /// The caller's own hand; only visible to the seat holder.
    pub fn hand_of(&self, user: UserId, room: RoomId) -> Result<Vec<Card>, EngineError> {
        let handle = self.sessions.active_game(room)?;
        let game = handle.lock();
        let player = game.player(user).ok_or(EngineError::NotJoined)?;
        Ok(player.hand.clone())
    }

    // --- internals -------------------------------------------------------------

    fn resolve(&self, user: UserId, room: Option<RoomId>) -> Result<GameHandle, EngineError> {
        match room {
            Some(room) => self.sessions.active_game(room),
            None => self
                .sessions
                .current_game(user)
                .ok_or(EngineError::NoGameInRoom),
        }
    }

    /// Post-mutation fan-out: notify the room, then settle timers and, on
    /// game end, stats and registry cleanup. Runs with the game lock
    /// released; only short re-locks to read turn state.
    async fn dispatch(self: &Arc<Self>, handle: &GameHandle, events: Vec<GameEvent>) {
        let room = handle.room();
        for event in &events {
            self.messenger.notify(Recipient::Room(room), event).await;
        }

        let ended = events
            .iter()
            .find_map(|event| match event {
                GameEvent::GameEnded { outcome, tally } => Some((*outcome, tally.clone())),
                _ => None,
            });
        if let Some((outcome, tally)) = ended {
            self.scheduler.cancel(handle.id());
            let winner = match outcome {
                GameOutcome::Won { winner } => Some(winner),
                GameOutcome::NotEnoughPlayers | GameOutcome::Ended => None,
            };
            for entry in tally {
                self.sessions.unregister_player(entry.user, handle.id());
                self.stats
                    .record(StatsUpdate {
                        user: entry.user,
                        won: winner == Some(entry.user),
                        cards_played: entry.cards_played,
                    })
                    .await;
            }
            return;
        }

        if events.iter().any(turn_clock_reset) {
            let (active, epoch, timeout) = {
                let game = handle.lock();
                (game.is_active(), game.turn_epoch(), game.turn_timeout())
            };
            if active {
                match timeout {
                    Some(duration) => self.arm_timer(handle.clone(), epoch, duration),
                    None => self.scheduler.cancel(handle.id()),
                }
            }
        }
    }

    /// Spawn the sleep-then-skip task for the turn identified by `epoch`.
    /// Arming hands out a fresh token and cancels the previous one, so a
    /// player action always defuses the old timer before the new one runs.
    fn arm_timer(self: &Arc<Self>, handle: GameHandle, epoch: u64, duration: std::time::Duration) {
        let token = self.scheduler.arm(handle.id());
        let resolver = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    Self::fire_timeout(resolver, handle, epoch, token).await;
                }
            }
        });
    }

    async fn fire_timeout(
        resolver: Weak<Self>,
        handle: GameHandle,
        epoch: u64,
        token: CancellationToken,
    ) {
        // Losing the cancellation race after the sleep completes is fine:
        // the epoch check below rejects the stale fire anyway.
        if token.is_cancelled() {
            return;
        }
        let Some(resolver) = resolver.upgrade() else {
            warn!(game = %handle.id(), "turn timer outlived the resolver");
            return;
        };
        let events = handle.lock().timeout_skip(epoch);
        match events {
            Some(events) => {
                debug!(game = %handle.id(), epoch, "turn timed out, auto-skipping");
                resolver.dispatch(&handle, events).await;
            }
            None => {
                debug!(game = %handle.id(), epoch, "stale turn timer ignored");
            }
        }
    }
}

/// Events after which the current player changed or got a fresh decision
/// window, i.e. the turn clock must restart.
fn turn_clock_reset(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::GameStarted { .. }
            | GameEvent::TurnAdvanced { .. }
            | GameEvent::DrawnCardPlayable { .. }
    )
}
