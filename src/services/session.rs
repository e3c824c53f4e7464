//! Process-scoped registries: which game runs in which room, which games a
//! user sits in, and which of those an out-of-room action should target.
//!
//! The registries are shared across all games and use lock-free maps with
//! short critical sections; looking a game up never requires holding that
//! game's lock. Each game is wrapped in its own mutex ([`GameCell`]) so
//! actions against different games proceed fully in parallel.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::domain::game::{Game, Phase};
use crate::domain::rules::GameMode;
use crate::domain::{RoomId, UserId};
use crate::errors::EngineError;

/// One game plus its lock. All state-mutating operations on the game are
/// serialized through this mutex; no I/O happens while it is held.
#[derive(Debug)]
pub struct GameCell {
    id: Uuid,
    room: RoomId,
    game: Mutex<Game>,
}

pub type GameHandle = Arc<GameCell>;

impl GameCell {
    fn new(game: Game) -> GameHandle {
        Arc::new(Self {
            id: game.id(),
            room: game.room(),
            game: Mutex::new(game),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock()
    }
}

/// Top-level registry; exclusively owns the lifetime of every game.
#[derive(Debug)]
pub struct SessionManager {
    config: EngineConfig,
    /// Per-room stack of games, most recent last. The top entry is the
    /// active (or most recently finished) game; older ones are history.
    room_games: DashMap<RoomId, Vec<GameHandle>>,
    /// Every unfinished game a user holds a seat in.
    user_games: DashMap<UserId, Vec<GameHandle>>,
    /// Disambiguation pointer for actions arriving without room context.
    user_current: DashMap<UserId, GameHandle>,
    /// Users who asked to be pinged when a room gets its next game.
    reminders: DashMap<RoomId, HashSet<UserId>>,
}

impl SessionManager {
    pub fn new(config: EngineConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            room_games: DashMap::new(),
            user_games: DashMap::new(),
            user_current: DashMap::new(),
            reminders: DashMap::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Push a fresh lobby onto the room's stack. Fails while an unfinished
    /// game occupies the top slot. Returns the new game plus the drained
    /// next-game reminder set for the room.
    pub fn new_game(
        &self,
        room: RoomId,
        creator: UserId,
        mode: GameMode,
    ) -> Result<(GameHandle, Vec<UserId>), EngineError> {
        let mut stack = self.room_games.entry(room).or_default();
        if let Some(top) = stack.last() {
            if top.lock().phase() != Phase::Finished {
                return Err(EngineError::GameAlreadyRunning);
            }
        }
        let handle = GameCell::new(Game::new(room, creator, mode, self.config.clone()));
        info!(room, creator, game = %handle.id(), "new game created");
        stack.push(handle.clone());
        drop(stack);

        let reminded = self
            .reminders
            .remove(&room)
            .map(|(_, users)| users.into_iter().collect())
            .unwrap_or_default();
        Ok((handle, reminded))
    }

    /// The room's addressable game: the top of the stack, unless finished.
    pub fn active_game(&self, room: RoomId) -> Result<GameHandle, EngineError> {
        let handle = self
            .room_games
            .get(&room)
            .and_then(|stack| stack.last().cloned())
            .ok_or(EngineError::NoGameInRoom)?;
        if handle.lock().phase() == Phase::Finished {
            return Err(EngineError::NoGameInRoom);
        }
        Ok(handle)
    }

    /// Full stack for a room, history included.
    pub fn room_history(&self, room: RoomId) -> Vec<GameHandle> {
        self.room_games
            .get(&room)
            .map(|stack| stack.clone())
            .unwrap_or_default()
    }

    /// Track a successful join: the new seat also becomes the user's
    /// current disambiguation target.
    pub fn register_player(&self, user: UserId, handle: GameHandle) {
        let mut games = self.user_games.entry(user).or_default();
        if !games.iter().any(|g| g.id() == handle.id()) {
            games.push(handle.clone());
        }
        drop(games);
        self.user_current.insert(user, handle);
    }

    /// Forget a seat. If the disambiguation pointer aimed at this game it
    /// is re-pointed at another of the user's games, if any remain.
    pub fn unregister_player(&self, user: UserId, game: Uuid) {
        let remaining = {
            let mut games = match self.user_games.get_mut(&user) {
                Some(games) => games,
                None => return,
            };
            games.retain(|g| g.id() != game);
            games.last().cloned()
        };
        if remaining.is_none() {
            self.user_games.remove(&user);
        }

        let points_here = self
            .user_current
            .get(&user)
            .is_some_and(|current| current.id() == game);
        if points_here {
            match remaining {
                Some(next) => {
                    self.user_current.insert(user, next);
                }
                None => {
                    self.user_current.remove(&user);
                }
            }
        }
    }

    /// The game an out-of-room action should target.
    pub fn current_game(&self, user: UserId) -> Option<GameHandle> {
        self.user_current.get(&user).map(|h| h.clone())
    }

    /// Explicit disambiguation: point the user's out-of-room actions at
    /// their seat in `room`.
    pub fn select_current(&self, user: UserId, room: RoomId) -> Result<GameHandle, EngineError> {
        let handle = self
            .games_for(user)
            .into_iter()
            .find(|g| g.room() == room)
            .ok_or(EngineError::NotJoined)?;
        self.user_current.insert(user, handle.clone());
        Ok(handle)
    }

    pub fn games_for(&self, user: UserId) -> Vec<GameHandle> {
        self.user_games
            .get(&user)
            .map(|games| games.clone())
            .unwrap_or_default()
    }

    /// Whether `user` holds a seat in the room's active game.
    pub fn find_player(&self, user: UserId, room: RoomId) -> Option<GameHandle> {
        let handle = self.active_game(room).ok()?;
        let joined = handle.lock().player(user).is_some();
        joined.then_some(handle)
    }

    /// Remember to ping `user` when this room gets its next game.
    pub fn remind_on_next_game(&self, room: RoomId, user: UserId) {
        self.reminders.entry(room).or_default().insert(user);
    }
}
