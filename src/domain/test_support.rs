//! Shared builders for domain tests.

use crate::config::EngineConfig;
use crate::domain::game::Game;
use crate::domain::rules::GameMode;
use crate::domain::UserId;

pub const ROOM: i64 = -1000;

/// Users are numbered 100, 101, 102, ... in join (= turn) order.
pub fn user(n: usize) -> UserId {
    100 + n as i64
}

pub fn lobby_game(players: usize, seed: u64) -> Game {
    let mut game = Game::with_seed(ROOM, user(0), GameMode::Classic, EngineConfig::default(), seed);
    for n in 0..players {
        game.join(user(n)).expect("join in lobby");
    }
    game
}

/// A running classic game with `players` seats; `user(0)` acts first.
pub fn started_game(players: usize, seed: u64) -> Game {
    let mut game = lobby_game(players, seed);
    game.start(user(0)).expect("start game");
    game
}
