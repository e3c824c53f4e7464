//! Policy knobs for the game engine.
//!
//! The historical bot hard-coded most of these (seven-card starting hands,
//! a +2 bluff penalty). They are exposed here as configuration with the
//! historical values as defaults, overridable through `CARDROOM_*`
//! environment variables.

use std::env;
use std::time::Duration;

use crate::errors::EngineError;

/// Turn timeout applied in Fast mode. Deliberately a constant: Fast mode's
/// auto-skip cannot be stretched or disabled by configuration.
pub const FAST_TURN_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum players required to start, and to keep an active game alive.
    pub min_players: usize,
    /// Cards dealt to each player when the game starts.
    pub hand_size: usize,
    /// Extra cards drawn by a challenger whose bluff call was wrong,
    /// on top of the pending draw count.
    pub bluff_penalty: u32,
    /// Turn timeout outside Fast mode. `None` disables the auto-skip timer.
    pub turn_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            hand_size: 7,
            bluff_penalty: 2,
            turn_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl EngineConfig {
    /// Build a config from `CARDROOM_*` environment variables, falling back
    /// to defaults for anything unset. `CARDROOM_TURN_TIMEOUT_SECS=0`
    /// disables the classic-mode timer.
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();

        let min_players = parse_var("CARDROOM_MIN_PLAYERS", defaults.min_players)?;
        if min_players < 2 {
            return Err(EngineError::config(
                "CARDROOM_MIN_PLAYERS must be at least 2",
            ));
        }

        let hand_size = parse_var("CARDROOM_HAND_SIZE", defaults.hand_size)?;
        if hand_size == 0 {
            return Err(EngineError::config("CARDROOM_HAND_SIZE must be positive"));
        }

        let bluff_penalty = parse_var("CARDROOM_BLUFF_PENALTY", defaults.bluff_penalty)?;

        let timeout_secs: u64 = parse_var("CARDROOM_TURN_TIMEOUT_SECS", 90)?;
        let turn_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            min_players,
            hand_size,
            bluff_penalty,
            turn_timeout,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, EngineError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| EngineError::config(format!("cannot parse '{raw}' for {name}"))),
        Err(_) => Ok(default),
    }
}
