//! One game's full state machine.
//!
//! Lifecycle: `Lobby` (membership mutable) → `Active` (membership only
//! shrinks) → `Finished` (historical, no longer addressable for actions).
//! Every state-mutating operation validates fully before touching state, so
//! a failed action never leaves partial mutation visible.
//!
//! The game knows nothing about locks, timers, or messaging; it returns
//! [`GameEvent`]s and bumps `turn_epoch` whenever the turn clock should
//! reset. The service layer serializes access and reacts to the events.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::domain::cards::{Card, Color, Face};
use crate::domain::deck::Deck;
use crate::domain::events::{GameEvent, GameOutcome, PlayerTally};
use crate::domain::player::Player;
use crate::domain::rules::{self, GameMode};
use crate::domain::snapshot::{GameSnapshot, PlayerView};
use crate::domain::{RoomId, UserId};
use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Active,
    Finished,
}

/// Challenge material captured when a wild-draw-four is played: the hand as
/// it stood before the play and the color it was played onto.
#[derive(Debug, Clone)]
struct BluffContext {
    offender: UserId,
    prior_hand: Vec<Card>,
    prior_color: Color,
}

#[derive(Debug)]
pub struct Game {
    id: Uuid,
    room: RoomId,
    mode: GameMode,
    config: EngineConfig,
    phase: Phase,
    /// Seats in turn order.
    players: Vec<Player>,
    current: usize,
    /// +1 clockwise, -1 counter-clockwise.
    direction: i8,
    deck: Deck,
    current_color: Option<Color>,
    /// Accumulated forced-draw obligation; > 0 means a chain is open.
    pending_draws: u32,
    bluff: Option<BluffContext>,
    /// Card drawn this turn that may still be played (draw-then-play window).
    drawn: Option<Card>,
    open: bool,
    translate: bool,
    owners: HashSet<UserId>,
    /// Turn-version counter; stale timer firings compare against it.
    turn_epoch: u64,
    winner: Option<UserId>,
}

impl Game {
    pub fn new(room: RoomId, creator: UserId, mode: GameMode, config: EngineConfig) -> Self {
        Self::with_deck(room, creator, mode, config, Deck::new(mode))
    }

    /// Deterministic variant for tests and simulations.
    pub fn with_seed(
        room: RoomId,
        creator: UserId,
        mode: GameMode,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        Self::with_deck(room, creator, mode, config, Deck::with_seed(mode, seed))
    }

    fn with_deck(
        room: RoomId,
        creator: UserId,
        mode: GameMode,
        config: EngineConfig,
        deck: Deck,
    ) -> Self {
        let mut owners = HashSet::new();
        owners.insert(creator);
        Self {
            id: Uuid::new_v4(),
            room,
            mode,
            config,
            phase: Phase::Lobby,
            players: Vec::new(),
            current: 0,
            direction: 1,
            deck,
            current_color: None,
            pending_draws: 0,
            bluff: None,
            drawn: None,
            open: true,
            translate: false,
            owners,
            turn_epoch: 0,
            winner: None,
        }
    }

    // --- accessors -------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn turn_epoch(&self) -> u64 {
        self.turn_epoch
    }

    pub fn pending_draws(&self) -> u32 {
        self.pending_draws
    }

    pub fn winner(&self) -> Option<UserId> {
        self.winner
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        self.owners.contains(&user)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, user: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user == user)
    }

    pub fn current_user(&self) -> Option<UserId> {
        if self.phase != Phase::Active {
            return None;
        }
        self.players.get(self.current).map(|p| p.user)
    }

    /// Turn timeout for this game's mode; `None` disables the auto-skip.
    pub fn turn_timeout(&self) -> Option<std::time::Duration> {
        if self.mode.is_fast() {
            Some(crate::config::engine::FAST_TURN_TIMEOUT)
        } else {
            self.config.turn_timeout
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            room: self.room,
            mode: self.mode,
            phase: self.phase,
            open: self.open,
            translate: self.translate,
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    user: p.user,
                    hand_size: p.hand_size(),
                    cards_played: p.cards_played,
                })
                .collect(),
            current_player: self.current_user(),
            direction: self.direction,
            last_card: self.deck.last(),
            current_color: self.current_color,
            pending_draws: self.pending_draws,
            draw_pile_len: self.deck.draw_pile_len(),
            discard_pile_len: self.deck.discard_pile_len(),
        }
    }

    /// Cards currently accounted for across piles and hands. Always equals
    /// the starting composition size.
    pub fn cards_in_play(&self) -> usize {
        self.deck.draw_pile_len()
            + self.deck.discard_pile_len()
            + self.players.iter().map(Player::hand_size).sum::<usize>()
    }

    pub fn total_cards(&self) -> usize {
        self.deck.total_cards()
    }

    // --- lobby -----------------------------------------------------------

    pub fn join(&mut self, user: UserId) -> Result<Vec<GameEvent>, EngineError> {
        match self.phase {
            Phase::Lobby => {}
            // Active/finished games never grow.
            Phase::Active | Phase::Finished => return Err(EngineError::LobbyClosed),
        }
        if !self.open {
            return Err(EngineError::LobbyClosed);
        }
        if self.player(user).is_some() {
            return Err(EngineError::AlreadyJoined);
        }
        // Every seat needs a starting hand, plus one seed card.
        let needed = (self.players.len() + 1) * self.config.hand_size + 1;
        if needed > self.deck.total_cards() {
            return Err(EngineError::DeckExhausted);
        }
        self.players.push(Player::new(user));
        Ok(vec![GameEvent::PlayerJoined { user }])
    }

    pub fn set_open(&mut self, user: UserId, open: bool) -> Result<Vec<GameEvent>, EngineError> {
        if !self.is_owner(user) {
            return Err(EngineError::NotGameOwner);
        }
        self.open = open;
        Ok(vec![GameEvent::LobbyStateChanged { open }])
    }

    pub fn set_translation(
        &mut self,
        user: UserId,
        enabled: bool,
    ) -> Result<Vec<GameEvent>, EngineError> {
        if !self.is_owner(user) {
            return Err(EngineError::NotGameOwner);
        }
        self.translate = enabled;
        Ok(vec![GameEvent::TranslationChanged { enabled }])
    }

    pub fn start(&mut self, user: UserId) -> Result<Vec<GameEvent>, EngineError> {
        if self.phase != Phase::Lobby {
            return Err(EngineError::AlreadyStarted);
        }
        if self.player(user).is_none() {
            return Err(EngineError::NotJoined);
        }
        if self.players.len() < self.config.min_players {
            return Err(EngineError::NotEnoughPlayers);
        }
        let needed = self.players.len() * self.config.hand_size + 1;
        if needed > self.deck.available() {
            return Err(EngineError::DeckExhausted);
        }

        // Seed first so hands cannot strip every number card from the pile.
        let seed_card = self.deck.flip_seed()?;
        for idx in 0..self.players.len() {
            let hand = self.deck.deal(self.config.hand_size)?;
            self.players[idx].hand = hand;
        }
        let color = seed_card
            .color()
            .ok_or_else(|| EngineError::illegal_play("seed card must carry a color"))?;

        self.current_color = Some(color);
        self.phase = Phase::Active;
        self.current = 0;
        self.direction = 1;
        self.turn_epoch += 1;

        Ok(vec![GameEvent::GameStarted {
            first_player: self.players[0].user,
            seed_card,
            color,
        }])
    }

    // --- membership while running ----------------------------------------

    /// Remove a seat. In an active game the leaver's cards return to the
    /// bottom of the draw pile and the turn moves on if it was theirs;
    /// dropping below the minimum ends the game.
    pub fn leave(&mut self, user: UserId, kicked: bool) -> Result<Vec<GameEvent>, EngineError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.user == user)
            .ok_or(EngineError::NotJoined)?;

        let mut events = vec![GameEvent::PlayerLeft { user, kicked }];

        if self.phase != Phase::Active {
            self.players.remove(idx);
            return Ok(events);
        }

        let was_current = idx == self.current;
        // Identify who should act next before indices shift.
        let next_user = if was_current {
            self.players[self.step_index(self.current, 1)].user
        } else {
            self.players[self.current].user
        };

        let leaver = self.players.remove(idx);
        self.deck.return_to_bottom(leaver.hand);
        if self
            .bluff
            .as_ref()
            .is_some_and(|ctx| ctx.offender == user)
        {
            self.bluff = None;
        }

        if self.players.len() < self.config.min_players {
            events.extend(self.finish(GameOutcome::NotEnoughPlayers));
            return Ok(events);
        }

        // Re-point at the survivor identified above.
        self.current = self
            .players
            .iter()
            .position(|p| p.user == next_user)
            .unwrap_or(0);
        if was_current {
            self.drawn = None;
            self.turn_epoch += 1;
            events.push(GameEvent::TurnAdvanced {
                player: next_user,
                pending_draws: self.pending_draws,
            });
        }
        Ok(events)
    }

    /// Explicit end by an owner; callers check ownership at the API edge.
    pub fn end(&mut self, user: UserId) -> Result<Vec<GameEvent>, EngineError> {
        if !self.is_owner(user) {
            return Err(EngineError::NotGameOwner);
        }
        if self.phase == Phase::Finished {
            return Err(EngineError::NoGameInRoom);
        }
        Ok(self.finish(GameOutcome::Ended))
    }

    // --- turn actions ------------------------------------------------------

    pub fn play_card(
        &mut self,
        user: UserId,
        card: Card,
        chosen_color: Option<Color>,
    ) -> Result<Vec<GameEvent>, EngineError> {
        self.require_turn(user)?;
        let player = &self.players[self.current];
        if !player.holds(card) {
            return Err(EngineError::illegal_play("card not in hand"));
        }
        if let Some(drawn) = self.drawn {
            if card != drawn {
                return Err(EngineError::illegal_play(
                    "only the just-drawn card may be played",
                ));
            }
        }
        let last = self
            .deck
            .last()
            .ok_or_else(|| EngineError::illegal_play("no card on the discard pile"))?;
        let current_color = self
            .current_color
            .ok_or_else(|| EngineError::illegal_play("no current color"))?;

        if self.pending_draws > 0 {
            if !rules::can_stack(card, last) {
                return Err(EngineError::illegal_play(
                    "must extend the draw chain or draw",
                ));
            }
        } else if !rules::can_play(card, last, current_color) {
            return Err(EngineError::illegal_play(
                "card matches neither color nor face",
            ));
        }

        let new_color = match card {
            Card::Wild | Card::WildDrawFour => chosen_color
                .ok_or_else(|| EngineError::illegal_play("wild plays must choose a color"))?,
            Card::Colored { color, .. } => color,
        };

        // Validation done; mutate.
        let prior_hand = self.players[self.current].hand.clone();
        let player = &mut self.players[self.current];
        player.remove_card(card);
        player.cards_played += 1;
        let remaining = player.hand_size();
        self.deck.play(card);
        self.current_color = Some(new_color);
        self.drawn = None;

        let mut events = vec![GameEvent::CardPlayed {
            player: user,
            card,
            color: new_color,
            remaining,
        }];

        match card {
            Card::WildDrawFour => {
                self.pending_draws += 4;
                self.bluff = Some(BluffContext {
                    offender: user,
                    prior_hand,
                    prior_color: current_color,
                });
            }
            Card::Colored {
                face: Face::DrawTwo,
                ..
            } => {
                self.pending_draws += 2;
                self.bluff = None;
            }
            _ => self.bluff = None,
        }

        if remaining == 0 {
            events.extend(self.finish(GameOutcome::Won { winner: user }));
            return Ok(events);
        }

        let steps = match card {
            Card::Colored {
                face: Face::Skip, ..
            } => 2,
            Card::Colored {
                face: Face::Reverse,
                ..
            } => {
                self.direction = -self.direction;
                // With two players a reverse acts as a skip.
                if self.players.len() == 2 {
                    2
                } else {
                    1
                }
            }
            _ => 1,
        };
        events.push(self.advance(steps));
        Ok(events)
    }

    /// Draw as the turn's action. With an open chain this resolves the full
    /// pending count and forfeits the turn; otherwise exactly one card is
    /// drawn and, if playable, held open for an immediate play.
    pub fn draw(&mut self, user: UserId) -> Result<Vec<GameEvent>, EngineError> {
        self.require_turn(user)?;

        if self.pending_draws > 0 {
            let mut events = Vec::new();
            events.extend(self.resolve_pending_onto_current());
            events.push(self.advance(1));
            return Ok(events);
        }

        if self.drawn.is_some() {
            return Err(EngineError::illegal_play("already drew this turn"));
        }

        let card = self.deck.deal(1)?.remove(0);
        self.players[self.current].hand.push(card);
        let mut events = vec![GameEvent::PlayerDrew {
            player: user,
            count: 1,
        }];

        let last = self.deck.last();
        let playable = match (last, self.current_color) {
            (Some(last), Some(color)) => rules::can_play(card, last, color),
            _ => false,
        };
        if playable {
            self.drawn = Some(card);
            events.push(GameEvent::DrawnCardPlayable { player: user });
        } else {
            events.push(self.advance(1));
        }
        Ok(events)
    }

    /// Voluntary pass by the active player.
    pub fn skip(&mut self, user: UserId) -> Result<Vec<GameEvent>, EngineError> {
        self.require_turn(user)?;
        Ok(self.force_skip(false))
    }

    /// Timer-fire path: skip only if the turn the timer was armed for is
    /// still the live one. Stale firings are no-ops.
    pub fn timeout_skip(&mut self, armed_epoch: u64) -> Option<Vec<GameEvent>> {
        if self.phase != Phase::Active || self.turn_epoch != armed_epoch {
            return None;
        }
        Some(self.force_skip(true))
    }

    fn force_skip(&mut self, timeout: bool) -> Vec<GameEvent> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };
        let mut events = vec![GameEvent::TurnSkipped {
            player: user,
            timeout,
        }];
        if self.pending_draws > 0 {
            events.extend(self.resolve_pending_onto_current());
        }
        events.push(self.advance(1));
        events
    }

    /// Challenge the wild-draw-four that opened the current chain. Only the
    /// player who would otherwise draw may call, and only while the chain
    /// is open.
    pub fn call_bluff(&mut self, user: UserId) -> Result<Vec<GameEvent>, EngineError> {
        self.require_turn(user)?;
        if self.pending_draws == 0 || self.deck.last() != Some(Card::WildDrawFour) {
            return Err(EngineError::BluffWindowClosed);
        }
        let Some(ctx) = self.bluff.take() else {
            return Err(EngineError::BluffWindowClosed);
        };

        let was_bluff = ctx
            .prior_hand
            .iter()
            .any(|c| c.color() == Some(ctx.prior_color));
        let pending = self.pending_draws;
        self.pending_draws = 0;
        self.drawn = None;

        let mut events = Vec::new();
        if was_bluff {
            // Caught: the offender takes the chain and loses the tempo; the
            // challenger acts now.
            let drawn = self.draw_into_hand_of(ctx.offender, pending);
            events.push(GameEvent::BluffResolved {
                challenger: user,
                offender: ctx.offender,
                was_bluff: true,
                cards_drawn: drawn,
            });
            self.turn_epoch += 1;
            events.push(GameEvent::TurnAdvanced {
                player: user,
                pending_draws: 0,
            });
        } else {
            // Wrong call: the challenger draws the chain plus the penalty
            // and forfeits the turn.
            let total = pending + self.config.bluff_penalty;
            let drawn = self.draw_into_hand_of(user, total);
            events.push(GameEvent::BluffResolved {
                challenger: user,
                offender: ctx.offender,
                was_bluff: false,
                cards_drawn: drawn,
            });
            events.push(self.advance(1));
        }
        Ok(events)
    }

    // --- internals ---------------------------------------------------------

    fn require_turn(&self, user: UserId) -> Result<(), EngineError> {
        match self.phase {
            Phase::Lobby => return Err(EngineError::GameNotStarted),
            Phase::Finished => return Err(EngineError::NoGameInRoom),
            Phase::Active => {}
        }
        if self.current_user() != Some(user) {
            if self.player(user).is_none() {
                return Err(EngineError::NotJoined);
            }
            return Err(EngineError::illegal_play("not this player's turn"));
        }
        Ok(())
    }

    /// Forced penalty draws are best-effort: an exhausted deck stops the
    /// draw short instead of failing the whole resolution.
    fn resolve_pending_onto_current(&mut self) -> Vec<GameEvent> {
        let user = self.players[self.current].user;
        let count = self.pending_draws;
        self.pending_draws = 0;
        self.bluff = None;
        let drawn = self.draw_into_hand_of(user, count);
        vec![GameEvent::PlayerDrew {
            player: user,
            count: drawn,
        }]
    }

    fn draw_into_hand_of(&mut self, user: UserId, count: u32) -> u32 {
        let cards = self.deck.deal_upto(count as usize);
        let drawn = cards.len() as u32;
        if let Some(player) = self.players.iter_mut().find(|p| p.user == user) {
            player.hand.extend(cards);
        } else {
            // Seat vanished between capture and resolution; put the cards
            // back rather than leak them.
            self.deck.return_to_bottom(cards);
            return 0;
        }
        drawn
    }

    fn step_index(&self, from: usize, steps: usize) -> usize {
        let len = self.players.len() as i64;
        let delta = self.direction as i64 * steps as i64;
        ((from as i64 + delta).rem_euclid(len)) as usize
    }

    fn advance(&mut self, steps: usize) -> GameEvent {
        self.current = self.step_index(self.current, steps);
        self.drawn = None;
        self.turn_epoch += 1;
        GameEvent::TurnAdvanced {
            player: self.players[self.current].user,
            pending_draws: self.pending_draws,
        }
    }

    fn finish(&mut self, outcome: GameOutcome) -> Vec<GameEvent> {
        self.phase = Phase::Finished;
        self.pending_draws = 0;
        self.bluff = None;
        self.drawn = None;
        self.turn_epoch += 1;
        if let GameOutcome::Won { winner } = outcome {
            self.winner = Some(winner);
        }
        let tally = self
            .players
            .iter()
            .map(|p| PlayerTally {
                user: p.user,
                cards_played: p.cards_played,
            })
            .collect();
        vec![GameEvent::GameEnded { outcome, tally }]
    }
}

#[cfg(test)]
impl Game {
    /// Test hook: overwrite a player's hand.
    pub(crate) fn force_hand(&mut self, user: UserId, hand: Vec<Card>) {
        if let Some(player) = self.players.iter_mut().find(|p| p.user == user) {
            player.hand = hand;
        }
    }

    /// Test hook: force the discard top and current color.
    pub(crate) fn force_top(&mut self, card: Card, color: Color) {
        self.deck.play(card);
        self.current_color = Some(color);
    }

    /// Test hook: plant a known card as the next deal.
    pub(crate) fn force_next_draw(&mut self, card: Card) {
        self.deck.push_draw_top(card);
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current
    }
}
