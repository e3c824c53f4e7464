//! Draw/discard pile pair with reshuffle-on-exhaustion.
//!
//! Both piles are ordered; the top of each is the last element. When the
//! draw pile runs dry, everything except the top discard is shuffled back
//! into a fresh draw pile — the top discard stays put because it defines
//! current legality. Deals are capacity-checked up front so a failed deal
//! never mutates either pile.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::domain::cards::Card;
use crate::domain::rules::{self, GameMode};
use crate::errors::EngineError;

#[derive(Debug)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    total: usize,
    rng: ChaCha12Rng,
}

impl Deck {
    pub fn new(mode: GameMode) -> Self {
        Self::with_rng(mode, ChaCha12Rng::from_os_rng())
    }

    /// Deterministic deck for tests.
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        Self::with_rng(mode, ChaCha12Rng::seed_from_u64(seed))
    }

    fn with_rng(mode: GameMode, mut rng: ChaCha12Rng) -> Self {
        let mut draw_pile = rules::composition(mode);
        draw_pile.shuffle(&mut rng);
        Self {
            total: draw_pile.len(),
            draw_pile,
            discard_pile: Vec::new(),
            rng,
        }
    }

    /// Size of the fixed starting composition.
    pub fn total_cards(&self) -> usize {
        self.total
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Cards a deal could supply right now: the draw pile plus everything
    /// under the top discard.
    pub fn available(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len().saturating_sub(1)
    }

    /// Top of the discard pile; `None` until the seed card is flipped.
    pub fn last(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    /// Remove and return the top `n` draw-pile cards, reshuffling from the
    /// discard pile as needed. Fails without mutating if even a reshuffle
    /// cannot supply `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.available() < n {
            return Err(EngineError::DeckExhausted);
        }
        let mut dealt = Vec::with_capacity(n);
        for _ in 0..n {
            if self.draw_pile.is_empty() {
                self.reshuffle_from_discard();
            }
            // available() was checked, the pop cannot miss
            if let Some(card) = self.draw_pile.pop() {
                dealt.push(card);
            }
        }
        Ok(dealt)
    }

    /// Best-effort deal for forced penalty draws: supplies as many of `n`
    /// cards as the deck can give, possibly none.
    pub fn deal_upto(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.available());
        // take is clamped, so this cannot fail
        self.deal(take).unwrap_or_default()
    }

    /// Push a played card onto the discard pile; it becomes the last card.
    pub fn play(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// Flip cards off the draw pile until a plain number card appears and
    /// discard it as the seed. Rejected specials cycle to the bottom of the
    /// draw pile. The seed's effect is never applied — it only sets the
    /// legality baseline.
    pub fn flip_seed(&mut self) -> Result<Card, EngineError> {
        for _ in 0..self.draw_pile.len() {
            match self.draw_pile.pop() {
                Some(card) if rules::is_valid_seed(card) => {
                    self.discard_pile.push(card);
                    return Ok(card);
                }
                Some(card) => self.draw_pile.insert(0, card),
                None => break,
            }
        }
        Err(EngineError::DeckExhausted)
    }

    /// Return cards to the bottom of the draw pile (a leaver's hand).
    pub fn return_to_bottom(&mut self, cards: Vec<Card>) {
        for (i, card) in cards.into_iter().enumerate() {
            self.draw_pile.insert(i, card);
        }
    }

    /// Test hook: plant a known card as the next deal.
    #[cfg(test)]
    pub(crate) fn push_draw_top(&mut self, card: Card) {
        self.draw_pile.push(card);
        self.total += 1;
    }

    fn reshuffle_from_discard(&mut self) {
        let top = self.discard_pile.pop();
        self.draw_pile.append(&mut self.discard_pile);
        self.draw_pile.shuffle(&mut self.rng);
        if let Some(top) = top {
            self.discard_pile.push(top);
        }
    }
}
