//! A seat in one game: external user identity plus a hand of cards.

use crate::domain::cards::Card;
use crate::domain::UserId;

/// A player exists only inside a game: created on join, destroyed on
/// leave/kick/game end. One user may hold seats in several games (one per
/// room), but at most one seat per game.
#[derive(Debug, Clone)]
pub struct Player {
    pub user: UserId,
    pub hand: Vec<Card>,
    /// Lifetime counter for the stats sink.
    pub cards_played: u32,
}

impl Player {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            hand: Vec::new(),
            cards_played: 0,
        }
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Remove one copy of `card` from the hand; `false` if absent.
    pub fn remove_card(&mut self, card: Card) -> bool {
        match self.hand.iter().position(|c| *c == card) {
            Some(idx) => {
                self.hand.remove(idx);
                true
            }
            None => false,
        }
    }
}
