//! Legality rules and per-mode deck composition.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Color, Face};

/// Game variants. Text mode renders differently but plays identically to
/// Classic, so the engine only distinguishes deck composition (Wild) and
/// timeout policy (Fast).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Classic,
    Fast,
    Wild,
    Text,
}

impl GameMode {
    /// Fast mode always auto-skips on timeout, with a short fixed duration.
    pub fn is_fast(&self) -> bool {
        matches!(self, GameMode::Fast)
    }
}

/// The full starting composition for a mode. The multiset of cards across
/// draw pile, discard pile, and all hands must equal this for the whole
/// life of a game.
pub fn composition(mode: GameMode) -> Vec<Card> {
    let mut cards = Vec::with_capacity(108);
    match mode {
        GameMode::Classic | GameMode::Fast | GameMode::Text => {
            for color in Color::ALL {
                cards.push(Card::number(color, 0));
                for n in 1..=9 {
                    cards.push(Card::number(color, n));
                    cards.push(Card::number(color, n));
                }
                for _ in 0..2 {
                    cards.push(Card::skip(color));
                    cards.push(Card::reverse(color));
                    cards.push(Card::draw_two(color));
                }
            }
            for _ in 0..4 {
                cards.push(Card::Wild);
                cards.push(Card::WildDrawFour);
            }
        }
        GameMode::Wild => {
            // Special-heavy variant: only zeros survive of the numbers,
            // everything else is an action card.
            for color in Color::ALL {
                for _ in 0..2 {
                    cards.push(Card::number(color, 0));
                    cards.push(Card::skip(color));
                    cards.push(Card::reverse(color));
                    cards.push(Card::draw_two(color));
                }
            }
            for _ in 0..6 {
                cards.push(Card::Wild);
                cards.push(Card::WildDrawFour);
            }
        }
    }
    cards
}

/// Base legality: a card may be played onto `last` under `current_color`
/// iff it is wild, matches the current color, or matches the last card's
/// face. Forced-draw chains restrict this further, see [`can_stack`].
pub fn can_play(card: Card, last: Card, current_color: Color) -> bool {
    match card {
        Card::Wild | Card::WildDrawFour => true,
        Card::Colored { color, face } => {
            if color == current_color {
                return true;
            }
            matches!(last, Card::Colored { face: last_face, .. } if last_face == face)
        }
    }
}

/// Whether `card` extends an open forced-draw chain topped by `last`.
/// Only like stacks on like: a draw-two on a draw-two, a wild-draw-four on
/// a wild-draw-four.
pub fn can_stack(card: Card, last: Card) -> bool {
    match (card, last) {
        (
            Card::Colored {
                face: Face::DrawTwo,
                ..
            },
            Card::Colored {
                face: Face::DrawTwo,
                ..
            },
        ) => true,
        (Card::WildDrawFour, Card::WildDrawFour) => true,
        _ => false,
    }
}

/// A seed card flipped at game start must impose a color and no effect.
pub fn is_valid_seed(card: Card) -> bool {
    matches!(
        card,
        Card::Colored {
            face: Face::Number(_),
            ..
        }
    )
}
