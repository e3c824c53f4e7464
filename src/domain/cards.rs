//! Core card types: Color, Face, Card.
//!
//! Cards are immutable value objects. Wild-family cards carry no color of
//! their own; the color they impose is chosen at play time and lives on the
//! game as `current_color`. The engine is color/face-only — sticker versus
//! text rendering is a transport concern.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Card {
    Colored { color: Color, face: Face },
    Wild,
    WildDrawFour,
}

impl Card {
    pub fn number(color: Color, n: u8) -> Self {
        debug_assert!(n <= 9, "number faces range 0..=9");
        Card::Colored {
            color,
            face: Face::Number(n),
        }
    }

    pub fn skip(color: Color) -> Self {
        Card::Colored {
            color,
            face: Face::Skip,
        }
    }

    pub fn reverse(color: Color) -> Self {
        Card::Colored {
            color,
            face: Face::Reverse,
        }
    }

    pub fn draw_two(color: Color) -> Self {
        Card::Colored {
            color,
            face: Face::DrawTwo,
        }
    }

    /// Concrete color, if the card has one.
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Colored { color, .. } => Some(*color),
            Card::Wild | Card::WildDrawFour => None,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild | Card::WildDrawFour)
    }

    /// Number of cards this play forces onto the next player (0 for
    /// anything that is not a forced-draw card).
    pub fn forced_draws(&self) -> u32 {
        match self {
            Card::Colored {
                face: Face::DrawTwo,
                ..
            } => 2,
            Card::WildDrawFour => 4,
            _ => 0,
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Card::Colored { color, face } => {
                let c = match color {
                    Color::Red => "r",
                    Color::Yellow => "y",
                    Color::Green => "g",
                    Color::Blue => "b",
                };
                match face {
                    Face::Number(n) => write!(f, "{c}{n}"),
                    Face::Skip => write!(f, "{c}_skip"),
                    Face::Reverse => write!(f, "{c}_reverse"),
                    Face::DrawTwo => write!(f, "{c}_draw"),
                }
            }
            Card::Wild => write!(f, "colorchooser"),
            Card::WildDrawFour => write!(f, "draw_four"),
        }
    }
}
