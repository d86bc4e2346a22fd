use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two roles a client is assigned at handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// The opposing side
    pub fn opposite(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Map a coordinator side label. Only the literal `WHITE` selects White.
    pub fn from_label(label: &str) -> Side {
        if label == "WHITE" {
            Side::White
        } else {
            Side::Black
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

impl From<cozy_chess::Color> for Side {
    fn from(color: cozy_chess::Color) -> Self {
        match color {
            cozy_chess::Color::White => Side::White,
            cozy_chess::Color::Black => Side::Black,
        }
    }
}

impl From<Side> for cozy_chess::Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => cozy_chess::Color::White,
            Side::Black => cozy_chess::Color::Black,
        }
    }
}

/// Terminal result of a game, or `Undecided` while it is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Undecided,
    Won(Side),
    Draw,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Won(side) => Some(*side),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Undecided => write!(f, "undecided"),
            Outcome::Won(side) => write!(f, "{} won", side),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}
