use crate::chess::{Outcome, Side};
use std::fmt;

/// How the game ended, from the local player's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub side: Side,
    pub moves: Vec<String>,
}

impl GameSummary {
    pub fn new(outcome: Outcome, side: Side, moves: Vec<String>) -> Self {
        Self {
            outcome,
            side,
            moves,
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome.winner() == Some(self.side)
    }

    /// Text shown to the player once the game is over
    pub fn text(&self) -> String {
        match self.outcome {
            Outcome::Won(winner) if winner == self.side => "You won the game!".to_string(),
            Outcome::Won(winner) => format!("You've lost!\n{} has won the game.", winner),
            Outcome::Draw | Outcome::Undecided => "Game ended with a draw!".to_string(),
        }
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
