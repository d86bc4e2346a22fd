//! Scripted player input and a rules engine with canned answers

use async_trait::async_trait;
use pawnwire::chess::{ChessError, Outcome, PieceStyle, RulesEngine, Side};
use pawnwire::game::MoveSource;
use std::collections::VecDeque;
use std::io;

/// Player input read from a fixed list of lines
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl MoveSource for ScriptedInput {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Accepts every text as a move but refuses to apply any of them
pub struct RefusingEngine {
    pub side_to_move: Side,
}

impl RulesEngine for RefusingEngine {
    type Move = String;

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    fn decode(&self, text: &str) -> Result<String, ChessError> {
        Ok(text.to_string())
    }

    fn apply(&mut self, mv: String) -> Result<(), ChessError> {
        Err(ChessError::IllegalMove(mv))
    }

    fn outcome(&self) -> Outcome {
        Outcome::Undecided
    }

    fn render(&self, _perspective: Side, _style: PieceStyle) -> String {
        String::new()
    }

    fn history(&self) -> Vec<String> {
        Vec::new()
    }
}
