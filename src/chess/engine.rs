use super::board::PieceStyle;
use super::error::ChessError;
use super::side::{Outcome, Side};
use std::fmt::Debug;

/// Game rules as seen by the turn exchange.
///
/// The exchange never interprets moves itself: it asks the engine to decode
/// text against the current position, applies what was decoded and polls the
/// outcome before every turn.
pub trait RulesEngine {
    type Move: Clone + Debug;

    /// Side whose turn it is in the current position
    fn side_to_move(&self) -> Side;

    /// Decode a textual move against the current position
    fn decode(&self, text: &str) -> Result<Self::Move, ChessError>;

    /// Apply a move. Rejects moves that are illegal in the current position.
    fn apply(&mut self, mv: Self::Move) -> Result<(), ChessError>;

    fn outcome(&self) -> Outcome;

    /// Render the position for display from `perspective`
    fn render(&self, perspective: Side, style: PieceStyle) -> String;

    /// Moves played so far, in the engine's textual notation
    fn history(&self) -> Vec<String>;
}
