use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("Invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("No legal move matches '{0}'")]
    NoLegalMove(String),

    #[error("Ambiguous move '{san}': {candidates} legal moves match")]
    AmbiguousMove { san: String, candidates: usize },

    #[error("Missing promotion piece for '{0}'")]
    MissingPromotion(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}
