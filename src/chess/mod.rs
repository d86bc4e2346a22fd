// Re-export all public items
pub use self::board::{draw_board, PieceStyle};
pub use self::engine::RulesEngine;
pub use self::error::ChessError;
pub use self::game::Game;
pub use self::san::{format_san, parse_san};
pub use self::side::{Outcome, Side};

mod board;
mod engine;
mod error;
mod game;
mod san;
mod side;
