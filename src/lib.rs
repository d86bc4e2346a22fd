pub mod chess;
pub mod cli;
pub mod game;
pub mod messages;
pub mod network;

// Re-export key types for easy testing
pub use chess::{Game, RulesEngine, Side};
pub use game::{GameSummary, TurnExchange, TurnState};
pub use messages::{ClientId, Message};
pub use network::{Handshake, Session, SessionConfig};
