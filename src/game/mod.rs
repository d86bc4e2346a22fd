pub mod error;
pub mod exchange;
pub mod input;
pub mod summary;
pub mod terminal;

pub use error::ExchangeError;
pub use exchange::{initial_state, TurnExchange, TurnState};
pub use input::{MoveSource, StdinLines};
pub use summary::GameSummary;
pub use terminal::{platform_terminal, ClearCommand, NoopTerminal, Terminal};
