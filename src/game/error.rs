use crate::chess::ChessError;
use crate::network::SessionError;
use std::io;
use thiserror::Error;

/// Failures that end the game loop
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to read move input: {0}")]
    Input(#[source] io::Error),

    #[error("Move input closed before the game ended")]
    InputClosed,

    #[error("Failed to write to the display: {0}")]
    Output(#[source] io::Error),

    #[error("Opponent sent an invalid move '{message}': {source}")]
    ProtocolViolation {
        message: String,
        #[source]
        source: ChessError,
    },

    #[error("Decoded move '{text}' was rejected by the rules engine: {source}")]
    RejectedDecodedMove {
        text: String,
        #[source]
        source: ChessError,
    },
}
