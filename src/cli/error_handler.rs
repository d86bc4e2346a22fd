use super::config::ConfigError;
use crate::chess::ChessError;
use crate::game::ExchangeError;
use crate::messages::WireProtocolError;
use crate::network::{HandshakeError, SessionError};
use std::fmt;

/// An error as shown to the player: what went wrong and what to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    pub message: String,
    pub suggestion: Option<String>,
}

impl UserError {
    fn new(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suggestion {
            Some(suggestion) => write!(f, "❌ {}\n   💡 Suggestion: {}", self.message, suggestion),
            None => write!(f, "❌ {}", self.message),
        }
    }
}

/// Turn an application error into a player-facing message.
///
/// The first error in the chain this crate knows about decides the
/// suggestion; anything else is reported verbatim.
pub fn describe(error: &anyhow::Error) -> UserError {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<ExchangeError>() {
            return format_exchange_error(e);
        }
        if let Some(e) = cause.downcast_ref::<HandshakeError>() {
            return format_handshake_error(e);
        }
        if let Some(e) = cause.downcast_ref::<SessionError>() {
            return format_session_error(e);
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return format_config_error(e);
        }
    }

    UserError {
        message: format!("{:#}", error),
        suggestion: None,
    }
}

fn format_session_error(error: &SessionError) -> UserError {
    match error {
        SessionError::AddressResolution { config, .. } => UserError::new(
            format!("🌐 Could not resolve the server address ({})", config),
            "Check the host name and port (--host/--port, SERVER_HOST/SERVER_PORT).",
        ),
        SessionError::UnsupportedTransport(network) => UserError::new(
            format!("🌐 Unsupported transport '{}'", network),
            "Use tcp, tcp4 or tcp6.",
        ),
        SessionError::Dial { addr, source } => UserError::new(
            format!("🌐 Could not connect to {}: {}", addr, source),
            "Make sure the session server is running and reachable.",
        ),
        SessionError::ReconnectTimeout {
            addr,
            timeout,
            attempts,
            ..
        } => UserError::new(
            format!(
                "⏱️  Lost the connection to {} and could not reconnect within {:?} ({} attempts)",
                addr, timeout, attempts
            ),
            "The server may be down. Raise --timeout to wait longer next time.",
        ),
        SessionError::FatalWrite { addr, .. } => UserError::new(
            format!("📡 Sending to {} failed part way through a message", addr),
            "The connection broke mid-message and the game cannot continue. Start a new game.",
        ),
        SessionError::FatalRead { addr, source } => match source {
            WireProtocolError::ConnectionClosed => UserError::new(
                format!("📡 {} closed the connection", addr),
                "Your opponent or the server may have left the game.",
            ),
            _ => UserError::new(
                format!("📡 Failed to read from {}: {}", addr, source),
                "Check your network connection.",
            ),
        },
        SessionError::InvalidMessage { message, source } => UserError::new(
            format!("📡 Message '{}' cannot be sent: {}", message, source),
            "This is a bug; please report it.",
        ),
        SessionError::NotConnected(addr) => UserError::new(
            format!("🌐 Not connected to {}", addr),
            "This is a bug; please report it.",
        ),
    }
}

fn format_handshake_error(error: &HandshakeError) -> UserError {
    match error {
        HandshakeError::Session(e) => format_session_error(e),
        HandshakeError::MissingSeparator { reply } | HandshakeError::EmptyIdentity { reply } => {
            UserError::new(
                format!("🤝 The server answered the handshake with '{}'", reply),
                "The server speaks a different protocol version. Check that you are connecting to a chess session server.",
            )
        }
    }
}

fn format_exchange_error(error: &ExchangeError) -> UserError {
    match error {
        ExchangeError::Session(e) => format_session_error(e),
        ExchangeError::Input(e) => UserError::new(
            format!("⌨️  Failed to read your move: {}", e),
            "Run the client in an interactive terminal.",
        ),
        ExchangeError::InputClosed => UserError::new(
            "⌨️  Input closed before the game was over",
            "Run the client in an interactive terminal.",
        ),
        ExchangeError::Output(e) => UserError::new(
            format!("🖥️  Failed to draw the game: {}", e),
            "Check that standard output is still open.",
        ),
        ExchangeError::ProtocolViolation { message, source } => UserError::new(
            format!(
                "♟️  Your opponent sent an invalid move: '{}' ({})",
                message.trim(),
                format_chess_error(source)
            ),
            "The opponent's client is misbehaving; the game has been abandoned.",
        ),
        ExchangeError::RejectedDecodedMove { text, source } => UserError::new(
            format!("♟️  Move '{}' could not be played: {}", text, source),
            "This is a bug; please report it with the move history.",
        ),
    }
}

fn format_config_error(error: &ConfigError) -> UserError {
    match error {
        ConfigError::Read { path, .. } => UserError::new(
            format!("⚙️  Cannot read configuration file {}", path.display()),
            "Check the --config path and its permissions.",
        ),
        ConfigError::Parse { path, source } => UserError::new(
            format!("⚙️  Configuration file {} is invalid: {}", path.display(), source),
            "Run 'pawnwire config' to see the expected format.",
        ),
        ConfigError::InvalidValue { key, value, reason } => UserError::new(
            format!("⚙️  Invalid {}: '{}' ({})", key, value, reason),
            "Durations look like 500ms, 30s, 2m or 1h; ports are 1-65535.",
        ),
        ConfigError::Serialize(e) => UserError::new(
            format!("⚙️  Cannot print configuration: {}", e),
            "This is a bug; please report it.",
        ),
    }
}

fn format_chess_error(error: &ChessError) -> String {
    match error {
        ChessError::NoLegalMove(san) => format!("no legal move matches '{}'", san),
        ChessError::AmbiguousMove { san, candidates } => {
            format!("'{}' matches {} legal moves", san, candidates)
        }
        ChessError::MissingPromotion(san) => format!("'{}' needs a promotion piece", san),
        other => other.to_string(),
    }
}

/// Print an error to stderr in its player-facing form
pub fn display_error(error: &anyhow::Error) {
    eprintln!("\n{}", describe(error));
}
