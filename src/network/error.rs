use crate::messages::WireProtocolError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Transport session failures. Every variant is fatal to the client.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to resolve address ({config}): {source}")]
    AddressResolution {
        config: String,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported transport '{0}', expected tcp, tcp4 or tcp6")]
    UnsupportedTransport(String),

    #[error("Failed to establish connection to {addr}: {source}")]
    Dial {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Reconnect to {addr} timed out after {timeout:?} ({attempts} attempts, last error: {last_error})")]
    ReconnectTimeout {
        addr: SocketAddr,
        timeout: Duration,
        attempts: u32,
        last_error: String,
    },

    #[error("Fatal write error to {addr} after {written} of {total} bytes: {source}")]
    FatalWrite {
        addr: SocketAddr,
        written: usize,
        total: usize,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read response message from {addr}: {source}")]
    FatalRead {
        addr: SocketAddr,
        #[source]
        source: WireProtocolError,
    },

    #[error("Message '{message}' rejected: {source}")]
    InvalidMessage {
        message: String,
        #[source]
        source: WireProtocolError,
    },

    #[error("Session is not connected to {0}")]
    NotConnected(SocketAddr),
}

/// Handshake failures: a broken transport or an unparseable reply.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("Handshake reply '{reply}' has no ':' separator, expected <identity>:<SIDE>")]
    MissingSeparator { reply: String },

    #[error("Handshake reply '{reply}' carries an empty identity")]
    EmptyIdentity { reply: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}
