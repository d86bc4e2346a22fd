pub mod config;
pub mod dialer;
pub mod error;
pub mod handshake;
pub mod session;

pub use config::{Network, SessionConfig};
pub use dialer::{Dialer, TcpDialer};
pub use error::{HandshakeError, SessionError};
pub use handshake::{negotiate, parse_handshake_reply, Handshake};
pub use session::{Session, SessionStats};
