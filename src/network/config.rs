use super::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Stream transport flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Tcp,
    Tcp4,
    Tcp6,
}

impl Network {
    /// Whether a resolved address is usable for this transport
    pub fn accepts(&self, addr: &SocketAddr) -> bool {
        match self {
            Network::Tcp => true,
            Network::Tcp4 => addr.is_ipv4(),
            Network::Tcp6 => addr.is_ipv6(),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Tcp => write!(f, "tcp"),
            Network::Tcp4 => write!(f, "tcp4"),
            Network::Tcp6 => write!(f, "tcp6"),
        }
    }
}

impl FromStr for Network {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Network::Tcp),
            "tcp4" => Ok(Network::Tcp4),
            "tcp6" => Ok(Network::Tcp6),
            other => Err(SessionError::UnsupportedTransport(other.to_string())),
        }
    }
}

/// Connection settings, fixed for the life of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub network: Network,
    pub host: String,
    pub port: u16,
    /// Bound on the initial dial and on a whole reconnect sequence
    pub timeout: Duration,
    /// Pause between reconnect attempts
    pub interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: Network::Tcp,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl SessionConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network: '{}', address: '{}'", self.network, self.address())
    }
}
