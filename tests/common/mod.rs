//! Common test utilities shared by the integration tests
//!
//! Scripted streams and a dialer that hands them out stand in for the
//! session server; scripted input and engines stand in for the player and
//! the rules.

#![allow(dead_code)]

pub mod flaky_tcp;
pub mod mock_dialer;
pub mod mock_streams;
pub mod scripted;

use pawnwire::network::{Network, SessionConfig};
use std::time::Duration;

/// Session settings with timings short enough for tests
pub fn fast_config() -> SessionConfig {
    SessionConfig {
        network: Network::Tcp,
        host: "127.0.0.1".to_string(),
        port: 1234,
        timeout: Duration::from_millis(300),
        interval: Duration::from_millis(20),
    }
}
