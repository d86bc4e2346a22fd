pub mod app;
pub mod commands;
pub mod config;
pub mod display;
pub mod error_handler;
pub mod logging;
pub mod welcome;

pub use app::App;
pub use commands::{Cli, Commands, PlayArgs};
pub use config::{format_duration, parse_duration, Config, ConfigError};
pub use display::{piece_style, supports_unicode, write_move_history, write_summary};
pub use error_handler::{describe, display_error, UserError};
pub use logging::build_subscriber;
pub use welcome::welcome;
