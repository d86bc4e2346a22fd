use super::config::parse_duration;
use crate::network::Network;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pawnwire")]
#[command(version)]
#[command(about = "A terminal chess client for playing against an opponent through a session server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub args: PlayArgs,
}

impl Cli {
    /// The subcommand to run; `play` when none is given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Play)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Connect to the session server and play a game (default)
    ///
    /// Examples:
    ///   pawnwire
    ///   pawnwire play --host chess.example --port 1234
    ///   SERVER_HOST=10.0.0.2 pawnwire play --skip-welcome
    Play,

    /// Print the effective configuration as TOML
    ///
    /// Shows the result of layering the config file, environment variables
    /// and flags, without connecting anywhere.
    Config,
}

/// Connection and display settings shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct PlayArgs {
    /// Session server host name or address
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Session server port
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Transport: tcp, tcp4 or tcp6
    #[arg(long, global = true)]
    pub network: Option<Network>,

    /// Bound on connecting and on a whole reconnect sequence (e.g. 30s, 2m)
    #[arg(long, global = true, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Pause between reconnect attempts (e.g. 5s, 500ms)
    #[arg(long, global = true, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Configuration file to read instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Do not clear the terminal between turns
    #[arg(long, global = true)]
    pub no_clear: bool,

    /// Skip the interactive welcome and connect straight away
    #[arg(long, global = true)]
    pub skip_welcome: bool,

    /// Draw pieces as letters instead of Unicode symbols
    #[arg(long, global = true)]
    pub ascii: bool,
}
