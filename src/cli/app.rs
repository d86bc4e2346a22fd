use super::config::Config;
use super::display::{piece_style, write_summary};
use super::welcome::welcome;
use crate::chess::Game;
use crate::game::{platform_terminal, GameSummary, MoveSource, StdinLines, TurnExchange};
use crate::network::{negotiate, Dialer, Session, TcpDialer};
use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::{debug, info};

/// One run of the client: welcome, connect, handshake, play
pub struct App<D: Dialer = TcpDialer> {
    pub config: Config,
    dialer: D,
    skip_welcome: bool,
}

impl App<TcpDialer> {
    pub fn new(config: Config) -> Self {
        Self::with_dialer(config, TcpDialer)
    }
}

impl<D: Dialer> App<D> {
    pub fn with_dialer(config: Config, dialer: D) -> Self {
        Self {
            config,
            dialer,
            skip_welcome: false,
        }
    }

    /// Connect straight away without the interactive welcome
    pub fn skip_welcome(mut self, skip: bool) -> Self {
        self.skip_welcome = skip;
        self
    }

    /// Play one game on the terminal
    pub async fn run(self) -> Result<GameSummary> {
        let mut input = StdinLines::new();
        let mut out = io::stdout();
        self.play(&mut input, &mut out).await
    }

    /// Play one game reading moves from `input` and drawing to `out`
    pub async fn play<I, W>(mut self, input: &mut I, out: &mut W) -> Result<GameSummary>
    where
        I: MoveSource,
        W: Write,
    {
        if !self.skip_welcome {
            welcome(input, out, &mut self.config).await?;
        }

        let session_config = self.config.session_config();
        info!("connecting to the session server ({})", session_config);
        let mut session = Session::connect(session_config, self.dialer)
            .await
            .context("Failed to connect to the session server")?;

        let handshake = negotiate(&mut session)
            .await
            .context("Handshake with the session server failed")?;
        writeln!(
            out,
            "I got my identity: {} and side: {}!",
            handshake.identity, handshake.side
        )?;

        let summary = TurnExchange::new(
            &mut session,
            handshake,
            Game::new(),
            &mut *input,
            platform_terminal(self.config.clear_screen),
            &mut *out,
        )
        .with_style(piece_style(self.config.ascii))
        .run()
        .await
        .context("Game aborted")?;

        write_summary(out, &summary)?;
        debug!(stats = ?session.stats(), "session closed");
        Ok(summary)
    }
}
