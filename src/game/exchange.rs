use super::error::ExchangeError;
use super::input::MoveSource;
use super::summary::GameSummary;
use super::terminal::Terminal;
use crate::chess::{PieceStyle, RulesEngine, Side};
use crate::messages::{ClientId, Event, Message};
use crate::network::{Dialer, Handshake, Session};
use std::io::Write;
use tracing::{debug, error, info, info_span, Span};

const MOVE_PROMPT: &str = "Type in your move: ";
const INVALID_MOVE_PROMPT: &str = "please provide a valid move using algebraic notation: ";

/// Where the game loop stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingLocalMove,
    AwaitingRemoteMove,
    Concluded,
}

/// State a game starts in for the player holding `side`
pub fn initial_state<E: RulesEngine>(engine: &E, side: Side) -> TurnState {
    if engine.outcome().is_decided() {
        TurnState::Concluded
    } else if engine.side_to_move() == side {
        TurnState::AwaitingLocalMove
    } else {
        TurnState::AwaitingRemoteMove
    }
}

/// Alternates local and remote turns until the rules engine reports an
/// outcome, then tells the coordinator the game is over.
pub struct TurnExchange<'s, D, E, I, T, W>
where
    D: Dialer,
    E: RulesEngine,
    I: MoveSource,
    T: Terminal,
    W: Write,
{
    session: &'s mut Session<D>,
    engine: E,
    input: I,
    terminal: T,
    out: W,
    identity: ClientId,
    side: Side,
    style: PieceStyle,
    state: TurnState,
    last_move: Option<String>,
    span: Span,
}

impl<'s, D, E, I, T, W> TurnExchange<'s, D, E, I, T, W>
where
    D: Dialer,
    E: RulesEngine,
    I: MoveSource,
    T: Terminal,
    W: Write,
{
    pub fn new(
        session: &'s mut Session<D>,
        handshake: Handshake,
        engine: E,
        input: I,
        terminal: T,
        out: W,
    ) -> Self {
        let state = initial_state(&engine, handshake.side);
        let span = info_span!("exchange", identity = %handshake.identity, side = %handshake.side);
        Self {
            session,
            engine,
            input,
            terminal,
            out,
            identity: handshake.identity,
            side: handshake.side,
            style: PieceStyle::default(),
            state,
            last_move: None,
            span,
        }
    }

    /// Piece glyphs used when drawing the board
    pub fn with_style(mut self, style: PieceStyle) -> Self {
        self.style = style;
        self
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// The opponent's most recent move, as received
    pub fn last_move(&self) -> Option<&str> {
        self.last_move.as_deref()
    }

    /// Play one turn and return the state that follows it
    pub async fn step(&mut self) -> Result<TurnState, ExchangeError> {
        if self.state != TurnState::Concluded && self.engine.outcome().is_decided() {
            self.state = TurnState::Concluded;
        }

        match self.state {
            TurnState::AwaitingLocalMove => self.local_turn().await?,
            TurnState::AwaitingRemoteMove => self.remote_turn().await?,
            TurnState::Concluded => return Ok(TurnState::Concluded),
        }

        self.state = initial_state(&self.engine, self.side);
        Ok(self.state)
    }

    /// Drive the game to its end, send `END` and summarise
    pub async fn run(mut self) -> Result<GameSummary, ExchangeError> {
        while self.step().await? != TurnState::Concluded {}
        self.conclude().await
    }

    async fn local_turn(&mut self) -> Result<(), ExchangeError> {
        self.terminal.clear();
        let board = self.engine.render(self.side, self.style);
        let other = self.side.opposite();
        let out = &mut self.out;
        writeln!(out, "{}", board).map_err(ExchangeError::Output)?;
        writeln!(out, "It's your turn ({})", self.side).map_err(ExchangeError::Output)?;
        if let Some(mv) = &self.last_move {
            writeln!(out, "{}'s move was: {}", other, mv).map_err(ExchangeError::Output)?;
        }
        self.prompt(MOVE_PROMPT)?;

        loop {
            let line = self
                .input
                .next_line()
                .await
                .map_err(ExchangeError::Input)?
                .ok_or(ExchangeError::InputClosed)?;
            let text = line.trim();

            match self.engine.decode(text) {
                Ok(mv) => {
                    let message = Message::chess_move(self.identity.clone(), text);
                    self.session.send(&message).await?;
                    self.apply(text, mv)?;
                    info!(parent: &self.span, mv = text, "played local move");
                    return Ok(());
                }
                Err(e) => {
                    debug!(parent: &self.span, input = text, error = %e, "rejected local input");
                    self.prompt(INVALID_MOVE_PROMPT)?;
                }
            }
        }
    }

    async fn remote_turn(&mut self) -> Result<(), ExchangeError> {
        self.terminal.clear();
        let board = self.engine.render(self.side, self.style);
        let other = self.side.opposite();
        writeln!(self.out, "{}", board).map_err(ExchangeError::Output)?;
        writeln!(self.out, "It's your opponents turn ({})", other).map_err(ExchangeError::Output)?;
        self.out.flush().map_err(ExchangeError::Output)?;

        let message = self.session.receive().await?;
        let text = message.trim();
        let mv = self.engine.decode(text).map_err(|source| {
            error!(parent: &self.span, msg = %message, error = %source, "opponent sent an invalid move");
            ExchangeError::ProtocolViolation {
                message: message.clone(),
                source,
            }
        })?;
        self.apply(text, mv)?;

        writeln!(self.out, "{} moved to {}", other, text).map_err(ExchangeError::Output)?;
        info!(parent: &self.span, mv = text, "received remote move");
        self.last_move = Some(text.to_string());
        Ok(())
    }

    fn apply(&mut self, text: &str, mv: E::Move) -> Result<(), ExchangeError> {
        self.engine.apply(mv.clone()).map_err(|source| {
            error!(parent: &self.span, text, mv = ?mv, error = %source, "invalid move registered");
            ExchangeError::RejectedDecodedMove {
                text: text.to_string(),
                source,
            }
        })
    }

    fn prompt(&mut self, text: &str) -> Result<(), ExchangeError> {
        write!(self.out, "{}", text).map_err(ExchangeError::Output)?;
        self.out.flush().map_err(ExchangeError::Output)
    }

    async fn conclude(mut self) -> Result<GameSummary, ExchangeError> {
        self.session
            .send(&Message::event(self.identity.clone(), Event::End))
            .await?;

        let outcome = self.engine.outcome();
        info!(parent: &self.span, %outcome, "game over");

        self.terminal.clear();
        let board = self.engine.render(self.side, self.style);
        writeln!(self.out, "{}", board).map_err(ExchangeError::Output)?;
        Ok(GameSummary::new(outcome, self.side, self.engine.history()))
    }
}
