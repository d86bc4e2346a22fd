use super::board::{draw_board, PieceStyle};
use super::engine::RulesEngine;
use super::error::ChessError;
use super::san::{format_san, parse_san};
use super::side::{Outcome, Side};
use cozy_chess::{Board, Move, Piece};

/// Positions repeated this many times end the game automatically.
const REPETITION_LIMIT: usize = 5;
/// Plies without a capture or pawn move after which the game is drawn.
const MOVE_RULE_PLIES: u16 = 150;

/// Game state wrapper around a cozy-chess board
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: Vec<String>,
    positions: Vec<u64>,
    /// cozy-chess stops its halfmove clock at 100, so the count that drives
    /// the 75-move rule is kept here.
    quiet_plies: u16,
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        let board = Board::default();
        let positions = vec![board.hash()];
        Self {
            board,
            history: Vec::new(),
            positions,
            quiet_plies: 0,
        }
    }

    /// Create a game from a FEN string
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let board: Board = fen
            .parse()
            .map_err(|e| ChessError::InvalidPosition(format!("{:?} in '{}'", e, fen)))?;
        let positions = vec![board.hash()];
        let quiet_plies = board.halfmove_clock().into();
        Ok(Self {
            board,
            history: Vec::new(),
            positions,
            quiet_plies,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_fen(&self) -> String {
        self.board.to_string()
    }

    fn resets_move_rule(&self, mv: Move) -> bool {
        let opponent = self.board.colors(!self.board.side_to_move());
        self.board.piece_on(mv.from) == Some(Piece::Pawn) || opponent.has(mv.to)
    }

    fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|moves| !moves.to.is_empty())
    }

    fn repetitions(&self) -> usize {
        let current = self.board.hash();
        self.positions.iter().filter(|&&hash| hash == current).count()
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or bishops that all stand on squares of one colour.
    fn insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }

        let knights = board.pieces(Piece::Knight).len();
        let bishops = board.pieces(Piece::Bishop);
        if knights + bishops.len() <= 1 {
            return true;
        }
        if knights > 0 {
            return false;
        }

        let mut light = 0;
        let mut dark = 0;
        for square in bishops {
            if (square.file() as u8 + square.rank() as u8) % 2 == 1 {
                light += 1;
            } else {
                dark += 1;
            }
        }
        light == 0 || dark == 0
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for Game {
    type Move = Move;

    fn side_to_move(&self) -> Side {
        self.board.side_to_move().into()
    }

    fn decode(&self, text: &str) -> Result<Move, ChessError> {
        parse_san(&self.board, text)
    }

    fn apply(&mut self, mv: Move) -> Result<(), ChessError> {
        if !self.board.is_legal(mv) {
            return Err(ChessError::IllegalMove(format!(
                "{} is not legal in {}",
                mv,
                self.to_fen()
            )));
        }

        let san = format_san(&self.board, mv);
        self.quiet_plies = if self.resets_move_rule(mv) {
            0
        } else {
            self.quiet_plies.saturating_add(1)
        };
        self.board.play_unchecked(mv);
        self.history.push(san);
        self.positions.push(self.board.hash());
        Ok(())
    }

    fn outcome(&self) -> Outcome {
        if !self.has_legal_moves() {
            return if self.board.checkers().is_empty() {
                Outcome::Draw
            } else {
                Outcome::Won(self.side_to_move().opposite())
            };
        }
        if self.quiet_plies >= MOVE_RULE_PLIES
            || self.repetitions() >= REPETITION_LIMIT
            || self.insufficient_material()
        {
            return Outcome::Draw;
        }
        Outcome::Undecided
    }

    fn render(&self, perspective: Side, style: PieceStyle) -> String {
        draw_board(&self.board, perspective, style)
    }

    fn history(&self) -> Vec<String> {
        self.history.clone()
    }
}
