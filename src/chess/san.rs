//! Standard Algebraic Notation (SAN) for cozy-chess boards.
//!
//! Decoding accepts the usual human variations: an optional `=` before the
//! promotion piece, trailing check/annotation marks, `0-0` for castling and a
//! missing `x` on captures.

use super::error::ChessError;
use cozy_chess::{Board, GameStatus, Move, Piece, Square};
use regex::Regex;
use std::sync::OnceLock;

fn san_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([NBRQK])?([a-h])?([1-8])?(x)?([a-h][1-8])(?:=?([NBRQ]))?$")
            .expect("SAN pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Castle {
    Kingside,
    Queenside,
}

/// A parsed SAN token, before it is matched against the legal moves.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SanToken {
    Castle(Castle),
    Normal {
        piece: Piece,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<Piece>,
    },
}

fn parse_token(san: &str) -> Result<SanToken, ChessError> {
    let cleaned = san.trim().trim_end_matches(&['+', '#', '!', '?'][..]);
    if cleaned.is_empty() {
        return Err(ChessError::InvalidNotation("empty move".to_string()));
    }

    match cleaned.replace('0', "O").as_str() {
        "O-O" => return Ok(SanToken::Castle(Castle::Kingside)),
        "O-O-O" => return Ok(SanToken::Castle(Castle::Queenside)),
        _ => {}
    }

    let caps = san_pattern().captures(cleaned).ok_or_else(|| {
        ChessError::InvalidNotation(format!(
            "'{}' is not algebraic notation (e.g. 'e4', 'Nf3', 'exd5', 'O-O', 'e8=Q')",
            san.trim()
        ))
    })?;

    let piece = caps
        .get(1)
        .and_then(|m| piece_from_letter(m.as_str()))
        .unwrap_or(Piece::Pawn);
    let from_file = caps.get(2).map(|m| m.as_str().as_bytes()[0] - b'a');
    let from_rank = caps.get(3).map(|m| m.as_str().as_bytes()[0] - b'1');
    let capture = caps.get(4).is_some();
    let to = caps
        .get(5)
        .and_then(|m| m.as_str().parse::<Square>().ok())
        .ok_or_else(|| ChessError::InvalidNotation(format!("bad destination in '{}'", san)))?;
    let promotion = caps.get(6).and_then(|m| piece_from_letter(m.as_str()));

    if promotion.is_some() && piece != Piece::Pawn {
        return Err(ChessError::InvalidNotation(format!(
            "only pawns can promote: '{}'",
            san.trim()
        )));
    }

    Ok(SanToken::Normal {
        piece,
        from_file,
        from_rank,
        capture,
        to,
        promotion,
    })
}

fn piece_from_letter(letter: &str) -> Option<Piece> {
    match letter {
        "N" => Some(Piece::Knight),
        "B" => Some(Piece::Bishop),
        "R" => Some(Piece::Rook),
        "Q" => Some(Piece::Queen),
        "K" => Some(Piece::King),
        _ => None,
    }
}

fn piece_letter(piece: Piece) -> Option<char> {
    match piece {
        Piece::Pawn => None,
        Piece::Knight => Some('N'),
        Piece::Bishop => Some('B'),
        Piece::Rook => Some('R'),
        Piece::Queen => Some('Q'),
        Piece::King => Some('K'),
    }
}

pub(crate) fn file_char(square: Square) -> char {
    (b'a' + square.file() as u8) as char
}

pub(crate) fn rank_char(square: Square) -> char {
    (b'1' + square.rank() as u8) as char
}

fn legal_moves(board: &Board) -> Vec<(Piece, Move)> {
    let mut moves = Vec::new();
    board.generate_moves(|piece_moves| {
        let piece = piece_moves.piece;
        moves.extend(piece_moves.into_iter().map(|mv| (piece, mv)));
        false
    });
    moves
}

/// cozy-chess encodes castling as the king capturing its own rook.
fn castle_kind(board: &Board, piece: Piece, mv: Move) -> Option<Castle> {
    if piece != Piece::King {
        return None;
    }
    let own = board.colors(board.side_to_move());
    if own.has(mv.to) && board.piece_on(mv.to) == Some(Piece::Rook) {
        if (mv.to.file() as u8) > (mv.from.file() as u8) {
            Some(Castle::Kingside)
        } else {
            Some(Castle::Queenside)
        }
    } else {
        None
    }
}

fn is_capture(board: &Board, piece: Piece, mv: Move) -> bool {
    let theirs = board.colors(!board.side_to_move());
    if theirs.has(mv.to) {
        return true;
    }
    // en passant: a pawn changing file onto an empty square
    piece == Piece::Pawn && mv.from.file() != mv.to.file()
}

/// Decode a SAN move against `board`. Exactly one legal move must match.
pub fn parse_san(board: &Board, san: &str) -> Result<Move, ChessError> {
    let token = parse_token(san)?;
    let san = san.trim();

    let candidates: Vec<Move> = match token {
        SanToken::Castle(side) => legal_moves(board)
            .into_iter()
            .filter(|&(piece, mv)| castle_kind(board, piece, mv) == Some(side))
            .map(|(_, mv)| mv)
            .collect(),
        SanToken::Normal {
            piece,
            from_file,
            from_rank,
            capture,
            to,
            promotion,
        } => {
            let matching: Vec<Move> = legal_moves(board)
                .into_iter()
                .filter(|&(p, mv)| {
                    p == piece
                        && mv.to == to
                        && castle_kind(board, p, mv).is_none()
                        && from_file.map_or(true, |f| mv.from.file() as u8 == f)
                        && from_rank.map_or(true, |r| mv.from.rank() as u8 == r)
                        && (!capture || is_capture(board, p, mv))
                })
                .map(|(_, mv)| mv)
                .collect();

            if promotion.is_none() && matching.iter().any(|mv| mv.promotion.is_some()) {
                return Err(ChessError::MissingPromotion(san.to_string()));
            }
            matching
                .into_iter()
                .filter(|mv| mv.promotion == promotion)
                .collect()
        }
    };

    match candidates.as_slice() {
        [] => Err(ChessError::NoLegalMove(san.to_string())),
        [mv] => Ok(*mv),
        many => Err(ChessError::AmbiguousMove {
            san: san.to_string(),
            candidates: many.len(),
        }),
    }
}

/// Format a legal move as SAN, including disambiguation and check marks.
pub fn format_san(board: &Board, mv: Move) -> String {
    let Some(piece) = board.piece_on(mv.from) else {
        return format!("{}{}", mv.from, mv.to);
    };

    let mut san = String::new();
    match castle_kind(board, piece, mv) {
        Some(Castle::Kingside) => san.push_str("O-O"),
        Some(Castle::Queenside) => san.push_str("O-O-O"),
        None => {
            let capture = is_capture(board, piece, mv);
            match piece_letter(piece) {
                Some(letter) => {
                    san.push(letter);
                    san.push_str(&disambiguation(board, piece, mv));
                }
                None if capture => san.push(file_char(mv.from)),
                None => {}
            }
            if capture {
                san.push('x');
            }
            san.push(file_char(mv.to));
            san.push(rank_char(mv.to));
            if let Some(letter) = mv.promotion.and_then(piece_letter) {
                san.push('=');
                san.push(letter);
            }
        }
    }

    let mut after = board.clone();
    after.play_unchecked(mv);
    if after.status() == GameStatus::Won {
        san.push('#');
    } else if !after.checkers().is_empty() {
        san.push('+');
    }
    san
}

fn disambiguation(board: &Board, piece: Piece, mv: Move) -> String {
    let rivals: Vec<Square> = legal_moves(board)
        .into_iter()
        .filter(|&(p, other)| p == piece && other.to == mv.to && other.from != mv.from)
        .map(|(_, other)| other.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
        file_char(mv.from).to_string()
    } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
        rank_char(mv.from).to_string()
    } else {
        format!("{}{}", file_char(mv.from), rank_char(mv.from))
    }
}
