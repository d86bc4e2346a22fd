use super::side::Side;
use cozy_chess::{Board, Color, File, Piece, Rank, Square};

/// Piece glyph set used when drawing the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceStyle {
    #[default]
    Unicode,
    Ascii,
}

/// Draw the board from `perspective`: White sees rank 1 at the bottom,
/// Black sees rank 8 at the bottom with the files reversed.
pub fn draw_board(board: &Board, perspective: Side, style: PieceStyle) -> String {
    let mut out = String::new();

    let ranks: Vec<usize> = match perspective {
        Side::White => (0..8).rev().collect(),
        Side::Black => (0..8).collect(),
    };
    let files: Vec<usize> = match perspective {
        Side::White => (0..8).collect(),
        Side::Black => (0..8).rev().collect(),
    };

    out.push_str("  ┌─┬─┬─┬─┬─┬─┬─┬─┐\n");
    for (row, &rank) in ranks.iter().enumerate() {
        let rank_number = rank + 1;
        out.push_str(&format!("{} │", rank_number));
        for &file in &files {
            let square = Square::new(File::index(file), Rank::index(rank));
            let symbol = match (board.piece_on(square), board.color_on(square)) {
                (Some(piece), Some(color)) => piece_symbol(piece, color, style),
                _ => ' ',
            };
            out.push(symbol);
            out.push('│');
        }
        out.push_str(&format!(" {}\n", rank_number));

        if row < 7 {
            out.push_str("  ├─┼─┼─┼─┼─┼─┼─┼─┤\n");
        }
    }
    out.push_str("  └─┴─┴─┴─┴─┴─┴─┴─┘\n");

    let labels: Vec<String> = files
        .iter()
        .map(|&file| ((b'a' + file as u8) as char).to_string())
        .collect();
    out.push_str(&format!("   {}\n", labels.join(" ")));

    out
}

fn piece_symbol(piece: Piece, color: Color, style: PieceStyle) -> char {
    match style {
        PieceStyle::Unicode => match (color, piece) {
            (Color::White, Piece::King) => '♔',
            (Color::White, Piece::Queen) => '♕',
            (Color::White, Piece::Rook) => '♖',
            (Color::White, Piece::Bishop) => '♗',
            (Color::White, Piece::Knight) => '♘',
            (Color::White, Piece::Pawn) => '♙',
            (Color::Black, Piece::King) => '♚',
            (Color::Black, Piece::Queen) => '♛',
            (Color::Black, Piece::Rook) => '♜',
            (Color::Black, Piece::Bishop) => '♝',
            (Color::Black, Piece::Knight) => '♞',
            (Color::Black, Piece::Pawn) => '♟',
        },
        PieceStyle::Ascii => {
            let letter = match piece {
                Piece::Pawn => 'p',
                Piece::Knight => 'n',
                Piece::Bishop => 'b',
                Piece::Rook => 'r',
                Piece::Queen => 'q',
                Piece::King => 'k',
            };
            match color {
                Color::White => letter.to_ascii_uppercase(),
                Color::Black => letter,
            }
        }
    }
}
