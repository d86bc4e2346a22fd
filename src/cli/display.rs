use crate::chess::PieceStyle;
use crate::game::GameSummary;
use std::io::{self, Write};

/// Check if terminal supports Unicode chess pieces
pub fn supports_unicode() -> bool {
    // Simple heuristic: check if TERM names a modern terminal
    std::env::var("TERM")
        .map(|term| {
            term.contains("xterm")
                || term.contains("screen")
                || term.contains("tmux")
                || term == "alacritty"
                || term == "kitty"
        })
        .unwrap_or(false)
        || std::env::var("TERM_PROGRAM").is_ok() // macOS Terminal, iTerm2, etc.
        || cfg!(windows)
}

/// Glyphs to draw with: letters when asked for, or when the terminal
/// probably cannot show chess symbols
pub fn piece_style(force_ascii: bool) -> PieceStyle {
    if force_ascii || !supports_unicode() {
        PieceStyle::Ascii
    } else {
        PieceStyle::Unicode
    }
}

/// Write the moves of a game as a numbered two-column table
pub fn write_move_history(out: &mut impl Write, history: &[String]) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "No moves were played.");
    }

    writeln!(out, "\nMove History")?;
    writeln!(out, "┌──────┬─────────┬─────────┐")?;
    writeln!(out, "│ Move │  White  │  Black  │")?;
    writeln!(out, "├──────┼─────────┼─────────┤")?;

    for (i, move_pair) in history.chunks(2).enumerate() {
        let white_move = move_pair.first().map(|s| s.as_str()).unwrap_or("-");
        let black_move = move_pair.get(1).map(|s| s.as_str()).unwrap_or("-");
        writeln!(
            out,
            "│ {:>4} │ {:^7} │ {:^7} │",
            i + 1,
            white_move,
            black_move
        )?;
    }

    writeln!(out, "└──────┴─────────┴─────────┘")
}

/// Outcome text followed by the move table
pub fn write_summary(out: &mut impl Write, summary: &GameSummary) -> io::Result<()> {
    writeln!(out, "{}", summary)?;
    write_move_history(out, &summary.moves)?;
    out.flush()
}
