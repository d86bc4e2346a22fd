use std::process::{Command, Stdio};
use tracing::debug;

/// Clears the player's display between turns
pub trait Terminal {
    fn clear(&mut self);
}

/// Runs the platform's clear-screen command.
///
/// A failure to clear is only logged; the board is redrawn either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearCommand;

impl ClearCommand {
    #[cfg(windows)]
    fn command() -> Command {
        let mut cmd = Command::new("cmd");
        cmd.args(["/c", "cls"]);
        cmd
    }

    #[cfg(not(windows))]
    fn command() -> Command {
        Command::new("clear")
    }
}

impl Terminal for ClearCommand {
    fn clear(&mut self) {
        let status = Self::command().stdout(Stdio::inherit()).status();
        if let Err(e) = status {
            debug!(error = %e, "failed to clear terminal");
        }
    }
}

/// Leaves the display alone (`--no-clear`, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTerminal;

impl Terminal for NoopTerminal {
    fn clear(&mut self) {}
}

/// The terminal for this platform, or a no-op when clearing is disabled
pub fn platform_terminal(clear_screen: bool) -> Box<dyn Terminal + Send> {
    if clear_screen {
        Box::new(ClearCommand)
    } else {
        Box::new(NoopTerminal)
    }
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn clear(&mut self) {
        (**self).clear()
    }
}
