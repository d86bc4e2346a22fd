use super::config::{Config, ConfigError};
use crate::game::MoveSource;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

const RULES: &str = "

A few rules to keep in mind:
 - moves should be entered in algebraic notation (e4, Nf3, exd5, O-O, e8=Q)
 - your own pieces are always drawn at the bottom of the board
 - a move the board does not accept is simply asked for again

If you're ready to begin, simply press [ENTER]
";

/// Greet the player, optionally take a server address, and wait for them
/// to be ready.
///
/// Answers given here override every other configuration layer. An empty
/// answer keeps the configured value.
pub async fn welcome<I, W>(input: &mut I, out: &mut W, config: &mut Config) -> Result<()>
where
    I: MoveSource,
    W: Write,
{
    write!(out, "Welcome to pawnwire, a simple chess client!\n\n")?;
    let answer = ask(
        input,
        out,
        "Do you want to setup the connection details? This includes host and port address? [y/n]: ",
    )
    .await?;

    if answer.eq_ignore_ascii_case("y") {
        let host = ask(input, out, &format!("Please type in host name [{}]: ", config.host)).await?;
        if !host.is_empty() {
            config.host = host;
        }

        let port = ask(input, out, &format!("Please type in host port [{}]: ", config.port)).await?;
        if !port.is_empty() {
            config.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: "port".to_string(),
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        config.validate()?;

        writeln!(out, "server address set to: {}:{}", config.host, config.port)?;
        info!(host = %config.host, port = config.port, "connection details set interactively");
    }

    write!(out, "{}", RULES)?;
    out.flush()?;
    input
        .next_line()
        .await
        .context("Failed to read from standard input")?;

    writeln!(out, "The server is finding a worthy opponent for you right now!")?;
    out.flush()?;
    Ok(())
}

async fn ask<I, W>(input: &mut I, out: &mut W, question: &str) -> Result<String>
where
    I: MoveSource,
    W: Write,
{
    write!(out, "{}", question)?;
    out.flush()?;
    let line = input
        .next_line()
        .await
        .context("Failed to read from standard input")?
        .unwrap_or_default();
    Ok(line.trim().to_string())
}
