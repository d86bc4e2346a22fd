use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented source of the local player's moves
#[async_trait]
pub trait MoveSource: Send {
    /// Next line of input, or `None` once the source is exhausted
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads moves from standard input
pub struct StdinLines {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoveSource for StdinLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

#[async_trait]
impl<'a, S: MoveSource + ?Sized> MoveSource for &'a mut S {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line().await
    }
}
