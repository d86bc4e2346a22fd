//! Mock stream whose reads and writes follow a script

use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Shared record of everything written, one entry per write call
pub type WriteLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone)]
pub enum ReadStep {
    Data(Vec<u8>),
    Fail(ErrorKind),
}

#[derive(Debug, Clone)]
pub enum WriteStep {
    /// Take the whole buffer
    Accept,
    /// Take only the first `n` bytes
    Partial(usize),
    /// Fail without taking anything
    Fail(ErrorKind),
}

/// A stream driven by read and write scripts.
///
/// Once the read script runs out every read reports end-of-stream; once the
/// write script runs out every write is accepted in full.
#[derive(Debug, Default)]
pub struct ScriptedStream {
    reads: VecDeque<ReadStep>,
    writes: VecDeque<WriteStep>,
    log: WriteLog,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one read returning `data`
    pub fn read(mut self, data: &str) -> Self {
        self.reads.push_back(ReadStep::Data(data.as_bytes().to_vec()));
        self
    }

    pub fn read_error(mut self, kind: ErrorKind) -> Self {
        self.reads.push_back(ReadStep::Fail(kind));
        self
    }

    pub fn write(mut self, step: WriteStep) -> Self {
        self.writes.push_back(step);
        self
    }

    /// Record writes into a log shared with other streams
    pub fn with_log(mut self, log: WriteLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> WriteLog {
        Arc::clone(&self.log)
    }

    fn record(&self, bytes: &[u8]) {
        self.log
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(bytes).into_owned());
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.reads.pop_front() {
            Some(ReadStep::Data(data)) => {
                let n = data.len().min(buf.remaining());
                buf.put_slice(&data[..n]);
                Poll::Ready(Ok(()))
            }
            Some(ReadStep::Fail(kind)) => Poll::Ready(Err(io::Error::new(kind, "scripted read failure"))),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.writes.pop_front().unwrap_or(WriteStep::Accept) {
            WriteStep::Accept => {
                self.record(buf);
                Poll::Ready(Ok(buf.len()))
            }
            WriteStep::Partial(n) => {
                let n = n.min(buf.len());
                self.record(&buf[..n]);
                Poll::Ready(Ok(n))
            }
            WriteStep::Fail(kind) => {
                Poll::Ready(Err(io::Error::new(kind, "scripted write failure")))
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
