//! Dialer that hands out scripted streams and counts its calls

use super::mock_streams::{ScriptedStream, WriteLog};
use async_trait::async_trait;
use pawnwire::network::{Dialer, Network};
use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub enum DialStep {
    Connect(ScriptedStream),
    Refuse,
    /// Never completes
    Hang,
}

struct Inner {
    resolvable: bool,
    steps: Mutex<VecDeque<DialStep>>,
    resolves: AtomicUsize,
    dials: AtomicUsize,
    log: WriteLog,
}

/// Cloning shares the script and counters, so a test can keep a handle
/// after moving the dialer into a session.
#[derive(Clone)]
pub struct MockDialer {
    inner: Arc<Inner>,
}

impl MockDialer {
    pub fn new() -> Self {
        Self::with_resolution(true)
    }

    /// A dialer whose address never resolves
    pub fn unresolvable() -> Self {
        Self::with_resolution(false)
    }

    fn with_resolution(resolvable: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                resolvable,
                steps: Mutex::new(VecDeque::new()),
                resolves: AtomicUsize::new(0),
                dials: AtomicUsize::new(0),
                log: WriteLog::default(),
            }),
        }
    }

    /// Queue a successful dial; the stream's writes go to the shared log
    pub fn connect(self, stream: ScriptedStream) -> Self {
        let stream = stream.with_log(self.log());
        self.push(DialStep::Connect(stream))
    }

    pub fn refuse(self) -> Self {
        self.push(DialStep::Refuse)
    }

    pub fn hang(self) -> Self {
        self.push(DialStep::Hang)
    }

    fn push(self, step: DialStep) -> Self {
        self.inner.steps.lock().unwrap().push_back(step);
        self
    }

    pub fn dials(&self) -> usize {
        self.inner.dials.load(Ordering::SeqCst)
    }

    pub fn resolves(&self) -> usize {
        self.inner.resolves.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> WriteLog {
        Arc::clone(&self.inner.log)
    }

    /// Everything written on any connection, in order
    pub fn written(&self) -> Vec<String> {
        self.inner.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dialer for MockDialer {
    type Stream = ScriptedStream;

    async fn resolve(&self, _network: Network, host: &str, port: u16) -> io::Result<SocketAddr> {
        self.inner.resolves.fetch_add(1, Ordering::SeqCst);
        if !self.inner.resolvable {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("no such host {}", host),
            ));
        }
        Ok(SocketAddr::from(([127, 0, 0, 1], port)))
    }

    async fn dial(&self, _addr: SocketAddr) -> io::Result<ScriptedStream> {
        self.inner.dials.fetch_add(1, Ordering::SeqCst);
        let step = self.inner.steps.lock().unwrap().pop_front();
        match step {
            Some(DialStep::Connect(stream)) => Ok(stream),
            Some(DialStep::Hang) => std::future::pending().await,
            Some(DialStep::Refuse) | None => Err(io::Error::new(
                ErrorKind::ConnectionRefused,
                "connection refused",
            )),
        }
    }
}
