//! Dialer whose first connection is already dead; later dials open real sockets

use async_trait::async_trait;
use pawnwire::network::{Dialer, Network};
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

pub enum FlakyStream {
    /// Every write fails before taking a byte
    Dead,
    Live(TcpStream),
}

impl AsyncRead for FlakyStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            FlakyStream::Dead => Poll::Ready(Ok(())),
            FlakyStream::Live(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for FlakyStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            FlakyStream::Dead => Poll::Ready(Err(io::Error::new(
                ErrorKind::BrokenPipe,
                "connection already dropped",
            ))),
            FlakyStream::Live(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            FlakyStream::Dead => Poll::Ready(Ok(())),
            FlakyStream::Live(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            FlakyStream::Dead => Poll::Ready(Ok(())),
            FlakyStream::Live(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

#[derive(Clone, Default)]
pub struct FlakyTcpDialer {
    dials: Arc<AtomicUsize>,
}

impl FlakyTcpDialer {
    pub fn dials(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Dialer for FlakyTcpDialer {
    type Stream = FlakyStream;

    async fn resolve(&self, _network: Network, _host: &str, port: u16) -> io::Result<SocketAddr> {
        Ok(SocketAddr::from(([127, 0, 0, 1], port)))
    }

    async fn dial(&self, addr: SocketAddr) -> io::Result<FlakyStream> {
        if self.dials.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(FlakyStream::Dead);
        }
        Ok(FlakyStream::Live(TcpStream::connect(addr).await?))
    }
}
