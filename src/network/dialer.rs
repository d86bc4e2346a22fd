use super::config::Network;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{lookup_host, TcpStream};
use tracing::debug;

/// Name resolution and connection establishment for a [`Session`].
///
/// [`Session`]: super::Session
#[async_trait]
pub trait Dialer: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Resolve `host:port` to the first address usable by `network`
    async fn resolve(&self, network: Network, host: &str, port: u16) -> io::Result<SocketAddr>;

    /// Open one connection to an already resolved address
    async fn dial(&self, addr: SocketAddr) -> io::Result<Self::Stream>;
}

/// Plain TCP dialer backed by tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn resolve(&self, network: Network, host: &str, port: u16) -> io::Result<SocketAddr> {
        let mut addrs = lookup_host((host, port)).await?;
        let addr = addrs.find(|addr| network.accepts(addr)).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no {} address found for {}:{}", network, host, port),
            )
        })?;
        debug!("Resolved {}:{} to {}", host, port, addr);
        Ok(addr)
    }

    async fn dial(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(addr).await?;
        // Frames are tiny and strictly alternate; do not let Nagle hold them back
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
