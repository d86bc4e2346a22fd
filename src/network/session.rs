use super::config::SessionConfig;
use super::dialer::{Dialer, TcpDialer};
use super::error::SessionError;
use crate::messages::{encode, read_frame, write_frame, ClientId, Event, Message, WireProtocolError};
use std::io;
use std::net::SocketAddr;
use tokio::time::{interval_at, sleep_until, timeout, timeout_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, info_span, instrument, warn, Span};

/// Descriptors a live connection accounts for (informational).
const DESCRIPTORS_PER_CONNECTION: u32 = 2;

/// Counters kept over the life of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub connections_opened: u32,
    pub descriptors: u32,
    pub reconnects: u32,
    pub messages_sent: u64,
    pub messages_dropped: u64,
    pub messages_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// The client's connection to the session coordinator.
///
/// Every operation is awaited to completion by a single caller; a failed
/// send may block for a whole reconnect sequence before it returns.
pub struct Session<D: Dialer = TcpDialer> {
    config: SessionConfig,
    dialer: D,
    addr: SocketAddr,
    stream: Option<D::Stream>,
    identity: Option<ClientId>,
    stats: SessionStats,
    span: Span,
}

impl Session<TcpDialer> {
    /// Connect over TCP
    pub async fn connect_tcp(config: SessionConfig) -> Result<Self, SessionError> {
        Self::connect(config, TcpDialer).await
    }
}

impl<D: Dialer> Session<D> {
    /// Resolve the configured address and dial it once. No retry.
    pub async fn connect(config: SessionConfig, dialer: D) -> Result<Self, SessionError> {
        let addr = dialer
            .resolve(config.network, &config.host, config.port)
            .await
            .map_err(|source| {
                error!(error = %source, tcp_config = %config, "failed to resolve address");
                SessionError::AddressResolution {
                    config: config.to_string(),
                    source,
                }
            })?;

        let span = info_span!("session", %addr);
        let stream = match timeout(config.timeout, dialer.dial(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                error!(parent: &span, error = %source, "failed to establish connection");
                return Err(SessionError::Dial { addr, source });
            }
            Err(_) => {
                error!(parent: &span, timeout = ?config.timeout, "connection attempt timed out");
                return Err(SessionError::Dial {
                    addr,
                    source: io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("no answer within {:?}", config.timeout),
                    ),
                });
            }
        };
        info!(parent: &span, "connected to {}", addr);

        let mut session = Self {
            config,
            dialer,
            addr,
            stream: None,
            identity: None,
            stats: SessionStats::default(),
            span,
        };
        session.install(stream);
        Ok(session)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn identity(&self) -> Option<&ClientId> {
        self.identity.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Record the identity the coordinator assigned. It is set once and is
    /// what a reconnect announces itself with.
    pub fn assign_identity(&mut self, identity: ClientId) {
        match &self.identity {
            Some(existing) => {
                warn!(parent: &self.span, %existing, ignored = %identity, "identity already assigned");
            }
            None => self.identity = Some(identity),
        }
    }

    fn install(&mut self, stream: D::Stream) {
        self.stream = Some(stream);
        self.stats.connections_opened += 1;
        self.stats.descriptors += DESCRIPTORS_PER_CONNECTION;
    }

    fn drop_connection(&mut self) {
        if self.stream.take().is_some() {
            self.stats.descriptors = self
                .stats
                .descriptors
                .saturating_sub(DESCRIPTORS_PER_CONNECTION);
        }
    }

    /// Send one message.
    ///
    /// A write that fails before any byte left triggers one reconnect
    /// sequence. A write that fails part way through is fatal: the peer may
    /// hold a torn frame.
    ///
    /// After a reconnect the coordinator reads one frame per `recv` and never
    /// acknowledges the `RECONNECT` announcement, so a second write on the
    /// fresh socket could land in the same read. The message is therefore
    /// only written again when no announcement went out; otherwise it is
    /// dropped and counted in [`SessionStats::messages_dropped`].
    #[instrument(level = "debug", parent = &self.span, skip(self, message), fields(message = %message))]
    pub async fn send(&mut self, message: &Message) -> Result<(), SessionError> {
        let bytes = encode(message).map_err(|source| SessionError::InvalidMessage {
            message: message.to_wire(),
            source,
        })?;

        match self.write_bytes(&bytes).await {
            Ok(()) => {}
            Err(WireProtocolError::WriteFailed {
                written: 0, source, ..
            }) => {
                warn!(error = %source, "nothing was written, connection presumed dropped");
                self.reconnect().await?;
                if self.identity.is_some() {
                    self.stats.messages_dropped += 1;
                    warn!(msg = %message, "message lost with the dropped connection");
                    return Ok(());
                }
                self.write_bytes(&bytes)
                    .await
                    .map_err(|e| self.fatal_write(e))?;
            }
            Err(e) => return Err(self.fatal_write(e)),
        }

        self.stats.messages_sent += 1;
        self.stats.bytes_sent += bytes.len() as u64;
        debug!(msg = %message, "successfully sent message");
        Ok(())
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WireProtocolError> {
        match self.stream.as_mut() {
            Some(stream) => write_frame(stream, bytes).await,
            None => Err(WireProtocolError::WriteFailed {
                written: 0,
                total: bytes.len(),
                source: io::Error::new(io::ErrorKind::NotConnected, "no open connection"),
            }),
        }
    }

    fn fatal_write(&self, err: WireProtocolError) -> SessionError {
        error!(error = %err, "fatal write error");
        match err {
            WireProtocolError::WriteFailed {
                written,
                total,
                source,
            } => SessionError::FatalWrite {
                addr: self.addr,
                written,
                total,
                source,
            },
            other => SessionError::FatalWrite {
                addr: self.addr,
                written: 0,
                total: 0,
                source: io::Error::other(other.to_string()),
            },
        }
    }

    /// Receive one message with a single read. Never retried.
    #[instrument(level = "debug", parent = &self.span, skip(self))]
    pub async fn receive(&mut self) -> Result<String, SessionError> {
        let addr = self.addr;
        let stream = self
            .stream
            .as_mut()
            .ok_or(SessionError::NotConnected(addr))?;

        let msg = read_frame(stream).await.map_err(|source| {
            error!(error = %source, "failed to read response message");
            SessionError::FatalRead { addr, source }
        })?;

        self.stats.messages_received += 1;
        self.stats.bytes_received += msg.len() as u64;
        debug!(msg = %msg, "successfully read response message");
        Ok(msg)
    }

    /// Re-establish the connection.
    ///
    /// Dials once per retry interval, the first attempt one interval after
    /// the call, until a dial succeeds or the overall timeout elapses. No
    /// dial is started after the deadline.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn reconnect(&mut self) -> Result<(), SessionError> {
        self.drop_connection();

        let start = Instant::now();
        let deadline = start + self.config.timeout;
        let expired = sleep_until(deadline);
        tokio::pin!(expired);
        let mut ticker = interval_at(start + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut attempts = 0u32;
        let mut last_error: Option<io::Error> = None;

        loop {
            tokio::select! {
                biased;

                _ = &mut expired => {
                    let last_error = last_error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no attempt completed".to_string());
                    error!(attempts, error = %last_error, "connection timed out");
                    return Err(SessionError::ReconnectTimeout {
                        addr: self.addr,
                        timeout: self.config.timeout,
                        attempts,
                        last_error,
                    });
                }
                _ = ticker.tick() => {
                    attempts += 1;
                    info!(attempt = attempts, "trying to reconnect");
                    match timeout_at(deadline, self.dialer.dial(self.addr)).await {
                        Ok(Ok(stream)) => {
                            self.install(stream);
                            self.stats.reconnects += 1;
                            info!(attempt = attempts, "successfully connected");
                            return self.announce_reconnect().await;
                        }
                        Ok(Err(e)) => {
                            warn!(attempt = attempts, error = %e, "reconnect attempt failed");
                            last_error = Some(e);
                        }
                        Err(_) => {
                            warn!(attempt = attempts, "reconnect attempt cut off by deadline");
                        }
                    }
                }
            }
        }
    }

    /// Tell the coordinator which client this fresh connection belongs to.
    async fn announce_reconnect(&mut self) -> Result<(), SessionError> {
        let Some(identity) = self.identity.clone() else {
            debug!("no identity assigned yet, reconnect not announced");
            return Ok(());
        };

        let announcement = Message::event(identity, Event::Reconnect);
        let bytes = encode(&announcement).map_err(|source| SessionError::InvalidMessage {
            message: announcement.to_wire(),
            source,
        })?;
        self.write_bytes(&bytes)
            .await
            .map_err(|e| self.fatal_write(e))?;

        self.stats.messages_sent += 1;
        self.stats.bytes_sent += bytes.len() as u64;
        debug!(msg = %announcement, "announced reconnect");
        Ok(())
    }
}
