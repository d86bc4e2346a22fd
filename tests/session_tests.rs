//! Transport session behaviour: connect, send with reconnect, receive

mod common;

use common::flaky_tcp::FlakyTcpDialer;
use common::mock_dialer::MockDialer;
use common::mock_streams::{ScriptedStream, WriteStep};
use common::fast_config;
use pawnwire::messages::{ClientId, Message, WireProtocolError, MAX_MESSAGE_SIZE};
use pawnwire::network::{Session, SessionConfig, SessionError};
use std::io::ErrorKind;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::Instant;

fn chess_move(text: &str) -> Message {
    Message::chess_move(ClientId::new("7"), text)
}

#[tokio::test]
async fn test_unresolvable_address_never_dials() {
    let dialer = MockDialer::unresolvable();
    let result = Session::connect(fast_config(), dialer.clone()).await;

    match result {
        Err(SessionError::AddressResolution { config, .. }) => {
            assert_eq!(config, "network: 'tcp', address: '127.0.0.1:1234'");
        }
        other => panic!("expected AddressResolution, got {:?}", other.err()),
    }
    assert_eq!(dialer.resolves(), 1);
    assert_eq!(dialer.dials(), 0);
}

#[tokio::test]
async fn test_initial_dial_is_not_retried() {
    let dialer = MockDialer::new().refuse().connect(ScriptedStream::new());
    let result = Session::connect(fast_config(), dialer.clone()).await;

    assert!(matches!(result, Err(SessionError::Dial { .. })));
    assert_eq!(dialer.dials(), 1);
}

#[tokio::test]
async fn test_initial_dial_bounded_by_timeout() {
    let dialer = MockDialer::new().hang();
    let config = SessionConfig {
        timeout: Duration::from_millis(50),
        ..fast_config()
    };

    let started = Instant::now();
    let result = Session::connect(config, dialer.clone()).await;

    match result {
        Err(SessionError::Dial { source, .. }) => assert_eq!(source.kind(), ErrorKind::TimedOut),
        other => panic!("expected Dial timeout, got {:?}", other.err()),
    }
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(dialer.dials(), 1);
}

#[tokio::test]
async fn test_send_writes_message_verbatim() {
    let dialer = MockDialer::new().connect(ScriptedStream::new());
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();

    session.send(&Message::begin()).await.unwrap();
    session.send(&chess_move("e4")).await.unwrap();

    assert_eq!(dialer.written(), vec!["BEGIN", "7:e4"]);
    let stats = session.stats();
    assert_eq!(stats.connections_opened, 1);
    assert_eq!(stats.descriptors, 2);
    assert_eq!(stats.messages_sent, 2);
    assert_eq!(stats.bytes_sent, 9);
}

#[tokio::test]
async fn test_zero_byte_failure_reconnects_and_announces() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)))
        .connect(ScriptedStream::new());
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();
    session.assign_identity(ClientId::new("7"));

    session.send(&chess_move("e4")).await.unwrap();

    // The announcement is the only frame on the fresh connection
    assert_eq!(dialer.written(), vec!["7:RECONNECT"]);
    assert_eq!(dialer.dials(), 2);
    let stats = session.stats();
    assert_eq!(stats.reconnects, 1);
    assert_eq!(stats.connections_opened, 2);
    assert_eq!(stats.descriptors, 2);
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.messages_dropped, 1);
}

#[tokio::test]
async fn test_first_reconnect_attempt_waits_one_interval() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::ConnectionReset)))
        .connect(ScriptedStream::new());
    let config = SessionConfig {
        interval: Duration::from_millis(60),
        ..fast_config()
    };
    let mut session = Session::connect(config, dialer.clone()).await.unwrap();

    let started = Instant::now();
    session.send(&chess_move("e4")).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(60));
    assert_eq!(dialer.dials(), 2);
}

#[tokio::test]
async fn test_reconnect_before_handshake_resends_unannounced() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)))
        .connect(ScriptedStream::new());
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();

    session.send(&Message::begin()).await.unwrap();

    assert_eq!(dialer.written(), vec!["BEGIN"]);
    assert_eq!(session.stats().messages_sent, 1);
    assert_eq!(session.stats().messages_dropped, 0);
}

#[tokio::test]
async fn test_reconnect_retries_on_interval() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)))
        .refuse()
        .refuse()
        .connect(ScriptedStream::new());
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();
    session.assign_identity(ClientId::new("7"));

    session.send(&chess_move("Nf3")).await.unwrap();

    assert_eq!(dialer.dials(), 4);
    assert_eq!(dialer.written(), vec!["7:RECONNECT"]);
}

#[tokio::test]
async fn test_reconnect_gives_up_at_deadline() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)));
    let config = SessionConfig {
        timeout: Duration::from_millis(150),
        interval: Duration::from_millis(20),
        ..fast_config()
    };
    let mut session = Session::connect(config, dialer.clone()).await.unwrap();
    session.assign_identity(ClientId::new("7"));

    let started = Instant::now();
    let result = session.send(&chess_move("e4")).await;

    match result {
        Err(SessionError::ReconnectTimeout {
            timeout, attempts, ..
        }) => {
            assert_eq!(timeout, Duration::from_millis(150));
            assert!(attempts >= 1);
            assert_eq!(attempts as usize, dialer.dials() - 1);
        }
        other => panic!("expected ReconnectTimeout, got {:?}", other),
    }
    assert!(started.elapsed() >= Duration::from_millis(150));

    // No dial happens once the sequence has given up
    let dials = dialer.dials();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(dialer.dials(), dials);
    assert!(dialer.written().is_empty());
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_failed_resend_is_fatal() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)))
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)));
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();

    let result = session.send(&Message::begin()).await;

    assert!(matches!(
        result,
        Err(SessionError::FatalWrite { written: 0, total: 5, .. })
    ));
    assert_eq!(dialer.dials(), 2);
    assert!(dialer.written().is_empty());
}

#[tokio::test]
async fn test_failed_announcement_is_fatal() {
    let dialer = MockDialer::new()
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::BrokenPipe)))
        .connect(ScriptedStream::new().write(WriteStep::Fail(ErrorKind::ConnectionReset)));
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();
    session.assign_identity(ClientId::new("7"));

    let result = session.send(&chess_move("e4")).await;

    assert!(matches!(
        result,
        Err(SessionError::FatalWrite { written: 0, total: 11, .. })
    ));
    assert_eq!(dialer.dials(), 2);
    assert!(dialer.written().is_empty());
}

#[tokio::test]
async fn test_partial_write_is_fatal_without_reconnect() {
    let dialer = MockDialer::new().connect(
        ScriptedStream::new()
            .write(WriteStep::Partial(2))
            .write(WriteStep::Fail(ErrorKind::ConnectionReset)),
    );
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();

    let result = session.send(&chess_move("e4")).await;

    assert!(matches!(
        result,
        Err(SessionError::FatalWrite { written: 2, total: 4, .. })
    ));
    assert_eq!(dialer.dials(), 1);
    assert_eq!(session.stats().messages_sent, 0);
}

#[tokio::test]
async fn test_oversized_message_rejected_before_io() {
    let dialer = MockDialer::new().connect(ScriptedStream::new());
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();

    let result = session.send(&chess_move(&"a".repeat(MAX_MESSAGE_SIZE))).await;

    assert!(matches!(
        result,
        Err(SessionError::InvalidMessage {
            source: WireProtocolError::MessageTooLarge { .. },
            ..
        })
    ));
    assert!(dialer.written().is_empty());
}

#[tokio::test]
async fn test_receive_returns_one_read() {
    let dialer = MockDialer::new().connect(ScriptedStream::new().read("e5").read("Nc6"));
    let mut session = Session::connect(fast_config(), dialer).await.unwrap();

    assert_eq!(session.receive().await.unwrap(), "e5");
    assert_eq!(session.receive().await.unwrap(), "Nc6");
    assert_eq!(session.stats().messages_received, 2);
    assert_eq!(session.stats().bytes_received, 5);
}

#[tokio::test]
async fn test_receive_end_of_stream_is_fatal() {
    let dialer = MockDialer::new().connect(ScriptedStream::new());
    let mut session = Session::connect(fast_config(), dialer.clone()).await.unwrap();

    let result = session.receive().await;

    assert!(matches!(
        result,
        Err(SessionError::FatalRead {
            source: WireProtocolError::ConnectionClosed,
            ..
        })
    ));
    assert_eq!(dialer.dials(), 1);
}

#[tokio::test]
async fn test_receive_error_is_fatal() {
    let dialer =
        MockDialer::new().connect(ScriptedStream::new().read_error(ErrorKind::ConnectionReset));
    let mut session = Session::connect(fast_config(), dialer).await.unwrap();

    assert!(matches!(
        session.receive().await,
        Err(SessionError::FatalRead {
            source: WireProtocolError::ReadFailed(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_tcp_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 256];
        let n = socket.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"BEGIN");
        socket.write_all(b"1:WHITE").await.unwrap();
    });

    let config = SessionConfig {
        port,
        ..fast_config()
    };
    let mut session = Session::connect_tcp(config).await.unwrap();
    session.send(&Message::begin()).await.unwrap();
    assert_eq!(session.receive().await.unwrap(), "1:WHITE");
    server.await.unwrap();
}

/// Accept one connection, take a single read, then collect whatever else
/// arrives until the client hangs up.
async fn coordinator_reads(listener: TcpListener) -> (String, String) {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = [0u8; 256];
    let n = socket.read(&mut buf).await.unwrap();
    let first = String::from_utf8_lossy(&buf[..n]).into_owned();
    let mut rest = String::new();
    socket.read_to_string(&mut rest).await.unwrap();
    (first, rest)
}

#[tokio::test]
async fn test_reconnect_announcement_travels_alone_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(coordinator_reads(listener));

    let dialer = FlakyTcpDialer::default();
    let config = SessionConfig {
        port,
        ..fast_config()
    };
    let mut session = Session::connect(config, dialer.clone()).await.unwrap();
    session.assign_identity(ClientId::new("7"));

    session.send(&chess_move("e4")).await.unwrap();
    assert_eq!(dialer.dials(), 2);
    assert_eq!(session.stats().messages_dropped, 1);
    drop(session);

    let (first, rest) = server.await.unwrap();
    assert_eq!(first, "7:RECONNECT");
    assert_eq!(rest, "");
}

#[tokio::test]
async fn test_unannounced_resend_travels_alone_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(coordinator_reads(listener));

    let config = SessionConfig {
        port,
        ..fast_config()
    };
    let mut session = Session::connect(config, FlakyTcpDialer::default()).await.unwrap();

    session.send(&Message::begin()).await.unwrap();
    drop(session);

    let (first, rest) = server.await.unwrap();
    assert_eq!(first, "BEGIN");
    assert_eq!(rest, "");
}
