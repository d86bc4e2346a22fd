use super::dialer::Dialer;
use super::error::HandshakeError;
use super::session::Session;
use crate::chess::Side;
use crate::messages::{ClientId, Message, FIELD_SEPARATOR};
use tracing::{info, instrument};

/// What the coordinator told us when the game was set up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub identity: ClientId,
    pub side: Side,
}

/// Parse a `<identity>:<side label>` reply.
///
/// Only the first separator splits. Any label other than `WHITE` plays Black.
pub fn parse_handshake_reply(reply: &str) -> Result<Handshake, HandshakeError> {
    let trimmed = reply.trim();
    let (identity, label) =
        trimmed
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| HandshakeError::MissingSeparator {
                reply: trimmed.to_string(),
            })?;

    if identity.is_empty() {
        return Err(HandshakeError::EmptyIdentity {
            reply: trimmed.to_string(),
        });
    }

    Ok(Handshake {
        identity: ClientId::new(identity),
        side: Side::from_label(label),
    })
}

/// Announce readiness and wait for the coordinator to pair us.
///
/// Blocks until the reply arrives; there is no timeout on waiting for an
/// opponent.
#[instrument(skip(session), fields(addr = %session.addr()))]
pub async fn negotiate<D: Dialer>(session: &mut Session<D>) -> Result<Handshake, HandshakeError> {
    session.send(&Message::begin()).await?;
    info!("waiting for the coordinator to assign an opponent");

    let reply = session.receive().await?;
    let handshake = parse_handshake_reply(&reply)?;
    session.assign_identity(handshake.identity.clone());

    info!(
        identity = %handshake.identity,
        side = %handshake.side,
        "handshake complete"
    );
    Ok(handshake)
}
