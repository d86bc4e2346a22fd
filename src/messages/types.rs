use super::wire::FIELD_SEPARATOR;
use std::fmt;

/// Control tokens that mark protocol phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Begin,
    End,
    Reconnect,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Begin => "BEGIN",
            Event::End => "END",
            Event::Reconnect => "RECONNECT",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-scoped identifier handed out by the coordinator.
///
/// The token is kept verbatim; the coordinator is trusted to send something
/// it will recognise when it comes back as a message prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Event(Event),
    /// A move in algebraic notation, sent verbatim
    Move(String),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Event(event) => write!(f, "{}", event),
            Payload::Move(text) => f.write_str(text),
        }
    }
}

/// A client-to-coordinator message.
///
/// Once an identity is assigned every message is `<identity>:<payload>`.
/// The opening `BEGIN` goes out bare because no identity exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    identity: Option<ClientId>,
    payload: Payload,
}

impl Message {
    /// The bare handshake opener
    pub fn begin() -> Self {
        Self {
            identity: None,
            payload: Payload::Event(Event::Begin),
        }
    }

    pub fn event(identity: ClientId, event: Event) -> Self {
        Self {
            identity: Some(identity),
            payload: Payload::Event(event),
        }
    }

    pub fn chess_move(identity: ClientId, text: impl Into<String>) -> Self {
        Self {
            identity: Some(identity),
            payload: Payload::Move(text.into()),
        }
    }

    /// Text exactly as it goes on the wire
    pub fn to_wire(&self) -> String {
        match &self.identity {
            Some(identity) => format!("{}{}{}", identity, FIELD_SEPARATOR, self.payload),
            None => self.payload.to_string(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}
