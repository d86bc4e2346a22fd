pub mod types;
pub mod wire;

pub use types::{ClientId, Event, Message, Payload};
pub use wire::{
    encode, read_frame, write_frame, WireProtocolError, FIELD_SEPARATOR, MAX_MESSAGE_SIZE,
};
