use super::types::Message;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, instrument, trace};

// Wire protocol constants
pub const MAX_MESSAGE_SIZE: usize = 256; // one read, never reassembled
pub const FIELD_SEPARATOR: char = ':';

/// Custom error types for wire protocol operations
#[derive(Error, Debug)]
pub enum WireProtocolError {
    #[error("Message too large: {size} bytes exceeds maximum of {max_size} bytes")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Empty message")]
    EmptyMessage,

    #[error("Write failed after writing {written} of {total} bytes: {source}")]
    WriteFailed {
        written: usize,
        total: usize,
        #[source]
        source: io::Error,
    },

    #[error("Read failed: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,
}

/// Encode a message, enforcing the single-read size bound
pub fn encode(message: &Message) -> Result<Vec<u8>, WireProtocolError> {
    let bytes = message.to_wire().into_bytes();
    if bytes.is_empty() {
        return Err(WireProtocolError::EmptyMessage);
    }
    if bytes.len() > MAX_MESSAGE_SIZE {
        return Err(WireProtocolError::MessageTooLarge {
            size: bytes.len(),
            max_size: MAX_MESSAGE_SIZE,
        });
    }
    Ok(bytes)
}

/// Write one frame, tracking how many bytes made it out.
///
/// Partial writes are continued, but a failure reports the running total so
/// the caller can tell a clean drop (nothing written) from a torn frame.
#[instrument(level = "debug", skip(writer, data), fields(data_size = data.len()))]
pub async fn write_frame(
    writer: &mut (impl AsyncWrite + Unpin),
    data: &[u8],
) -> Result<(), WireProtocolError> {
    let mut total_written = 0;
    let data_len = data.len();

    while total_written < data_len {
        let remaining = &data[total_written..];

        match writer.write(remaining).await {
            Ok(0) => {
                error!(
                    total_written = total_written,
                    remaining = remaining.len(),
                    "Write operation returned 0 bytes, indicating writer is closed"
                );
                return Err(WireProtocolError::WriteFailed {
                    written: total_written,
                    total: data_len,
                    source: io::Error::new(io::ErrorKind::WriteZero, "writer closed"),
                });
            }
            Ok(written) => {
                total_written += written;
                trace!(
                    written = written,
                    total_written = total_written,
                    remaining = data_len - total_written,
                    "Partial write completed"
                );
            }
            Err(e) => {
                error!(
                    error = %e,
                    total_written = total_written,
                    data_size = data_len,
                    "Write operation failed"
                );
                return Err(WireProtocolError::WriteFailed {
                    written: total_written,
                    total: data_len,
                    source: e,
                });
            }
        }
    }

    writer
        .flush()
        .await
        .map_err(|source| WireProtocolError::WriteFailed {
            written: total_written,
            total: data_len,
            source,
        })?;

    debug!("Write operation completed successfully, {} bytes written", total_written);
    Ok(())
}

/// Read one frame: a single read of at most [`MAX_MESSAGE_SIZE`] bytes.
#[instrument(level = "debug", skip(reader))]
pub async fn read_frame(reader: &mut (impl AsyncRead + Unpin)) -> Result<String, WireProtocolError> {
    let mut buffer = [0u8; MAX_MESSAGE_SIZE];

    let read = reader
        .read(&mut buffer)
        .await
        .map_err(WireProtocolError::ReadFailed)?;
    if read == 0 {
        return Err(WireProtocolError::ConnectionClosed);
    }

    let text = String::from_utf8_lossy(&buffer[..read]).into_owned();
    debug!("Read {} byte frame", read);
    Ok(text)
}
