//! # Message Framing
//!
//! End-of-message framing over a transport: every message is followed by
//! the `]]>]]>` separator. The hello exchange always uses this framing;
//! whatever the peers negotiate afterwards stays above this layer.

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::xml::{serialize_document, Document};

use super::transport::Transport;

/// Message separator for end-of-message framing
pub const MESSAGE_SEPARATOR: &[u8] = b"]]>]]>";

const READ_CHUNK: usize = 4096;

/// One transport carrying framed messages
///
/// Owns the byte stream and a carry-over buffer, so bytes read past a
/// separator are never lost between messages.
pub(crate) struct MessageChannel {
    transport: Box<dyn Transport>,
    buffer: Vec<u8>,
}

impl MessageChannel {
    pub(crate) fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            buffer: Vec::new(),
        }
    }

    /// Send one framed message
    pub(crate) async fn send(&mut self, message: &Document) -> io::Result<()> {
        let body = serialize_document(message, false);
        self.transport.write_all(body.as_bytes()).await?;
        self.transport.write_all(MESSAGE_SEPARATOR).await?;
        self.transport.flush().await
    }

    /// Receive one framed message as text
    pub(crate) async fn receive(&mut self, max_bytes: usize) -> io::Result<String> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(position) = find_separator(&self.buffer) {
                if position > max_bytes {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("message exceeds {max_bytes} bytes"),
                    ));
                }
                let raw: Vec<u8> = self
                    .buffer
                    .drain(..position + MESSAGE_SEPARATOR.len())
                    .take(position)
                    .collect();
                return String::from_utf8(raw).map_err(|e| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("non-UTF-8 message: {e}"))
                });
            }
            if self.buffer.len() > max_bytes + MESSAGE_SEPARATOR.len() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("message exceeds {max_bytes} bytes"),
                ));
            }
            let read = self.transport.read(&mut chunk).await?;
            if read == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "peer closed the connection mid-message",
                ));
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }

    /// Shut the write side down
    pub(crate) async fn shutdown(&mut self) -> io::Result<()> {
        self.transport.shutdown().await
    }
}

fn find_separator(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(MESSAGE_SEPARATOR.len())
        .position(|window| window == MESSAGE_SEPARATOR)
}
