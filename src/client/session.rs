//! # Client Session
//!
//! A live protocol session bound to one transport connection. The session
//! owns the connection; `&mut self` on the message operations enforces the
//! single-writer discipline.

use crate::xml::{parse_document, Document};

use super::errors::SessionResult;
use super::framing::MessageChannel;

/// Upper bound on an acceptable inbound message
const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

/// A negotiated client session
pub struct ClientSession {
    session_id: u32,
    capabilities: Vec<String>,
    channel: MessageChannel,
}

impl ClientSession {
    pub(crate) fn new(session_id: u32, capabilities: Vec<String>, channel: MessageChannel) -> Self {
        Self {
            session_id,
            capabilities,
            channel,
        }
    }

    /// Session identifier assigned by the server
    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Capabilities both peers support
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// True when the negotiated set contains the capability URI
    pub fn has_capability(&self, uri: &str) -> bool {
        self.capabilities.iter().any(|c| c == uri)
    }

    /// Send one message to the peer
    pub async fn send_message(&mut self, message: &Document) -> SessionResult<()> {
        self.channel.send(message).await?;
        Ok(())
    }

    /// Receive one message from the peer
    ///
    /// The raw message runs through the hardened pipeline; a peer sending
    /// malformed or policy-violating XML fails the call, never yields a
    /// partial document.
    pub async fn receive_message(&mut self) -> SessionResult<Document> {
        let raw = self.channel.receive(MAX_MESSAGE_BYTES).await?;
        Ok(parse_document(&raw)?)
    }

    /// Close the session, shutting the transport down
    pub async fn close(mut self) -> SessionResult<()> {
        tracing::debug!(session_id = self.session_id, "closing session");
        self.channel.shutdown().await?;
        Ok(())
    }
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("session_id", &self.session_id)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::framing::MessageChannel;
    use crate::xml::Element;

    fn session_over(
        transport: tokio::io::DuplexStream,
    ) -> ClientSession {
        ClientSession::new(
            1,
            vec!["urn:ietf:params:netconf:base:1.0".to_string()],
            MessageChannel::new(Box::new(transport)),
        )
    }

    #[tokio::test]
    async fn test_send_and_receive_documents() {
        let (near, far) = tokio::io::duplex(4096);
        let mut session = session_over(near);
        let mut peer = MessageChannel::new(Box::new(far));

        let request = Document::with_root(Element::new("get"));
        session.send_message(&request).await.unwrap();
        assert_eq!(peer.receive(1024).await.unwrap(), "<get/>");

        peer.send(&Document::with_root(Element::new("rpc-reply")))
            .await
            .unwrap();
        let reply = session.receive_message().await.unwrap();
        assert_eq!(reply.root().unwrap().local_name(), "rpc-reply");
    }

    #[tokio::test]
    async fn test_malformed_peer_message_is_an_error() {
        let (near, far) = tokio::io::duplex(4096);
        let mut session = session_over(near);

        use tokio::io::AsyncWriteExt;
        let mut far = far;
        far.write_all(b"<!DOCTYPE x><x/>]]>]]>").await.unwrap();

        assert!(session.receive_message().await.is_err());
    }

    #[test]
    fn test_has_capability() {
        let (near, _far) = tokio::io::duplex(64);
        let session = session_over(near);
        assert!(session.has_capability("urn:ietf:params:netconf:base:1.0"));
        assert!(!session.has_capability("urn:other"));
    }
}
