//! # Capability Handshake
//!
//! Builds, exchanges, and evaluates `<hello>` messages. Both sides must
//! advertise the base capability; the negotiated set is the intersection
//! of the two advertisements.

use crate::xml::{parse_document, Document, Element};

use super::config::ClientSessionConfig;
use super::errors::{DispatchError, DispatchResult};
use super::framing::MessageChannel;
use super::session::ClientSession;
use super::transport::Transport;

/// Base protocol capability both peers must advertise
pub const BASE_CAPABILITY: &str = "urn:ietf:params:netconf:base:1.0";

/// Namespace of the hello message
pub const BASE_NAMESPACE: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// Upper bound on an acceptable peer hello
const MAX_HELLO_BYTES: usize = 64 * 1024;

/// Build a client `<hello>` advertising the given capabilities
pub fn build_hello(capabilities: &[String]) -> Document {
    let mut hello = Element::with_namespace("hello", BASE_NAMESPACE);
    let mut list = Element::new("capabilities");
    for uri in capabilities {
        list.append_child(Element::text_element("capability", None, uri.as_str()));
    }
    hello.append_child(list);
    Document::with_root(hello)
}

/// What the peer's hello declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerHello {
    /// Session identifier assigned by the server, when present
    pub session_id: Option<u32>,
    /// Capability URIs the peer advertised
    pub capabilities: Vec<String>,
}

/// Extract session-id and capabilities from a parsed hello
pub fn parse_hello(message: &Document) -> DispatchResult<PeerHello> {
    let root = message
        .root()
        .filter(|root| root.local_name() == "hello")
        .ok_or_else(|| DispatchError::HandshakeFailed("peer did not send <hello>".to_string()))?;

    let mut capabilities = Vec::new();
    if let Some(list) = root.child("capabilities") {
        for capability in list.child_elements() {
            if capability.local_name() == "capability" {
                let uri = capability.text().trim().to_string();
                if !uri.is_empty() {
                    capabilities.push(uri);
                }
            }
        }
    }
    if capabilities.is_empty() {
        return Err(DispatchError::HandshakeFailed(
            "peer hello advertises no capabilities".to_string(),
        ));
    }

    let session_id = match root.child("session-id") {
        Some(element) => Some(element.text().trim().parse::<u32>().map_err(|_| {
            DispatchError::HandshakeFailed(format!("invalid session-id `{}`", element.text()))
        })?),
        None => None,
    };

    Ok(PeerHello {
        session_id,
        capabilities,
    })
}

/// Intersect the local advertisement with the peer's
///
/// Both sides must carry the base capability. The result preserves the
/// local advertisement order.
pub fn negotiate(local: &[String], remote: &[String]) -> DispatchResult<Vec<String>> {
    let base = |capabilities: &[String]| capabilities.iter().any(|c| c == BASE_CAPABILITY);
    if !base(local) {
        return Err(DispatchError::CapabilityMismatch(format!(
            "local advertisement lacks {BASE_CAPABILITY}"
        )));
    }
    if !base(remote) {
        return Err(DispatchError::CapabilityMismatch(format!(
            "peer advertisement lacks {BASE_CAPABILITY}"
        )));
    }
    Ok(local
        .iter()
        .filter(|capability| remote.contains(capability))
        .cloned()
        .collect())
}

/// Run the client side of the handshake on a connected transport
pub(crate) async fn run(
    transport: Box<dyn Transport>,
    config: &ClientSessionConfig,
) -> DispatchResult<ClientSession> {
    let mut channel = MessageChannel::new(transport);

    let hello = build_hello(&config.capabilities);
    channel
        .send(&hello)
        .await
        .map_err(|e| DispatchError::HandshakeFailed(format!("failed to send hello: {e}")))?;

    let raw = channel
        .receive(MAX_HELLO_BYTES)
        .await
        .map_err(|e| DispatchError::HandshakeFailed(format!("failed to read peer hello: {e}")))?;
    let message = parse_document(&raw)
        .map_err(|e| DispatchError::HandshakeFailed(format!("malformed peer hello: {e}")))?;
    let peer = parse_hello(&message)?;

    let negotiated = negotiate(&config.capabilities, &peer.capabilities)?;
    let session_id = peer.session_id.ok_or_else(|| {
        DispatchError::HandshakeFailed("peer hello carries no session-id".to_string())
    })?;

    tracing::info!(session_id, capabilities = negotiated.len(), "session established");
    Ok(ClientSession::new(session_id, negotiated, channel))
}
