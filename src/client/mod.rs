//! # Client Session Dispatch
//!
//! Asynchronous establishment of client sessions against remote
//! endpoints.
//!
//! ## Architecture
//!
//! - **Config**: caller-owned connection/session bundle
//! - **Transport**: pluggable byte-stream factories (TCP shipped)
//! - **Framing**: end-of-message framed exchange for hellos and rpcs
//! - **Handshake**: hello exchange and capability negotiation
//! - **Dispatcher**: non-blocking `create_client` with exactly-once
//!   resolution, cancellation, and timeouts

pub mod config;
pub mod dispatcher;
pub mod errors;
mod framing;
pub mod handshake;
pub mod session;
pub mod transport;

pub use config::{ClientSessionConfig, Credentials};
pub use dispatcher::{ClientDispatcher, DispatchState, SessionFuture};
pub use errors::{DispatchError, DispatchResult, SessionError, SessionResult};
pub use framing::MESSAGE_SEPARATOR;
pub use handshake::{build_hello, negotiate, parse_hello, PeerHello, BASE_CAPABILITY, BASE_NAMESPACE};
pub use session::ClientSession;
pub use transport::{TcpTransportFactory, Transport, TransportFactory};
