//! netconf-core - Message-handling substrate for NETCONF-style RPC endpoints
//!
//! Three pieces every protocol layer above builds on:
//!
//! - **XML pipeline**: hardened parsing, namespace-correct construction,
//!   deterministic serialization, XPath evaluation
//! - **Operations**: totally ordered handling priorities and a deterministic
//!   handler selector
//! - **Client**: an asynchronous session dispatcher that negotiates a
//!   session without blocking the caller

pub mod client;
pub mod operations;
pub mod xml;
