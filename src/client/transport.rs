//! # Transport Abstraction
//!
//! Byte-stream transports beneath the protocol layer. The dispatcher only
//! ever sees `Box<dyn Transport>`, so TCP, TLS, and SSH factories are
//! interchangeable; tests plug in in-memory duplex streams.

use std::future::Future;
use std::io;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// A connected byte stream usable by a session
pub trait Transport: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Transport for T {}

/// Opens transports to remote endpoints
pub trait TransportFactory: Send + Sync + 'static {
    /// Open a byte stream to the remote endpoint
    fn connect(
        &self,
        address: &str,
    ) -> impl Future<Output = io::Result<Box<dyn Transport>>> + Send;
}

/// Plain TCP transport factory
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransportFactory;

impl TransportFactory for TcpTransportFactory {
    fn connect(
        &self,
        address: &str,
    ) -> impl Future<Output = io::Result<Box<dyn Transport>>> + Send {
        let address = address.to_string();
        async move {
            let stream = TcpStream::connect(&address).await?;
            // hellos and rpcs are small; do not batch them
            stream.set_nodelay(true)?;
            Ok(Box::new(stream) as Box<dyn Transport>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_factory_connects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            peer.write_all(b"hi").await.unwrap();
        });

        let mut transport = TcpTransportFactory.connect(&address).await.unwrap();
        let mut buf = [0u8; 2];
        transport.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hi");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_tcp_factory_reports_refused_connection() {
        // bind then drop to obtain an address nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let result = TcpTransportFactory.connect(&address).await;
        assert!(result.is_err());
    }
}
