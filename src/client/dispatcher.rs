//! # Client Session Dispatcher
//!
//! `create_client` returns immediately; the connection, transport
//! handshake, and capability exchange run on a spawned task. The returned
//! future resolves exactly once with a usable session or a typed failure.
//! No half-open session is ever exposed through the success path.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::timeout;

use super::config::ClientSessionConfig;
use super::errors::{DispatchError, DispatchResult};
use super::handshake;
use super::session::ClientSession;
use super::transport::{TcpTransportFactory, TransportFactory};

/// Where a dispatch attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Attempt not yet started
    Idle,
    /// Establishing the transport connection
    Connecting,
    /// Exchanging hello messages
    NegotiatingCapabilities,
    /// Terminal: session handed to the caller
    Established,
    /// Terminal: attempt failed
    Failed,
    /// Terminal: attempt cancelled before resolution
    Cancelled,
}

impl DispatchState {
    /// True for `Established`, `Failed`, and `Cancelled`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Established | Self::Failed | Self::Cancelled)
    }
}

/// Creates client sessions against remote endpoints
pub struct ClientDispatcher<F = TcpTransportFactory> {
    factory: Arc<F>,
}

impl<F> Clone for ClientDispatcher<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl ClientDispatcher<TcpTransportFactory> {
    /// Dispatcher over plain TCP transports
    pub fn new() -> Self {
        Self::with_factory(TcpTransportFactory)
    }
}

impl Default for ClientDispatcher<TcpTransportFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: TransportFactory> ClientDispatcher<F> {
    /// Dispatcher over a caller-supplied transport factory
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Start establishing a session; never blocks the caller
    ///
    /// The attempt runs on the ambient tokio runtime. Dropping the
    /// returned future without awaiting it cancels the attempt and
    /// releases any partially-established transport.
    pub fn create_client(&self, config: ClientSessionConfig) -> SessionFuture {
        let (result_tx, result_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let (state_tx, state_rx) = watch::channel(DispatchState::Idle);
        let factory = Arc::clone(&self.factory);

        tokio::spawn(async move {
            let outcome = tokio::select! {
                // fires on explicit cancel and on SessionFuture drop
                _ = cancel_rx => {
                    tracing::debug!(address = %config.address, "dispatch cancelled");
                    Err(DispatchError::Cancelled)
                }
                outcome = establish(factory, &config, &state_tx) => outcome,
            };
            // a cancelled or timed-out establish future was dropped above,
            // and its transport with it, before the result settles
            let terminal = match &outcome {
                Ok(_) => DispatchState::Established,
                Err(DispatchError::Cancelled) => DispatchState::Cancelled,
                Err(error) => {
                    tracing::debug!(stage = error.stage(), %error, "dispatch failed");
                    DispatchState::Failed
                }
            };
            let _ = state_tx.send(terminal);
            let _ = result_tx.send(outcome);
        });

        SessionFuture {
            result: result_rx,
            cancel: Some(cancel_tx),
            state: state_rx,
        }
    }
}

async fn establish<F: TransportFactory>(
    factory: Arc<F>,
    config: &ClientSessionConfig,
    state: &watch::Sender<DispatchState>,
) -> DispatchResult<ClientSession> {
    let _ = state.send(DispatchState::Connecting);
    tracing::debug!(address = %config.address, "connecting");
    let connect_secs = config.connect_timeout_secs;
    let transport = match timeout(
        Duration::from_secs(connect_secs),
        factory.connect(&config.address),
    )
    .await
    {
        Err(_) => return Err(DispatchError::Timeout { secs: connect_secs }),
        Ok(Err(error)) => return Err(DispatchError::ConnectFailed(error.to_string())),
        Ok(Ok(transport)) => transport,
    };

    let _ = state.send(DispatchState::NegotiatingCapabilities);
    let handshake_secs = config.handshake_timeout_secs;
    match timeout(
        Duration::from_secs(handshake_secs),
        handshake::run(transport, config),
    )
    .await
    {
        Err(_) => Err(DispatchError::Timeout {
            secs: handshake_secs,
        }),
        Ok(outcome) => outcome,
    }
}

/// Pending result of `create_client`
///
/// Resolves exactly once. Cancellation is safe at any point before
/// resolution and guarantees the future resolves `Cancelled`.
pub struct SessionFuture {
    result: oneshot::Receiver<DispatchResult<ClientSession>>,
    cancel: Option<oneshot::Sender<()>>,
    state: watch::Receiver<DispatchState>,
}

impl SessionFuture {
    /// Cancel the attempt
    ///
    /// A no-op once the attempt has already reached a terminal state.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Current stage of the attempt
    pub fn state(&self) -> DispatchState {
        *self.state.borrow()
    }
}

impl Future for SessionFuture {
    type Output = DispatchResult<ClientSession>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.result).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // the dispatch task never drops the sender before resolving,
            // so this only covers a torn-down runtime
            Poll::Ready(Err(_)) => Poll::Ready(Err(DispatchError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for SessionFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFuture")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
