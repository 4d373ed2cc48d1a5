//! Per-client streaming loop shared by every server-push RPC.
//!
//! A feed sends the initial snapshot, then forwards whatever its subscription
//! receives. The first failed send deregisters the subscription and ends the
//! loop with the transport error. If the registry drops the subscription the
//! loop ends cleanly.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tonic::Status;

use crate::game::{SubscriberRegistry, Subscription};

/// Buffer between a feed loop and the gRPC response stream. Kept at one so a
/// slow client stalls its own loop instead of queueing snapshots.
pub const OUTBOUND_BUFFER: usize = 1;

/// The client on the other end of a feed is gone.
#[derive(Debug, thiserror::Error)]
#[error("Feed receiver disconnected")]
pub struct TransportError;

/// Destination of a feed: pushes messages onto one open client stream.
pub trait FeedSink<T>: Send {
    fn send(&mut self, item: Arc<T>) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Converts domain snapshots to proto messages and hands them to tonic.
pub struct GrpcSink<T, P> {
    tx: mpsc::Sender<Result<P, Status>>,
    convert: fn(&T) -> P,
}

impl<T, P> GrpcSink<T, P> {
    pub fn new(tx: mpsc::Sender<Result<P, Status>>, convert: fn(&T) -> P) -> Self {
        Self { tx, convert }
    }
}

impl<T, P> FeedSink<T> for GrpcSink<T, P>
where
    T: Send + Sync,
    P: Send,
{
    async fn send(&mut self, item: Arc<T>) -> Result<(), TransportError> {
        let message = (self.convert)(&item);
        self.tx.send(Ok(message)).await.map_err(|_| TransportError)
    }
}

/// Drive one feed until the client disconnects or the registry closes it.
pub async fn run_feed<T, S>(
    registry: &SubscriberRegistry<T>,
    initial: Arc<T>,
    mut subscription: Subscription<T>,
    sink: &mut S,
) -> Result<(), TransportError>
where
    S: FeedSink<T>,
{
    let id = subscription.id();
    tracing::info!(subscription = %id, "Feed opened");

    if let Err(e) = sink.send(initial).await {
        tracing::info!(subscription = %id, "Client left before initial snapshot");
        registry.unsubscribe(id);
        return Err(e);
    }

    while let Some(update) = subscription.recv().await {
        if let Err(e) = sink.send(update).await {
            tracing::info!(subscription = %id, "Client disconnected, closing feed");
            registry.unsubscribe(id);
            return Err(e);
        }
    }

    tracing::info!(subscription = %id, "Feed closed by server");
    Ok(())
}
