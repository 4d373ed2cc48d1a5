//! Click race endpoint: a bidirectional stream of clicks and running scores

use crate::game::GameStore;
use crate::persistence::PlayerRepository;
use crate::service::converters::convert_score_to_proto;
use crate::service::feed::OUTBOUND_BUFFER;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Response, Status};
use tracing::Instrument;

pub type ScoreStream = Pin<Box<dyn Stream<Item = Result<slayer_proto::Score, Status>> + Send>>;

pub struct ClickEndpoints<R: PlayerRepository> {
    store: Arc<GameStore<R>>,
}

impl<R> ClickEndpoints<R>
where
    R: PlayerRepository + 'static,
{
    pub fn new(store: Arc<GameStore<R>>) -> Self {
        Self { store }
    }

    /// Answer every click with the sender's new total. An invalid click ends
    /// the stream with an error status.
    pub async fn send_clicks<S>(&self, clicks: S) -> Result<Response<ScoreStream>, Status>
    where
        S: Stream<Item = Result<slayer_proto::Click, Status>> + Send + 'static,
    {
        tracing::info!("RPC send_clicks");

        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let store = self.store.clone();
        tokio::spawn(
            async move { forward_clicks(&store, clicks, tx).await }
                .instrument(tracing::info_span!("click_stream")),
        );

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}

async fn forward_clicks<R, S>(
    store: &GameStore<R>,
    clicks: S,
    tx: mpsc::Sender<Result<slayer_proto::Score, Status>>,
) where
    R: PlayerRepository,
    S: Stream<Item = Result<slayer_proto::Click, Status>>,
{
    let mut clicks = Box::pin(clicks);
    let mut count = 0usize;

    while let Some(click) = clicks.next().await {
        let click = match click {
            Ok(click) => click,
            Err(status) => {
                tracing::debug!(error = %status, "Click stream failed");
                break;
            }
        };

        let reply = store
            .add_clicks(&click.player, click.amount)
            .await
            .map(|score| convert_score_to_proto(&score))
            .map_err(Status::from);
        let rejected = reply.is_err();

        if tx.send(reply).await.is_err() {
            tracing::debug!("Client stopped reading scores");
            break;
        }
        if rejected {
            break;
        }
        count += 1;
    }

    tracing::info!(clicks = count, "Click stream finished");
}
