//! Server-push feed endpoints

use crate::game::GameStore;
use crate::persistence::PlayerRepository;
use crate::service::converters::{convert_game_update_to_proto, convert_leaderboard_to_proto};
use crate::service::feed::{run_feed, GrpcSink, OUTBOUND_BUFFER};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tonic::{Request, Response, Status};
use tracing::Instrument;

pub type GameUpdateStream =
    Pin<Box<dyn Stream<Item = Result<slayer_proto::GameUpdate, Status>> + Send>>;
pub type LeaderboardStream =
    Pin<Box<dyn Stream<Item = Result<slayer_proto::Leaderboard, Status>> + Send>>;

pub struct EventsEndpoints<R: PlayerRepository> {
    store: Arc<GameStore<R>>,
}

impl<R> EventsEndpoints<R>
where
    R: PlayerRepository + 'static,
{
    pub fn new(store: Arc<GameStore<R>>) -> Self {
        Self { store }
    }

    pub async fn stream_game_updates(
        &self,
        _request: Request<slayer_proto::Empty>,
    ) -> Result<Response<GameUpdateStream>, Status> {
        tracing::info!("RPC stream_game_updates");

        // Registration and the initial snapshot happen before the response is
        // returned, so the client never misses a change made after this call.
        let (initial, subscription) = self.store.subscribe_updates().await;
        let span = tracing::info_span!("game_feed", subscription = %subscription.id());

        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let store = self.store.clone();
        tokio::spawn(
            async move {
                let mut sink = GrpcSink::new(tx, convert_game_update_to_proto);
                let _ = run_feed(store.update_feed(), initial, subscription, &mut sink).await;
            }
            .instrument(span),
        );

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    pub async fn get_leaderboard(
        &self,
        _request: Request<slayer_proto::Empty>,
    ) -> Result<Response<LeaderboardStream>, Status> {
        tracing::info!("RPC get_leaderboard");

        let (initial, subscription) = self.store.subscribe_leaderboard().await;
        let span = tracing::info_span!("leaderboard_feed", subscription = %subscription.id());

        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let store = self.store.clone();
        tokio::spawn(
            async move {
                let mut sink = GrpcSink::new(tx, convert_leaderboard_to_proto);
                let _ = run_feed(store.leaderboard_feed(), initial, subscription, &mut sink).await;
            }
            .instrument(span),
        );

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}
