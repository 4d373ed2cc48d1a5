//! gRPC service implementations with modular organization
//!
//! - converters: Domain model → Proto conversions
//! - endpoints: Handlers grouped by domain
//! - feed: The per-client push loop shared by streaming endpoints

pub mod converters;
pub mod endpoints;
pub mod feed;

use crate::game::GameStore;
use crate::persistence::PlayerRepository;
use endpoints::clicks::ScoreStream;
use endpoints::events::{GameUpdateStream, LeaderboardStream};
use endpoints::{ClickEndpoints, EventsEndpoints, GameEndpoints};
use slayer_proto::click_race_server::ClickRace;
use slayer_proto::monster_slayer_server::MonsterSlayer;
use slayer_proto::*;
use std::sync::Arc;
use tonic::{Request, Response, Status, Streaming};

/// Implementation of the MonsterSlayer gRPC service
pub struct MonsterSlayerService<R: PlayerRepository> {
    game: GameEndpoints<R>,
    events: EventsEndpoints<R>,
}

impl<R> MonsterSlayerService<R>
where
    R: PlayerRepository + 'static,
{
    pub fn new(store: Arc<GameStore<R>>) -> Self {
        Self {
            game: GameEndpoints::new(store.clone()),
            events: EventsEndpoints::new(store),
        }
    }
}

#[tonic::async_trait]
impl<R> MonsterSlayer for MonsterSlayerService<R>
where
    R: PlayerRepository + 'static,
{
    async fn join_game(
        &self,
        request: Request<JoinGameRequest>,
    ) -> Result<Response<JoinGameResponse>, Status> {
        self.game.join_game(request).await
    }

    async fn attack_monster(
        &self,
        request: Request<AttackRequest>,
    ) -> Result<Response<AttackResponse>, Status> {
        self.game.attack_monster(request).await
    }

    type StreamGameUpdatesStream = GameUpdateStream;

    async fn stream_game_updates(
        &self,
        request: Request<Empty>,
    ) -> Result<Response<Self::StreamGameUpdatesStream>, Status> {
        self.events.stream_game_updates(request).await
    }
}

/// Implementation of the ClickRace gRPC service
pub struct ClickRaceService<R: PlayerRepository> {
    clicks: ClickEndpoints<R>,
    events: EventsEndpoints<R>,
}

impl<R> ClickRaceService<R>
where
    R: PlayerRepository + 'static,
{
    pub fn new(store: Arc<GameStore<R>>) -> Self {
        Self {
            clicks: ClickEndpoints::new(store.clone()),
            events: EventsEndpoints::new(store),
        }
    }
}

#[tonic::async_trait]
impl<R> ClickRace for ClickRaceService<R>
where
    R: PlayerRepository + 'static,
{
    type SendClicksStream = ScoreStream;

    async fn send_clicks(
        &self,
        request: Request<Streaming<Click>>,
    ) -> Result<Response<Self::SendClicksStream>, Status> {
        self.clicks.send_clicks(request.into_inner()).await
    }

    type GetLeaderboardStream = LeaderboardStream;

    async fn get_leaderboard(
        &self,
        request: Request<Empty>,
    ) -> Result<Response<Self::GetLeaderboardStream>, Status> {
        self.events.get_leaderboard(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::JsonPlayerStore;
    use slayer_proto::click_race_server::ClickRaceServer;
    use slayer_proto::monster_slayer_client::MonsterSlayerClient;
    use slayer_proto::monster_slayer_server::MonsterSlayerServer;
    use std::time::Duration;
    use tokio_stream::wrappers::TcpListenerStream;
    use tokio_stream::StreamExt;
    use tonic::Code;

    fn test_store() -> Arc<GameStore<JsonPlayerStore>> {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonPlayerStore::new(dir.path().join("players.json"));
        std::mem::forget(dir);
        Arc::new(GameStore::open(repository))
    }

    fn join(name: &str) -> Request<JoinGameRequest> {
        Request::new(JoinGameRequest {
            player_name: name.to_string(),
        })
    }

    fn attack(name: &str, damage: i32) -> Request<AttackRequest> {
        Request::new(AttackRequest {
            player_name: name.to_string(),
            damage,
        })
    }

    #[tokio::test]
    async fn test_join_then_killing_blow() {
        let service = MonsterSlayerService::new(test_store());

        let joined = service.join_game(join("alice")).await.unwrap().into_inner();
        assert_eq!(joined.player.unwrap().name, "alice");
        assert_eq!(joined.monster.unwrap().current_health, 10_000);

        let resp = service
            .attack_monster(attack("alice", 10_000))
            .await
            .unwrap()
            .into_inner();
        assert!(resp.monster_defeated);
        assert_eq!(resp.loot_gained, "sword");
        assert_eq!(resp.monster.unwrap().current_health, 10_000);
        let player = resp.player.unwrap();
        assert_eq!(player.experience, 10_100);
        assert_eq!(player.loot_collected, vec!["sword".to_string()]);
    }

    #[tokio::test]
    async fn test_attack_unknown_player_is_not_found() {
        let service = MonsterSlayerService::new(test_store());
        let status = service.attack_monster(attack("nobody", 1)).await.unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_padded_name_is_a_separate_player() {
        let service = MonsterSlayerService::new(test_store());
        service.join_game(join("alice")).await.unwrap();
        let padded = service.join_game(join(" alice")).await.unwrap().into_inner();
        assert_eq!(padded.player.unwrap().name, " alice");

        let resp = service
            .attack_monster(attack(" alice", 3))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(resp.player.unwrap().name, " alice");

        let status = service.attack_monster(attack("alice ", 1)).await.unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_stream_sends_initial_state_then_updates() {
        let store = test_store();
        let service = MonsterSlayerService::new(store.clone());
        service.join_game(join("alice")).await.unwrap();

        let mut stream = service
            .stream_game_updates(Request::new(Empty {}))
            .await
            .unwrap()
            .into_inner();

        let initial = stream.next().await.unwrap().unwrap();
        assert_eq!(initial.players.len(), 1);
        assert_eq!(initial.monster.unwrap().current_health, 10_000);

        service.attack_monster(attack("alice", 25)).await.unwrap();
        let update = stream.next().await.unwrap().unwrap();
        assert_eq!(update.monster.unwrap().current_health, 9_975);
        assert_eq!(update.players[0].total_clicks, 1);
    }

    #[tokio::test]
    async fn test_dropped_stream_is_deregistered() {
        let store = test_store();
        let service = MonsterSlayerService::new(store.clone());
        service.join_game(join("alice")).await.unwrap();

        let mut stream = service
            .stream_game_updates(Request::new(Empty {}))
            .await
            .unwrap()
            .into_inner();
        stream.next().await.unwrap().unwrap();
        assert_eq!(store.update_feed().len(), 1);
        drop(stream);

        // The feed notices the disconnect on its next send.
        for _ in 0..50 {
            service.attack_monster(attack("alice", 1)).await.unwrap();
            if store.update_feed().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.update_feed().is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_stream_follows_clicks() {
        let store = test_store();
        let service = ClickRaceService::new(store.clone());

        let mut board = service
            .get_leaderboard(Request::new(Empty {}))
            .await
            .unwrap()
            .into_inner();
        assert!(board.next().await.unwrap().unwrap().scores.is_empty());

        store.add_clicks("alice", 2).await.unwrap();
        let update = board.next().await.unwrap().unwrap();
        assert_eq!(update.scores.len(), 1);
        assert_eq!(update.scores[0].player, "alice");
        assert_eq!(update.scores[0].score, 2);
    }

    #[tokio::test]
    async fn test_end_to_end_over_tcp() {
        let store = test_store();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tonic::transport::Server::builder()
            .add_service(MonsterSlayerServer::new(MonsterSlayerService::new(
                store.clone(),
            )))
            .add_service(ClickRaceServer::new(ClickRaceService::new(store.clone())))
            .serve_with_incoming(TcpListenerStream::new(listener));
        tokio::spawn(server);

        let mut client = MonsterSlayerClient::connect(format!("http://{}", addr))
            .await
            .unwrap();

        let mut updates = client
            .stream_game_updates(Empty {})
            .await
            .unwrap()
            .into_inner();
        let initial = updates.message().await.unwrap().unwrap();
        assert!(initial.players.is_empty());

        client
            .join_game(JoinGameRequest {
                player_name: "alice".to_string(),
            })
            .await
            .unwrap();
        let resp = client
            .attack_monster(AttackRequest {
                player_name: "alice".to_string(),
                damage: 10_000,
            })
            .await
            .unwrap()
            .into_inner();
        assert!(resp.monster_defeated);
        assert_eq!(resp.loot_gained, "sword");
        assert_eq!(resp.monster.unwrap().current_health, 10_000);

        let missing = client
            .attack_monster(AttackRequest {
                player_name: "mallory".to_string(),
                damage: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(missing.code(), Code::NotFound);

        // The join broadcast reaches the watcher first.
        let joined = updates.message().await.unwrap().unwrap();
        assert_eq!(joined.players[0].name, "alice");
    }
}
