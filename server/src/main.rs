mod config;
mod game;
mod persistence;
mod service;

use anyhow::Context;
use game::GameStore;
use persistence::JsonPlayerStore;
use service::{ClickRaceService, MonsterSlayerService};
use slayer_proto::click_race_server::ClickRaceServer;
use slayer_proto::monster_slayer_server::MonsterSlayerServer;
use std::sync::Arc;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with span durations
    use tracing_subscriber::fmt::format::FmtSpan;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!("Starting Monster Slayer gRPC server");

    let repository = JsonPlayerStore::new(config::get_players_path());
    tracing::info!("Using player file: {}", repository.path().display());

    let store = Arc::new(GameStore::open(repository));

    let addr = config::get_listen_addr().context("invalid SLAYER_LISTEN_ADDR")?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Services: MonsterSlayer (JoinGame, AttackMonster, StreamGameUpdates), ClickRace (SendClicks, GetLeaderboard)");

    Server::builder()
        .add_service(MonsterSlayerServer::new(MonsterSlayerService::new(
            store.clone(),
        )))
        .add_service(ClickRaceServer::new(ClickRaceService::new(store)))
        .serve(addr)
        .await
        .context("gRPC server failed")?;

    Ok(())
}
