//! Game action endpoints

use crate::game::GameStore;
use crate::persistence::PlayerRepository;
use crate::service::converters::{
    convert_attack_outcome_to_proto, convert_monster_to_proto, convert_player_to_proto,
};
use slayer_proto::*;
use std::sync::Arc;
use tonic::{Request, Response, Status};

pub struct GameEndpoints<R: PlayerRepository> {
    store: Arc<GameStore<R>>,
}

impl<R> GameEndpoints<R>
where
    R: PlayerRepository + 'static,
{
    pub fn new(store: Arc<GameStore<R>>) -> Self {
        Self { store }
    }

    pub async fn join_game(
        &self,
        request: Request<JoinGameRequest>,
    ) -> Result<Response<JoinGameResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(player = %req.player_name, "RPC join_game");

        let (player, monster) = self.store.join(&req.player_name).await?;

        Ok(Response::new(JoinGameResponse {
            player: Some(convert_player_to_proto(&player)),
            monster: Some(convert_monster_to_proto(&monster)),
        }))
    }

    pub async fn attack_monster(
        &self,
        request: Request<AttackRequest>,
    ) -> Result<Response<AttackResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(player = %req.player_name, damage = req.damage, "RPC attack_monster");

        let outcome = self.store.attack(&req.player_name, req.damage).await?;

        Ok(Response::new(convert_attack_outcome_to_proto(outcome)))
    }
}
