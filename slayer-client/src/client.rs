//! Slayer gRPC client implementation

use crate::error::{ClientError, ClientResult};
use slayer_proto::click_race_client::ClickRaceClient;
use slayer_proto::monster_slayer_client::MonsterSlayerClient;
use slayer_proto::*;
use tonic::transport::Channel;
use tonic::Streaming;

/// Player and monster returned by a join.
#[derive(Debug, Clone)]
pub struct Joined {
    pub player: Player,
    pub monster: Monster,
}

/// Outcome of one attack, with the optional proto fields resolved.
#[derive(Debug, Clone)]
pub struct Attacked {
    pub player: Player,
    pub monster: Monster,
    pub defeated: bool,
    pub loot: Option<String>,
}

/// Network client for both game services on one connection
pub struct SlayerClient {
    game: MonsterSlayerClient<Channel>,
    race: ClickRaceClient<Channel>,
}

impl SlayerClient {
    /// Connect to the game server
    pub async fn connect(addr: &str) -> ClientResult<Self> {
        let channel = Channel::from_shared(addr.to_string())
            .map_err(|e| ClientError::InvalidAddress(e.to_string()))?
            .connect()
            .await?;

        Ok(Self {
            game: MonsterSlayerClient::new(channel.clone()),
            race: ClickRaceClient::new(channel),
        })
    }

    /// Join the game, creating the player on first use
    pub async fn join_game(&mut self, name: &str) -> ClientResult<Joined> {
        let request = JoinGameRequest {
            player_name: name.to_string(),
        };
        let response = self.game.join_game(request).await?.into_inner();

        Ok(Joined {
            player: required(response.player, "player")?,
            monster: required(response.monster, "monster")?,
        })
    }

    /// Attack the shared monster
    pub async fn attack(&mut self, name: &str, damage: i32) -> ClientResult<Attacked> {
        let request = AttackRequest {
            player_name: name.to_string(),
            damage,
        };
        let response = self.game.attack_monster(request).await?.into_inner();

        Ok(Attacked {
            player: required(response.player, "player")?,
            monster: required(response.monster, "monster")?,
            defeated: response.monster_defeated,
            loot: Some(response.loot_gained).filter(|loot| !loot.is_empty()),
        })
    }

    /// Open the live game update feed
    pub async fn stream_game_updates(&mut self) -> ClientResult<Streaming<GameUpdate>> {
        let response = self.game.stream_game_updates(Empty {}).await?;
        Ok(response.into_inner())
    }

    /// Send a batch of clicks for `player`; the server answers each one with
    /// the running score.
    pub async fn send_clicks(
        &mut self,
        player: &str,
        amounts: Vec<i32>,
    ) -> ClientResult<Streaming<Score>> {
        let clicks: Vec<Click> = amounts
            .into_iter()
            .map(|amount| Click {
                player: player.to_string(),
                amount,
            })
            .collect();
        let response = self.race.send_clicks(tokio_stream::iter(clicks)).await?;
        Ok(response.into_inner())
    }

    /// Open the live leaderboard feed
    pub async fn leaderboard(&mut self) -> ClientResult<Streaming<Leaderboard>> {
        let response = self.race.get_leaderboard(Empty {}).await?;
        Ok(response.into_inner())
    }
}

fn required<T>(field: Option<T>, name: &str) -> ClientResult<T> {
    field.ok_or_else(|| ClientError::InvalidData(format!("missing {name}")))
}
