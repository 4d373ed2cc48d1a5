//! Conversion functions from domain types to protobuf types

use crate::game::{AttackOutcome, GameError, GameUpdate, Leaderboard, Monster, Player, Score};
use tonic::Status;

/// Convert a domain Player into the proto Player.
pub fn convert_player_to_proto(player: &Player) -> slayer_proto::Player {
    slayer_proto::Player {
        name: player.name.clone(),
        total_clicks: player.total_clicks,
        loot_collected: player.loot_collected.clone(),
        level: player.level,
        experience: player.experience,
        last_played: player.last_played,
    }
}

pub fn convert_monster_to_proto(monster: &Monster) -> slayer_proto::Monster {
    slayer_proto::Monster {
        name: monster.name.clone(),
        max_health: monster.max_health,
        current_health: monster.current_health,
        level: monster.level,
        loot_table: monster.loot_table.clone(),
        last_updated: monster.last_updated,
    }
}

/// Convert a snapshot into the proto GameUpdate pushed to watchers.
pub fn convert_game_update_to_proto(update: &GameUpdate) -> slayer_proto::GameUpdate {
    slayer_proto::GameUpdate {
        monster: Some(convert_monster_to_proto(&update.monster)),
        players: update
            .players
            .iter()
            .map(|p| convert_player_to_proto(p))
            .collect(),
        timestamp: update.timestamp,
    }
}

/// Missing loot is sent as an empty string.
pub fn convert_attack_outcome_to_proto(outcome: AttackOutcome) -> slayer_proto::AttackResponse {
    slayer_proto::AttackResponse {
        player: Some(convert_player_to_proto(&outcome.player)),
        monster: Some(convert_monster_to_proto(&outcome.monster)),
        monster_defeated: outcome.defeated,
        loot_gained: outcome.loot.unwrap_or_default(),
    }
}

pub fn convert_score_to_proto(score: &Score) -> slayer_proto::Score {
    slayer_proto::Score {
        player: score.player.clone(),
        score: score.score,
    }
}

pub fn convert_leaderboard_to_proto(board: &Leaderboard) -> slayer_proto::Leaderboard {
    slayer_proto::Leaderboard {
        scores: board.scores.iter().map(convert_score_to_proto).collect(),
    }
}

impl From<GameError> for Status {
    fn from(err: GameError) -> Self {
        match err {
            GameError::PlayerNotFound(_) => Status::not_found(err.to_string()),
            GameError::InvalidArgument(_) => Status::invalid_argument(err.to_string()),
        }
    }
}
