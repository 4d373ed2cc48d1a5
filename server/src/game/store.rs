//! Authoritative game state shared by every request handler.
//!
//! A single `RwLock` guards players, the monster and click scores. Mutations
//! hold the write lock across the persistence write and the broadcast, so each
//! snapshot matches the mutation that produced it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::model::{Monster, Player};
use super::snapshot::{GameUpdate, Leaderboard, Score};
use super::subscribers::{SubscriberRegistry, Subscription};
use super::{GameError, PlayerMap};
use crate::persistence::{now_timestamp, PlayerRepository};

/// Result of a single attack.
#[derive(Debug, Clone)]
pub struct AttackOutcome {
    pub player: Player,
    /// The monster after the attack; a fresh one if this attack was the kill.
    pub monster: Monster,
    pub defeated: bool,
    pub loot: Option<String>,
}

pub(crate) struct GameState {
    players: PlayerMap,
    monster: Monster,
    scores: HashMap<String, i64>,
}

impl GameState {
    fn snapshot(&self) -> GameUpdate {
        GameUpdate {
            monster: self.monster.clone(),
            players: self.players.values().cloned().collect(),
            timestamp: now_timestamp(),
        }
    }

    fn leaderboard(&self) -> Leaderboard {
        Leaderboard::ranked(
            self.scores
                .iter()
                .map(|(player, score)| Score {
                    player: player.clone(),
                    score: *score,
                })
                .collect(),
        )
    }
}

/// Owns the game state, its persistence and the live feeds.
pub struct GameStore<R: PlayerRepository> {
    state: RwLock<GameState>,
    repository: R,
    updates: SubscriberRegistry<GameUpdate>,
    leaderboards: SubscriberRegistry<Leaderboard>,
}

impl<R: PlayerRepository> GameStore<R> {
    /// Load stored players and spawn the first monster. Never fails: a missing
    /// or unreadable player file starts the game with no players.
    pub fn open(repository: R) -> Self {
        let players = match repository.load() {
            Ok(Some(players)) => {
                tracing::info!(count = players.len(), "Loaded players");
                players
            }
            Ok(None) => {
                tracing::info!("No existing player data, starting fresh");
                PlayerMap::new()
            }
            Err(e) => {
                // The unreadable file is overwritten by the next save.
                tracing::warn!(error = %e, "Failed to load player data, starting fresh");
                PlayerMap::new()
            }
        };

        let monster = Monster::spawn();
        tracing::info!(monster = %monster.name, health = monster.max_health, "Created new monster");

        Self {
            state: RwLock::new(GameState {
                players,
                monster,
                scores: HashMap::new(),
            }),
            repository,
            updates: SubscriberRegistry::new(),
            leaderboards: SubscriberRegistry::new(),
        }
    }

    /// Return the named player, creating and persisting it on first join.
    /// Names are identities as given; no normalization is applied.
    pub async fn join(&self, name: &str) -> Result<(Player, Monster), GameError> {
        let mut state = self.state.write().await;

        if let Some(player) = state.players.get(name) {
            tracing::debug!(player = %name, "Existing player rejoined");
            return Ok((Player::clone(player), state.monster.clone()));
        }

        let player = Player::new(name);
        state
            .players
            .insert(name.to_string(), Arc::new(player.clone()));
        tracing::info!(player = %name, players = state.players.len(), "New player joined");

        self.persist(&state);
        self.broadcast_update(&mut state);

        Ok((player, state.monster.clone()))
    }

    /// Hit the monster for `damage`. A killing blow awards the first loot
    /// table entry plus bonus experience and replaces the monster.
    pub async fn attack(&self, name: &str, damage: i32) -> Result<AttackOutcome, GameError> {
        if damage < 0 {
            return Err(GameError::InvalidArgument(format!(
                "damage must not be negative, got {damage}"
            )));
        }
        let damage = i64::from(damage);

        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let entry = state
            .players
            .get_mut(name)
            .ok_or_else(|| GameError::PlayerNotFound(name.to_string()))?;
        let player = Arc::make_mut(entry);
        player.record_attack(damage);

        let defeated = state.monster.take_damage(damage);
        let mut loot = None;
        if defeated {
            if let Some(item) = state.monster.loot_drop().map(str::to_string) {
                player.collect_loot(item.clone());
                loot = Some(item);
            }
            let slain = std::mem::replace(&mut state.monster, Monster::spawn());
            tracing::info!(
                player = %name,
                monster = %slain.name,
                loot = ?loot,
                "Monster defeated, spawned a new one"
            );
        }
        let player = player.clone();

        self.persist(state);
        self.broadcast_update(state);

        Ok(AttackOutcome {
            player,
            monster: state.monster.clone(),
            defeated,
            loot,
        })
    }

    /// Add clicks to a player's race score and return the new total.
    pub async fn add_clicks(&self, player: &str, amount: i32) -> Result<Score, GameError> {
        if amount < 0 {
            return Err(GameError::InvalidArgument(format!(
                "click amount must not be negative, got {amount}"
            )));
        }

        let mut state = self.state.write().await;
        let total = state.scores.entry(player.to_string()).or_insert(0);
        *total += i64::from(amount);
        let score = Score {
            player: player.to_string(),
            score: *total,
        };

        self.broadcast_leaderboard(&mut state);
        Ok(score)
    }

    /// Register a game update feed and return it with the current state.
    /// Broadcasts need the write lock, so none can run between the two and
    /// the feed starts exactly where the initial snapshot ends.
    pub async fn subscribe_updates(&self) -> (Arc<GameUpdate>, Subscription<GameUpdate>) {
        let state = self.state.read().await;
        let subscription = self.updates.subscribe();
        (Arc::new(state.snapshot()), subscription)
    }

    /// Register a leaderboard feed and return it with the current standings.
    pub async fn subscribe_leaderboard(&self) -> (Arc<Leaderboard>, Subscription<Leaderboard>) {
        let state = self.state.read().await;
        let subscription = self.leaderboards.subscribe();
        (Arc::new(state.leaderboard()), subscription)
    }

    pub fn update_feed(&self) -> &SubscriberRegistry<GameUpdate> {
        &self.updates
    }

    pub fn leaderboard_feed(&self) -> &SubscriberRegistry<Leaderboard> {
        &self.leaderboards
    }

    /// Write every player. Failures are logged; memory stays authoritative.
    fn persist(&self, state: &GameState) {
        if let Err(e) = self.repository.save(&state.players) {
            tracing::warn!(error = %e, players = state.players.len(), "Failed to save player data");
        }
    }

    /// Takes the state mutably so only a write-lock holder can broadcast.
    fn broadcast_update(&self, state: &mut GameState) {
        if self.updates.is_empty() {
            return;
        }
        let delivery = self.updates.publish(Arc::new(state.snapshot()));
        tracing::debug!(
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            pruned = delivery.pruned,
            "Broadcast game update"
        );
    }

    fn broadcast_leaderboard(&self, state: &mut GameState) {
        if self.leaderboards.is_empty() {
            return;
        }
        let delivery = self.leaderboards.publish(Arc::new(state.leaderboard()));
        tracing::debug!(
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            pruned = delivery.pruned,
            "Broadcast leaderboard"
        );
    }
}

#[cfg(test)]
impl<R: PlayerRepository> GameStore<R> {
    pub(crate) async fn snapshot(&self) -> GameUpdate {
        self.state.read().await.snapshot()
    }

    pub(crate) async fn leaderboard(&self) -> Leaderboard {
        self.state.read().await.leaderboard()
    }

    pub(crate) async fn player(&self, name: &str) -> Option<Player> {
        self.state
            .read()
            .await
            .players
            .get(name)
            .map(|p| Player::clone(p))
    }

    pub(crate) async fn monster(&self) -> Monster {
        self.state.read().await.monster.clone()
    }
}
