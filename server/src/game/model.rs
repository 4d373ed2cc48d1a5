use serde::{Deserialize, Serialize};

use crate::persistence::now_timestamp;

/// Bonus experience granted for landing the killing blow.
pub const KILL_EXPERIENCE_BONUS: i64 = 100;

const DEFAULT_MONSTER_NAME: &str = "Dragon";
const DEFAULT_MONSTER_HEALTH: i64 = 10_000;
const DEFAULT_MONSTER_LEVEL: i32 = 1;
const DEFAULT_LOOT_TABLE: [&str; 5] = ["sword", "shield", "potion", "bow", "armor"];
const STARTING_PLAYER_LEVEL: i32 = 1;

/// A persisted player record, keyed by `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub total_clicks: i64,
    #[serde(default)]
    pub loot_collected: Vec<String>,
    #[serde(default = "starting_level")]
    pub level: i32,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub last_played: i64,
}

fn starting_level() -> i32 {
    STARTING_PLAYER_LEVEL
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_clicks: 0,
            loot_collected: Vec::new(),
            level: STARTING_PLAYER_LEVEL,
            experience: 0,
            last_played: now_timestamp(),
        }
    }

    /// Record one attack worth `damage` experience.
    pub fn record_attack(&mut self, damage: i64) {
        self.total_clicks += 1;
        self.experience += damage;
        self.last_played = now_timestamp();
    }

    /// Collect the reward for defeating a monster.
    pub fn collect_loot(&mut self, item: String) {
        self.loot_collected.push(item);
        self.experience += KILL_EXPERIENCE_BONUS;
    }
}

/// The single shared monster every player is attacking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub name: String,
    pub max_health: i64,
    pub current_health: i64,
    pub level: i32,
    pub loot_table: Vec<String>,
    pub last_updated: i64,
}

impl Monster {
    /// Spawn a fresh monster from the default template.
    pub fn spawn() -> Self {
        Self {
            name: DEFAULT_MONSTER_NAME.to_string(),
            max_health: DEFAULT_MONSTER_HEALTH,
            current_health: DEFAULT_MONSTER_HEALTH,
            level: DEFAULT_MONSTER_LEVEL,
            loot_table: DEFAULT_LOOT_TABLE.iter().map(|s| s.to_string()).collect(),
            last_updated: now_timestamp(),
        }
    }

    /// Apply damage and report whether the monster is now defeated.
    /// Health may drop below zero; the caller replaces a defeated monster.
    pub fn take_damage(&mut self, damage: i64) -> bool {
        self.current_health -= damage;
        self.last_updated = now_timestamp();
        self.is_defeated()
    }

    pub fn is_defeated(&self) -> bool {
        self.current_health <= 0
    }

    /// Loot is deterministic: the first entry of the table, which is never consumed.
    pub fn loot_drop(&self) -> Option<&str> {
        self.loot_table.first().map(String::as_str)
    }
}
