use super::traits::PlayerRepository;
use super::PersistenceError;
use crate::game::PlayerMap;
use std::path::{Path, PathBuf};

/// Single-file JSON store holding every player, keyed by name.
///
/// The whole file is rewritten on each save. There is no staging file, so a
/// crash mid-write can leave a truncated file behind.
pub struct JsonPlayerStore {
    path: PathBuf,
}

impl JsonPlayerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl PlayerRepository for JsonPlayerStore {
    fn load(&self) -> Result<Option<PlayerMap>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let players = serde_json::from_str(&contents)?;
        Ok(Some(players))
    }

    fn save(&self, players: &PlayerMap) -> Result<(), PersistenceError> {
        self.ensure_parent_dir()?;
        let json = serde_json::to_string_pretty(players)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::model::Player;
    use std::sync::Arc;

    fn sample_players() -> PlayerMap {
        let mut alice = Player::new("alice");
        alice.total_clicks = 3;
        alice.experience = 130;
        alice.loot_collected.push("sword".to_string());
        let bob = Player::new("bob");

        let mut players = PlayerMap::new();
        players.insert(alice.name.clone(), Arc::new(alice));
        players.insert(bob.name.clone(), Arc::new(bob));
        players
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPlayerStore::new(dir.path().join("players.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPlayerStore::new(dir.path().join("players.json"));
        let players = sample_players();

        store.save(&players).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, players);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPlayerStore::new(dir.path().join("nested/data/players.json"));
        store.save(&sample_players()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_saved_file_is_indented_map_keyed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPlayerStore::new(dir.path().join("players.json"));
        store.save(&sample_players()).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["alice"]["total_clicks"], 3);
        assert_eq!(value["alice"]["loot_collected"][0], "sword");
        assert_eq!(value["bob"]["level"], 1);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPlayerStore::new(dir.path().join("players.json"));
        store.save(&sample_players()).unwrap();

        let mut only_carol = PlayerMap::new();
        only_carol.insert("carol".to_string(), Arc::new(Player::new("carol")));
        store.save(&only_carol).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("carol"));
    }

    #[test]
    fn test_load_corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonPlayerStore::new(path);
        assert!(matches!(store.load(), Err(PersistenceError::Json(_))));
    }
}
