//! Repository trait for player records.
//!
//! The game store calls the repository while holding its write lock, so
//! implementations are synchronous and should keep the critical section short.

use super::PersistenceError;
use crate::game::PlayerMap;

/// Storage for the full set of player records.
pub trait PlayerRepository: Send + Sync {
    /// Load every stored player. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<PlayerMap>, PersistenceError>;

    /// Replace the stored players with `players`.
    fn save(&self, players: &PlayerMap) -> Result<(), PersistenceError>;
}
