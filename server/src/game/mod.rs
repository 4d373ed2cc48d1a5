pub mod model;
pub mod snapshot;
pub mod store;
pub mod subscribers;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use model::{Monster, Player};
pub use snapshot::{GameUpdate, Leaderboard, Score};
pub use store::{AttackOutcome, GameStore};
pub use subscribers::{SubscriberRegistry, Subscription};

/// All known players keyed by name. Entries are shared copy-on-write with
/// snapshots that are still in flight.
pub type PlayerMap = BTreeMap<String, Arc<Player>>;

/// Errors surfaced to RPC callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
