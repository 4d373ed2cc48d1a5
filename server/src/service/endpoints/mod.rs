//! Endpoint handlers organized by domain

pub mod clicks;
pub mod events;
pub mod game;

pub use clicks::ClickEndpoints;
pub use events::EventsEndpoints;
pub use game::GameEndpoints;
