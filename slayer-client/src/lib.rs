//! Monster Slayer gRPC client library
//!
//! Provides a high-level async client for communicating with slayer-server.
//!
//! # Example
//!
//! ```no_run
//! use slayer_client::SlayerClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = SlayerClient::connect("http://localhost:50051").await?;
//!     let joined = client.join_game("alice").await?;
//!     println!("{} joined", joined.player.name);
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{Attacked, Joined, SlayerClient};
pub use error::{ClientError, ClientResult};

// Re-export proto types for convenience
pub use slayer_proto::*;
