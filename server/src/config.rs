//! Configuration for the Monster Slayer server
//!
//! Every value has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default directory holding the player file: the working directory.
const DEFAULT_DATA_DIR: &str = ".";

/// Name of the player file inside the data directory.
const PLAYERS_FILE_NAME: &str = "players.json";

/// Default address for the gRPC listener.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:50051";

/// Get the data directory for persistence.
///
/// Priority:
/// 1. `SLAYER_DATA_DIR` env variable if set
/// 2. the current working directory
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SLAYER_DATA_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Get the path of the JSON file holding every player.
pub fn get_players_path() -> PathBuf {
    get_data_dir().join(PLAYERS_FILE_NAME)
}

/// Get the address the gRPC server listens on.
///
/// Priority:
/// 1. `SLAYER_LISTEN_ADDR` env variable if set
/// 2. `0.0.0.0:50051` as fallback
pub fn get_listen_addr() -> Result<SocketAddr, std::net::AddrParseError> {
    std::env::var("SLAYER_LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_players_path() {
        let path = get_players_path();
        assert!(path.ends_with(PLAYERS_FILE_NAME));
        match std::env::var("SLAYER_DATA_DIR") {
            Ok(val) => assert_eq!(path, PathBuf::from(val).join(PLAYERS_FILE_NAME)),
            Err(_) => assert_eq!(path, PathBuf::from(DEFAULT_DATA_DIR).join(PLAYERS_FILE_NAME)),
        }
    }

    #[test]
    fn test_get_listen_addr_default() {
        if std::env::var("SLAYER_LISTEN_ADDR").is_err() {
            let addr = get_listen_addr().unwrap();
            assert_eq!(addr.port(), 50051);
        }
    }

    #[test]
    fn test_default_listen_addr_parses() {
        assert!(DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().is_ok());
    }
}
