//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use game_core::PlayerId;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Recorded feed to replay.
    pub feed_path: PathBuf,
    /// Local player; spectator mode when absent.
    pub player_id: Option<PlayerId>,
    /// Label used for the log directory and banner.
    pub room_id: Option<String>,
}

impl ClientConfig {
    /// Reads `FEED_PATH` (required), `PLAYER_ID` and `ROOM_ID`.
    pub fn from_env() -> Result<Self> {
        let feed_path = env::var_os("FEED_PATH")
            .map(PathBuf::from)
            .context("FEED_PATH must point at a recorded room feed")?;
        Ok(Self {
            feed_path,
            player_id: non_empty("PLAYER_ID").map(PlayerId::new),
            room_id: non_empty("ROOM_ID"),
        })
    }

    pub fn room_label(&self) -> &str {
        self.room_id.as_deref().unwrap_or("local")
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
