//! Session configuration structures and loaders.
use std::env;

/// Knobs shared by player and spectator sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Seed for duel rolls; random per process when unset.
    pub game_seed: Option<u64>,
    pub message_capacity: usize,
    /// Start a fresh turn whenever the server publishes a round update.
    pub reset_turn_on_update: bool,
    /// Spectator boards show one character per label.
    pub spectator_condensed: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_seed: None,
            message_capacity: 64,
            reset_turn_on_update: true,
            spectator_condensed: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `GAME_SEED` - duel roll seed (default: random)
    /// - `MESSAGE_LOG_CAPACITY` - message log capacity (default: 64)
    /// - `RESET_TURN_ON_UPDATE` - new turn on every round update (default: true)
    /// - `SPECTATOR_CONDENSED` - condensed spectator labels (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("GAME_SEED") {
            config.game_seed = Some(seed);
        }
        if let Some(capacity) = read_env::<usize>("MESSAGE_LOG_CAPACITY") {
            config.message_capacity = capacity.max(1);
        }
        if let Some(reset) = read_env_bool("RESET_TURN_ON_UPDATE") {
            config.reset_turn_on_update = reset;
        }
        if let Some(condensed) = read_env_bool("SPECTATOR_CONDENSED") {
            config.spectator_condensed = condensed;
        }

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game_seed = Some(seed);
        self
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.game_seed.unwrap_or_else(rand::random)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
