//! Read-only session for observers.
use tracing::{debug, info};

use game_core::{ChestInventory, GridEngine, RenderedGrid};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::feed::FeedEvent;

/// Mirrors the whole board without a local player.
#[derive(Clone, Debug, Default)]
pub struct SpectatorSession {
    condensed: bool,
    engine: Option<GridEngine>,
    waiting: Option<String>,
    phase: Option<String>,
}

impl SpectatorSession {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            condensed: config.spectator_condensed,
            ..Self::default()
        }
    }

    pub fn handle_event(&mut self, event: FeedEvent) -> Result<()> {
        match event {
            FeedEvent::Connected(snapshot) => {
                let engine =
                    GridEngine::from_snapshot(&snapshot).map_err(RuntimeError::InitialState)?;
                info!(players = engine.players().count(), "spectating board");
                self.engine = Some(engine);
                self.waiting = None;
            }
            FeedEvent::Update(batch) => {
                let engine = self.engine.as_mut().ok_or(RuntimeError::NotConnected)?;
                let applied = engine.apply_changes(&batch.changes);
                for (carrier, item) in batch.carried {
                    engine.set_carried_item(&carrier, Some(item));
                }
                debug!(applied, "spectator update applied");
            }
            FeedEvent::Waiting(text) => self.waiting = Some(text),
            FeedEvent::Phase(phase) => self.phase = Some(phase),
            FeedEvent::Fight(notice) => {
                debug!(attacker = %notice.attacker, defender = %notice.defender, "fight");
            }
            FeedEvent::Ping | FeedEvent::Unknown(_) => {}
        }
        Ok(())
    }

    /// The full board, condensed unless configured otherwise.
    pub fn render(&self) -> Option<RenderedGrid> {
        let engine = self.engine.as_ref()?;
        let dimensions = engine.dimensions();
        Some(engine.render_window(0, 0, dimensions.width, dimensions.height, self.condensed))
    }

    /// Item counts on each team's chest tiles.
    pub fn chest_report(&self) -> Option<ChestInventory> {
        self.engine
            .as_ref()
            .map(GridEngine::chest_inventory_by_team)
    }

    pub fn engine(&self) -> Option<&GridEngine> {
        self.engine.as_ref()
    }

    pub fn waiting_notice(&self) -> Option<&str> {
        self.waiting.as_deref()
    }

    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }
}
