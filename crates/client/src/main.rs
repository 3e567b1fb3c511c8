//! Cho-Han tactics client binary.
//!
//! Composition root: loads `.env`, installs logging, and replays a recorded
//! room feed through a session, printing the board after every snapshot or
//! round update.
//!
//! ```bash
//! # Fog-of-war view of one player
//! FEED_PATH=room.ndjson PLAYER_ID=ab12c cargo run -p chohan-client
//!
//! # Spectator (admin map) view
//! FEED_PATH=room.sse cargo run -p chohan-client
//! ```
mod board;
mod config;
mod logging;
mod replay;

use anyhow::Result;
use tracing::{info, warn};

use game_core::{ErrorSeverity, PlayerId};
use runtime::{
    FeedEvent, PlayerSession, RecordingSubmitter, RuntimeConfig, SpectatorSession, parse_event,
};

use crate::config::ClientConfig;

const MESSAGES_SHOWN: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env()?;
    let _log_guard = logging::setup_logging(config.room_label())?;
    let runtime_config = RuntimeConfig::from_env();

    let payloads = replay::read_payloads(&config.feed_path).await?;
    info!(
        room = config.room_label(),
        feed = %config.feed_path.display(),
        payloads = payloads.len(),
        "replaying feed"
    );

    match config.player_id {
        Some(id) => replay_as_player(id, runtime_config, &payloads),
        None => replay_as_spectator(&runtime_config, &payloads),
    }
}

fn decode(raw: &str) -> Option<FeedEvent> {
    match parse_event(raw) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "skipping feed payload");
            None
        }
    }
}

fn redraws(event: &FeedEvent) -> bool {
    matches!(event, FeedEvent::Connected(_) | FeedEvent::Update(_))
}

fn replay_as_player(id: PlayerId, config: RuntimeConfig, payloads: &[String]) -> Result<()> {
    let mut session = PlayerSession::new(id, config, RecordingSubmitter::new());

    for event in payloads.iter().filter_map(|raw| decode(raw)) {
        let redraw = redraws(&event);
        if let Err(err) = session.handle_event(event) {
            if err.severity() == ErrorSeverity::Fatal {
                return Err(err.into());
            }
            warn!(error = %err, "feed event not applied");
            continue;
        }
        if redraw && let Some(view) = session.view() {
            println!("{}", board::draw_grid(&view.grid));
        }
    }

    let turn = session.turn();
    println!(
        "Player {}: movement left {}/{}, moves offered {:?}",
        session.id(),
        turn.remaining(),
        turn.budget(),
        session.offerable_directions().as_slice()
    );
    if let Some(prompt) = session.duel().prompt() {
        println!("Duel: {prompt}");
    }
    print!("{}", board::draw_messages(session.messages(), MESSAGES_SHOWN));
    Ok(())
}

fn replay_as_spectator(config: &RuntimeConfig, payloads: &[String]) -> Result<()> {
    let mut session = SpectatorSession::new(config);

    for event in payloads.iter().filter_map(|raw| decode(raw)) {
        let redraw = redraws(&event);
        if let Err(err) = session.handle_event(event) {
            if err.severity() == ErrorSeverity::Fatal {
                return Err(err.into());
            }
            warn!(error = %err, "feed event not applied");
            continue;
        }
        if redraw && let Some(grid) = session.render() {
            println!("{}", board::draw_grid(&grid));
        }
    }

    match session.chest_report() {
        Some(report) => print!("{}", board::draw_chests(&report)),
        None => println!(
            "{}",
            session.waiting_notice().unwrap_or("No board snapshot in feed")
        ),
    }
    Ok(())
}
