//! Session of the locally controlled player.
//!
//! [`PlayerSession`] owns the board mirror, the turn rules, and the duel popup
//! for one player id. Feed events are folded in through
//! [`PlayerSession::handle_event`]; local actions are validated, applied to
//! the mirror, and then handed to the [`ActionSubmitter`]. A submission that
//! is not acknowledged is reported but never rolled back: the next round
//! update from the server is authoritative.
use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use game_core::{
    AttackTarget, CardinalDirection, Consequence, Duel, DuelOutcome, DuelPhase, DuelResult, Engagement,
    GridEngine, Guess, PcgRng, PlayerId, Position, Snapshot, TurnContext, TurnSession, Viewport,
    compute_seed,
};

use crate::api::{
    ActionSubmitter, AttackRequest, ChestAttackRequest, FightResultRequest, MoveRequest,
    OutboundAction, Result, RuntimeError, SkipRequest,
};
use crate::config::RuntimeConfig;
use crate::feed::{FeedEvent, FightNotice, UpdateBatch};
use crate::message::MessageLog;

/// Board mirror plus the window last rendered around the local player.
#[derive(Clone, Debug)]
struct Board {
    engine: GridEngine,
    view: Viewport,
}

/// The fight the duel popup belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ActiveFight {
    opponent: PlayerId,
    /// Set when the server announced the fight; the result is reported once.
    fight_id: Option<String>,
}

pub struct PlayerSession<S> {
    id: PlayerId,
    config: RuntimeConfig,
    submitter: S,
    game_seed: u64,
    board: Option<Board>,
    turn: TurnSession,
    duel: Duel,
    fight: Option<ActiveFight>,
    duel_round: u64,
    rng: PcgRng,
    messages: MessageLog,
    phase: Option<String>,
    waiting: Option<String>,
}

impl<S: ActionSubmitter> PlayerSession<S> {
    pub fn new(id: PlayerId, config: RuntimeConfig, submitter: S) -> Self {
        let game_seed = config.resolve_seed();
        let messages = MessageLog::new(config.message_capacity);
        Self {
            id,
            config,
            submitter,
            game_seed,
            board: None,
            turn: TurnSession::with_budget(0),
            duel: Duel::new(),
            fight: None,
            duel_round: 0,
            rng: PcgRng,
            messages,
            phase: None,
            waiting: None,
        }
    }

    /// Folds one decoded feed message into the session.
    pub fn handle_event(&mut self, event: FeedEvent) -> Result<()> {
        match event {
            FeedEvent::Ping => {}
            FeedEvent::Connected(snapshot) => self.connect(&snapshot)?,
            FeedEvent::Waiting(text) => {
                info!(player = %self.id, notice = %text, "waiting for game");
                self.messages.info(text.clone());
                self.waiting = Some(text);
            }
            FeedEvent::Update(batch) => self.apply_update(batch)?,
            FeedEvent::Fight(notice) => self.open_fight(notice),
            FeedEvent::Phase(phase) => {
                debug!(%phase, "round phase");
                self.phase = Some(phase);
            }
            FeedEvent::Unknown(kind) => debug!(%kind, "ignoring feed message"),
        }
        Ok(())
    }

    fn connect(&mut self, snapshot: &Snapshot) -> Result<()> {
        let engine = GridEngine::from_snapshot(snapshot).map_err(RuntimeError::InitialState)?;
        let player = engine
            .player(&self.id)
            .ok_or_else(|| RuntimeError::PlayerNotInGame(self.id.clone()))?;
        let class = player.class;
        let view = engine
            .viewport_for(&self.id)
            .ok_or_else(|| RuntimeError::PlayerNotInGame(self.id.clone()))?;

        info!(
            player = %self.id,
            %class,
            width = engine.dimensions().width,
            height = engine.dimensions().height,
            "board connected"
        );
        self.board = Some(Board { engine, view });
        self.turn = TurnSession::new(class);
        self.duel = Duel::new();
        self.fight = None;
        self.waiting = None;
        Ok(())
    }

    fn apply_update(&mut self, batch: UpdateBatch) -> Result<()> {
        let board = self.board.as_mut().ok_or(RuntimeError::NotConnected)?;
        let applied = board.engine.apply_changes(&batch.changes);
        for (carrier, item) in batch.carried {
            board.engine.set_carried_item(&carrier, Some(item));
        }
        debug!(applied, received = batch.changes.len(), "round update applied");

        if self.config.reset_turn_on_update {
            self.turn = self.turn.begin_turn();
        }
        self.refresh_view();
        self.engage_colocated_opponent();
        Ok(())
    }

    /// Opens a defending duel when an update leaves an opponent on our tile.
    fn engage_colocated_opponent(&mut self) {
        if self.duel.is_open() || self.duel.is_counter_armed() {
            return;
        }
        let Some(engine) = self.engine() else {
            return;
        };
        let Some(local) = engine.player(&self.id) else {
            return;
        };
        if local.position.is_off_grid() {
            return;
        }
        let opponent = engine
            .players_at(local.position)
            .find(|other| other.id != local.id && other.is_opponent_of(local))
            .map(|other| other.id.clone());
        let position = local.position;

        if let Some(opponent) = opponent {
            let engagement = Engagement::new(position, position);
            if self.duel.start(false, engagement).is_ok() {
                info!(player = %self.id, %opponent, "opponent on our tile, duel opened");
                self.fight = Some(ActiveFight {
                    opponent,
                    fight_id: None,
                });
            }
        }
    }

    fn open_fight(&mut self, notice: FightNotice) {
        let Some(opponent) = notice.opponent_of(&self.id).cloned() else {
            debug!(
                attacker = %notice.attacker,
                defender = %notice.defender,
                "fight between other players"
            );
            return;
        };
        let commenced = notice.attacker == self.id;
        let Some(engagement) = self.engagement_with(&opponent) else {
            warn!(%opponent, "fight notice for a player not on the board");
            return;
        };

        match self.duel.start(commenced, engagement) {
            Ok(()) => {
                info!(player = %self.id, %opponent, commenced, "fight announced");
                self.fight = Some(ActiveFight {
                    opponent,
                    fight_id: notice.id,
                });
            }
            Err(err) => match self.fight.as_mut() {
                // A guess is still pending for this pairing; report against the server id.
                Some(fight)
                    if fight.opponent == opponent
                        && fight.fight_id.is_none()
                        && self.duel.phase() == DuelPhase::AwaitingGuess =>
                {
                    fight.fight_id = notice.id;
                }
                _ => warn!(error = %err, %opponent, "ignoring fight notice"),
            },
        }
    }

    /// Moves one tile, applies the move locally, then submits it.
    pub async fn submit_move(&mut self, direction: CardinalDirection) -> Result<()> {
        let board = self.board.as_ref().ok_or(RuntimeError::NotConnected)?;
        let ctx = TurnContext::new(&board.engine, &self.id, &board.view);
        let transition = match self.turn.submit_move(&ctx, direction) {
            Ok(transition) => transition,
            Err(err) => {
                self.messages.error(err.to_string());
                return Err(err.into());
            }
        };

        let from = transition.change.from;
        let destination = transition.destination;
        self.turn = transition.session;
        if let Some(board) = self.board.as_mut() {
            board.engine.apply_changes(&[transition.change]);
        }
        self.refresh_view();
        self.messages.info(format!(
            "Moved to {destination}. Movement left: {}",
            self.turn.remaining()
        ));

        let request = MoveRequest {
            x: destination.x,
            y: destination.y,
            prev_x: from.x,
            prev_y: from.y,
            id: self.id.to_string(),
        };
        self.send(OutboundAction::Move(request)).await
    }

    /// Attacks the neighbouring tile; a player target opens the duel popup.
    pub async fn submit_attack(&mut self, direction: CardinalDirection) -> Result<()> {
        let board = self.board.as_ref().ok_or(RuntimeError::NotConnected)?;
        let ctx = TurnContext::new(&board.engine, &self.id, &board.view);
        let transition = match self.turn.submit_attack(&ctx, direction) {
            Ok(transition) => transition,
            Err(err) => {
                self.messages.error(err.to_string());
                return Err(err.into());
            }
        };
        self.turn = transition.session;

        let action = match transition.target {
            AttackTarget::Player { id, position } => {
                let name = self
                    .engine()
                    .and_then(|engine| engine.player(&id))
                    .map_or_else(|| id.to_string(), |player| player.name.clone());
                if let Some(local) = self.local_position() {
                    match self.duel.start(true, Engagement::new(local, position)) {
                        Ok(()) => {
                            self.fight = Some(ActiveFight {
                                opponent: id.clone(),
                                fight_id: None,
                            });
                        }
                        Err(err) => warn!(error = %err, "attack did not open a duel"),
                    }
                }
                self.messages.info(format!("Attacking {name}"));
                OutboundAction::Attack(AttackRequest {
                    attacker_id: self.id.to_string(),
                    defender_id: id.to_string(),
                })
            }
            AttackTarget::Chest { position, team } => {
                self.messages
                    .info(format!("Attacking the {team} chest at {position}"));
                OutboundAction::ChestAttack(ChestAttackRequest {
                    x: position.x,
                    y: position.y,
                    id: self.id.to_string(),
                })
            }
        };
        self.send(action).await
    }

    /// Gives up the rest of the turn.
    pub async fn submit_skip(&mut self) -> Result<()> {
        if self.board.is_none() {
            return Err(RuntimeError::NotConnected);
        }
        self.turn = match self.turn.submit_skip() {
            Ok(turn) => turn,
            Err(err) => {
                self.messages.error(err.to_string());
                return Err(err.into());
            }
        };
        self.messages.info("Turn skipped");
        let request = SkipRequest {
            id: self.id.to_string(),
        };
        self.send(OutboundAction::Skip(request)).await
    }

    /// Plays the open duel round with `guess`.
    ///
    /// Returns `Ok(None)` when no guess is awaited. A respawn consequence is
    /// applied to the mirror immediately; when the server announced the
    /// fight, the winner is reported once.
    pub async fn play_duel(&mut self, guess: Guess) -> Result<Option<DuelOutcome>> {
        let seed = compute_seed(self.game_seed, self.duel_round, 0);
        let Some(outcome) = self.duel.play(guess, &self.rng, seed) else {
            return Ok(None);
        };
        self.duel_round += 1;

        let respawned = match outcome.consequence {
            Consequence::RespawnLocal => Some(self.id.clone()),
            Consequence::RespawnOpponent => {
                self.fight.as_ref().map(|fight| fight.opponent.clone())
            }
            Consequence::CounterQueued => None,
        };
        if let Some(player) = respawned {
            self.respawn(&player);
        }
        self.messages
            .info(format!("Rolled {}: {}", outcome.roll, outcome.result));

        let report = self.fight.as_mut().and_then(|fight| {
            let fight_id = fight.fight_id.take()?;
            Some((fight_id, fight.opponent.clone()))
        });
        if let Some((fight_id, opponent)) = report {
            let winner = match outcome.result {
                DuelResult::LocalWon => self.id.clone(),
                DuelResult::OpponentWon => opponent,
            };
            let request = FightResultRequest {
                fight_id,
                submitter_id: self.id.to_string(),
                winner_id: winner.to_string(),
            };
            self.send(OutboundAction::FightResult(request)).await?;
        }
        Ok(Some(outcome))
    }

    /// Closes the duel popup. Returns true when a counterattack round opened.
    pub fn close_duel(&mut self) -> bool {
        if !self.duel.close_popup() {
            self.fight = None;
            return false;
        }

        let engagement = self
            .fight
            .as_ref()
            .and_then(|fight| self.engagement_with(&fight.opponent));
        let resumed = match engagement {
            Some(engagement) => self.duel.resume_counter(engagement),
            None => {
                self.duel.drop_counter();
                false
            }
        };
        if resumed {
            self.messages.info("Counterattack!");
        } else {
            self.fight = None;
        }
        resumed
    }

    fn respawn(&mut self, player: &PlayerId) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        match board.engine.respawn_change(player) {
            Some(change) => {
                debug!(%player, to = %change.to, "respawning");
                board.engine.apply_changes(&[change]);
            }
            None => warn!(%player, "no spawn point for defeated player"),
        }
        self.refresh_view();
    }

    async fn send(&mut self, action: OutboundAction) -> Result<()> {
        match self.submitter.submit(&action).await {
            Ok(()) => Ok(()),
            Err(source) => {
                warn!(action = action.label(), error = %source, "submission not acknowledged");
                self.messages
                    .error(format!("Failed to submit {}: {source}", action.label()));
                Err(RuntimeError::Submission {
                    action: action.label(),
                    source,
                })
            }
        }
    }

    fn refresh_view(&mut self) {
        if let Some(board) = self.board.as_mut()
            && let Some(view) = board.engine.viewport_for(&self.id)
        {
            board.view = view;
        }
    }

    fn local_position(&self) -> Option<Position> {
        self.engine()?
            .player(&self.id)
            .map(|player| player.position)
            .filter(|position| !position.is_off_grid())
    }

    fn engagement_with(&self, opponent: &PlayerId) -> Option<Engagement> {
        let local = self.local_position()?;
        let other = self.engine()?.player(opponent)?.position;
        (!other.is_off_grid()).then(|| Engagement::new(local, other))
    }

    /// Directions a move may be offered in right now.
    pub fn offerable_directions(&self) -> ArrayVec<CardinalDirection, 4> {
        match &self.board {
            Some(board) => {
                let ctx = TurnContext::new(&board.engine, &self.id, &board.view);
                self.turn.offerable_directions(&ctx)
            }
            None => ArrayVec::new(),
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn is_connected(&self) -> bool {
        self.board.is_some()
    }

    pub fn engine(&self) -> Option<&GridEngine> {
        self.board.as_ref().map(|board| &board.engine)
    }

    pub fn view(&self) -> Option<&Viewport> {
        self.board.as_ref().map(|board| &board.view)
    }

    pub fn turn(&self) -> TurnSession {
        self.turn
    }

    pub fn duel(&self) -> &Duel {
        &self.duel
    }

    /// Opponent of the open (or just resolved) duel.
    pub fn duel_opponent(&self) -> Option<&PlayerId> {
        self.fight.as_ref().map(|fight| &fight.opponent)
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    pub fn waiting_notice(&self) -> Option<&str> {
        self.waiting.as_deref()
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }
}
