use super::{Consequence, DuelOutcome, DuelResult, Engagement, Guess};
use crate::config::GameConfig;
use crate::env::RngOracle;
use crate::error::{ErrorSeverity, GameError};

const DEFAULT_PROMPT: &str = "Guess whether the number is odd or even.";
const COUNTER_PROMPT: &str = "Counterattack! Defend by guessing odd or even.";
const QUEUED_COUNTER_PROMPT: &str = "Attack failed! Close this popup to face a counterattack.";

/// Where the duel popup currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuelPhase {
    /// No popup.
    #[default]
    Idle,
    /// Popup open, waiting for exactly one guess.
    AwaitingGuess,
    /// Roll and result on display until the popup closes.
    Resolved,
    /// The local attack failed; closing the popup arms the counterattack.
    CounterQueued,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuelError {
    #[error("the opponent is neither adjacent nor on the same tile")]
    NotEngaged,

    #[error("a duel is already open ({phase})")]
    AlreadyOpen { phase: DuelPhase },
}

impl GameError for DuelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEngaged => ErrorSeverity::Recoverable,
            Self::AlreadyOpen { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEngaged => "DUEL_NOT_ENGAGED",
            Self::AlreadyOpen { .. } => "DUEL_ALREADY_OPEN",
        }
    }
}

/// State machine for the duel popup of one local player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duel {
    phase: DuelPhase,
    commenced: bool,
    counter_round: bool,
    counter_armed: bool,
    roll: Option<u32>,
    result: Option<DuelResult>,
}

impl Duel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh round.
    ///
    /// `commenced` records whether the local player started the fight; it is
    /// fixed until the round is resolved. Fails unless the popup is closed
    /// and the two players are adjacent or share a tile.
    pub fn start(&mut self, commenced: bool, engagement: Engagement) -> Result<(), DuelError> {
        if self.phase != DuelPhase::Idle {
            return Err(DuelError::AlreadyOpen { phase: self.phase });
        }
        if !engagement.is_engaged() {
            return Err(DuelError::NotEngaged);
        }
        *self = Self {
            phase: DuelPhase::AwaitingGuess,
            commenced,
            ..Self::default()
        };
        tracing::debug!(commenced, "duel started");
        Ok(())
    }

    /// Resolves the open round with `guess`.
    ///
    /// Returns `None` without touching anything unless a guess is awaited.
    pub fn play(&mut self, guess: Guess, rng: &impl RngOracle, seed: u64) -> Option<DuelOutcome> {
        if self.phase != DuelPhase::AwaitingGuess || self.result.is_some() {
            return None;
        }

        let roll = rng.roll_die(seed, GameConfig::DUEL_DIE_SIDES);
        let (result, consequence) = if guess.matches(roll) {
            (DuelResult::LocalWon, Consequence::RespawnOpponent)
        } else if self.commenced {
            (DuelResult::OpponentWon, Consequence::CounterQueued)
        } else {
            (DuelResult::OpponentWon, Consequence::RespawnLocal)
        };

        self.roll = Some(roll);
        self.result = Some(result);
        self.phase = match consequence {
            Consequence::CounterQueued => DuelPhase::CounterQueued,
            _ => DuelPhase::Resolved,
        };
        tracing::debug!(roll, %guess, %result, "duel resolved");

        Some(DuelOutcome {
            roll,
            result,
            consequence,
        })
    }

    /// Dismisses the popup.
    ///
    /// With a counterattack queued this arms it for [`Duel::resume_counter`]
    /// and returns true.
    pub fn close_popup(&mut self) -> bool {
        let armed = self.phase == DuelPhase::CounterQueued;
        self.phase = DuelPhase::Idle;
        self.counter_armed = armed;
        armed
    }

    /// Starts the armed counterattack round if the opponent is still
    /// adjacent, otherwise drops it. Returns whether a round opened.
    pub fn resume_counter(&mut self, engagement: Engagement) -> bool {
        if !self.counter_armed || self.phase != DuelPhase::Idle {
            return false;
        }
        self.counter_armed = false;
        if !engagement.is_adjacent() {
            tracing::debug!("counterattack dropped, opponent moved away");
            return false;
        }
        *self = Self {
            phase: DuelPhase::AwaitingGuess,
            commenced: false,
            counter_round: true,
            ..Self::default()
        };
        tracing::debug!("counterattack started");
        true
    }

    /// Forgets an armed counterattack, e.g. when the opponent left the board.
    pub fn drop_counter(&mut self) {
        self.counter_armed = false;
    }

    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    /// True while the popup is on screen.
    pub fn is_open(&self) -> bool {
        self.phase != DuelPhase::Idle
    }

    pub fn commenced(&self) -> bool {
        self.commenced
    }

    pub fn is_counter_armed(&self) -> bool {
        self.counter_armed
    }

    pub fn roll(&self) -> Option<u32> {
        self.roll
    }

    pub fn result(&self) -> Option<DuelResult> {
        self.result
    }

    /// Text shown above the guess buttons; `None` when the popup is closed.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.phase {
            DuelPhase::Idle => None,
            DuelPhase::CounterQueued => Some(QUEUED_COUNTER_PROMPT),
            _ if self.counter_round => Some(COUNTER_PROMPT),
            _ => Some(DEFAULT_PROMPT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Position;

    /// Always rolls the value it was built with.
    struct FixedRoll(u32);

    impl RngOracle for FixedRoll {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0 - 1
        }
    }

    fn adjacent() -> Engagement {
        Engagement::new(Position::new(1, 1), Position::new(1, 2))
    }

    #[test]
    fn local_attack_loss_queues_counter_without_respawn() {
        let mut duel = Duel::new();
        duel.start(true, adjacent()).expect("adjacent");
        assert_eq!(duel.phase(), DuelPhase::AwaitingGuess);
        assert!(duel.commenced());

        let outcome = duel.play(Guess::Odd, &FixedRoll(4), 0).expect("awaiting guess");
        assert_eq!(outcome.roll, 4);
        assert_eq!(outcome.result, DuelResult::OpponentWon);
        assert_eq!(outcome.consequence, Consequence::CounterQueued);
        assert_eq!(duel.phase(), DuelPhase::CounterQueued);
        assert_eq!(duel.prompt(), Some(QUEUED_COUNTER_PROMPT));

        assert!(duel.close_popup());
        assert!(duel.resume_counter(adjacent()));
        assert_eq!(duel.phase(), DuelPhase::AwaitingGuess);
        assert!(!duel.commenced());
        assert_eq!(duel.roll(), None);
        assert_eq!(duel.prompt(), Some(COUNTER_PROMPT));

        let counter = duel.play(Guess::Odd, &FixedRoll(2), 1).expect("counter round");
        assert_eq!(counter.consequence, Consequence::RespawnLocal);
        assert_eq!(duel.phase(), DuelPhase::Resolved);
    }

    #[test]
    fn second_guess_is_ignored() {
        let mut duel = Duel::new();
        duel.start(false, adjacent()).expect("adjacent");
        let first = duel.play(Guess::Even, &FixedRoll(6), 0);
        assert_eq!(first.map(|o| o.result), Some(DuelResult::LocalWon));
        assert_eq!(first.map(|o| o.consequence), Some(Consequence::RespawnOpponent));

        let snapshot = duel;
        assert_eq!(duel.play(Guess::Odd, &FixedRoll(3), 1), None);
        assert_eq!(duel, snapshot);
        assert_eq!(duel.result().map(|r| r.to_string()), Some("Player won".into()));
    }

    #[test]
    fn start_requires_engagement_and_a_closed_popup() {
        let mut duel = Duel::new();
        let far = Engagement::new(Position::new(0, 0), Position::new(2, 0));
        assert_eq!(duel.start(true, far), Err(DuelError::NotEngaged));

        let same_tile = Engagement::new(Position::new(3, 3), Position::new(3, 3));
        duel.start(false, same_tile).expect("colocated");
        assert_eq!(
            duel.start(true, same_tile),
            Err(DuelError::AlreadyOpen {
                phase: DuelPhase::AwaitingGuess
            })
        );
        assert!(!duel.commenced());
    }

    #[test]
    fn counter_is_dropped_when_opponent_leaves() {
        let mut duel = Duel::new();
        duel.start(true, adjacent()).expect("adjacent");
        duel.play(Guess::Even, &FixedRoll(9), 0);
        assert!(duel.close_popup());
        assert!(duel.is_counter_armed());

        // Sharing a tile is not enough for the counter round.
        let colocated = Engagement::new(Position::new(1, 1), Position::new(1, 1));
        assert!(!duel.resume_counter(colocated));
        assert!(!duel.is_counter_armed());
        assert_eq!(duel.phase(), DuelPhase::Idle);
        assert!(!duel.resume_counter(adjacent()));
    }

    #[test]
    fn closing_a_resolved_round_returns_to_idle() {
        let mut duel = Duel::new();
        duel.start(false, adjacent()).expect("adjacent");
        assert_eq!(duel.prompt(), Some(DEFAULT_PROMPT));
        duel.play(Guess::Odd, &FixedRoll(1), 0);
        assert_eq!(duel.phase(), DuelPhase::Resolved);
        assert!(!duel.close_popup());
        assert_eq!(duel.phase(), DuelPhase::Idle);
        assert_eq!(duel.prompt(), None);
        assert_eq!(duel.play(Guess::Odd, &FixedRoll(1), 0), None);
    }
}
