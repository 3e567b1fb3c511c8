//! Outbound actions and the transport seam they are sent through.
//!
//! Sessions apply an action locally first and then hand it to an
//! [`ActionSubmitter`]. The HTTP client that talks to the room server lives
//! outside this crate; tests and replays use [`RecordingSubmitter`].
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::errors::SubmitError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveRequest {
    pub x: i32,
    pub y: i32,
    pub prev_x: i32,
    pub prev_y: i32,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttackRequest {
    pub attacker_id: String,
    pub defender_id: String,
}

/// Attack on a treasure chest tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChestAttackRequest {
    pub x: i32,
    pub y: i32,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkipRequest {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FightResultRequest {
    pub fight_id: String,
    pub submitter_id: String,
    pub winner_id: String,
}

/// Everything a player session can send to the room server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Kind", content = "Body")]
pub enum OutboundAction {
    Move(MoveRequest),
    Attack(AttackRequest),
    ChestAttack(ChestAttackRequest),
    Skip(SkipRequest),
    FightResult(FightResultRequest),
}

impl OutboundAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Move(_) => "move",
            Self::Attack(_) => "attack",
            Self::ChestAttack(_) => "chest attack",
            Self::Skip(_) => "skip",
            Self::FightResult(_) => "fight result",
        }
    }
}

/// Fire-and-acknowledge transport for outbound actions.
#[async_trait]
pub trait ActionSubmitter: Send + Sync {
    /// Sends one action and waits for the server's acknowledgement.
    async fn submit(&self, action: &OutboundAction) -> Result<(), SubmitError>;
}

/// Keeps every submitted action in memory.
///
/// Acknowledges everything unless told to fail, which makes it the submitter
/// of choice for feed replays and tests.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    sent: Mutex<Vec<OutboundAction>>,
    failure: Mutex<Option<SubmitError>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every following submission with `message` (still recording it).
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().await = Some(SubmitError::new(message));
    }

    pub async fn recover(&self) {
        *self.failure.lock().await = None;
    }

    pub async fn sent(&self) -> Vec<OutboundAction> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ActionSubmitter for RecordingSubmitter {
    async fn submit(&self, action: &OutboundAction) -> Result<(), SubmitError> {
        self.sent.lock().await.push(action.clone());
        match self.failure.lock().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
