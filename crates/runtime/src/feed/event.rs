use game_core::{Change, ItemId, PlayerId, Snapshot};

/// One decoded feed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    /// Keep-alive.
    Ping,
    /// Full board; (re)initializes every session.
    Connected(Snapshot),
    /// Waiting-room notice sent before the game starts.
    Waiting(String),
    /// Incremental changes from a resolved round.
    Update(UpdateBatch),
    /// The server paired two players for a duel.
    Fight(FightNotice),
    /// Name of the round phase the server is resolving.
    Phase(String),
    /// A message type this client does not handle.
    Unknown(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    pub changes: Vec<Change>,
    /// Items picked up this round, by carrier.
    pub carried: Vec<(PlayerId, ItemId)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FightNotice {
    /// Server fight id; results are reported against it.
    pub id: Option<String>,
    pub attacker: PlayerId,
    pub defender: PlayerId,
}

impl FightNotice {
    /// The other side of the fight, from `player`'s point of view.
    pub fn opponent_of(&self, player: &PlayerId) -> Option<&PlayerId> {
        if &self.attacker == player {
            Some(&self.defender)
        } else if &self.defender == player {
            Some(&self.attacker)
        } else {
            None
        }
    }
}
