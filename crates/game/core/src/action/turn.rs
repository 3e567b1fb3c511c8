//! Per-turn state of the locally controlled player.
//!
//! [`TurnSession`] is a small `Copy` value. Every submission consumes the
//! current session and either hands back the next one (plus whatever the
//! caller must apply or send) or rejects without side effects.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::{AttackError, CardinalDirection, MoveError, SkipError};
use crate::engine::{GridEngine, Viewport};
use crate::state::{Change, Player, PlayerClass, PlayerId, Position, Team, TileFlag};

bitflags! {
    /// What the player has already done this turn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TurnFlags: u8 {
        const MOVED    = 1 << 0;
        const ATTACKED = 1 << 1;
        const SKIPPED  = 1 << 2;
    }
}

/// Read-only inputs a turn decision is made against.
#[derive(Clone, Copy, Debug)]
pub struct TurnContext<'a> {
    pub engine: &'a GridEngine,
    pub actor: &'a PlayerId,
    /// The last window rendered around the actor.
    pub view: &'a Viewport,
}

impl<'a> TurnContext<'a> {
    pub fn new(engine: &'a GridEngine, actor: &'a PlayerId, view: &'a Viewport) -> Self {
        Self {
            engine,
            actor,
            view,
        }
    }

    fn actor(&self) -> Option<&'a Player> {
        self.engine
            .player(self.actor)
            .filter(|player| !player.position.is_off_grid())
    }
}

/// An accepted move: the next session and the change to apply and submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTransition {
    pub session: TurnSession,
    pub change: Change,
    pub destination: Position,
}

/// What an accepted attack hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackTarget {
    Player { id: PlayerId, position: Position },
    Chest { position: Position, team: Team },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackTransition {
    pub session: TurnSession,
    pub target: AttackTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSession {
    budget: u32,
    remaining: u32,
    flags: TurnFlags,
}

impl TurnSession {
    /// Fresh turn sized by the class movement budget.
    pub const fn new(class: PlayerClass) -> Self {
        Self::with_budget(class.movement_speed())
    }

    pub const fn with_budget(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
            flags: TurnFlags::empty(),
        }
    }

    /// Same budget, everything else cleared.
    pub const fn begin_turn(self) -> Self {
        Self::with_budget(self.budget)
    }

    pub const fn budget(&self) -> u32 {
        self.budget
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn flags(&self) -> TurnFlags {
        self.flags
    }

    pub const fn has_moved(&self) -> bool {
        self.flags.contains(TurnFlags::MOVED)
    }

    pub const fn has_attacked(&self) -> bool {
        self.flags.contains(TurnFlags::ATTACKED)
    }

    pub const fn has_skipped(&self) -> bool {
        self.flags.contains(TurnFlags::SKIPPED)
    }

    pub fn is_direction_offerable(
        &self,
        ctx: &TurnContext<'_>,
        direction: CardinalDirection,
    ) -> bool {
        self.validate_move(ctx, direction).is_ok()
    }

    /// Directions a move button should be shown for, in up/down/left/right order.
    pub fn offerable_directions(&self, ctx: &TurnContext<'_>) -> ArrayVec<CardinalDirection, 4> {
        CardinalDirection::ALL
            .into_iter()
            .filter(|direction| self.is_direction_offerable(ctx, *direction))
            .collect()
    }

    fn validate_move(
        &self,
        ctx: &TurnContext<'_>,
        direction: CardinalDirection,
    ) -> Result<(Position, Position), MoveError> {
        if self.has_skipped() {
            return Err(MoveError::AlreadySkipped);
        }
        if self.has_attacked() {
            return Err(MoveError::AlreadyAttacked);
        }
        if self.remaining == 0 {
            return Err(MoveError::NoMovementRemaining);
        }
        let actor = ctx
            .actor()
            .ok_or_else(|| MoveError::UnknownActor(ctx.actor.clone()))?;

        let destination = direction.step(actor.position);
        if !ctx.engine.dimensions().contains(destination) {
            return Err(MoveError::OutOfBounds { destination });
        }
        let Some(cell) = ctx.view.cell(destination) else {
            return Err(MoveError::OutOfBounds { destination });
        };
        if !cell.flag.is_passable() {
            return Err(MoveError::Inaccessible { destination });
        }
        // Any opposing occupant blocks, whatever team the cell renders as.
        let opposed = ctx
            .engine
            .players_at(destination)
            .any(|occupant| occupant.is_opponent_of(actor));
        if opposed {
            return Err(MoveError::Blocked { destination });
        }
        Ok((actor.position, destination))
    }

    /// Validates a one-tile step and produces the change for it.
    pub fn submit_move(
        self,
        ctx: &TurnContext<'_>,
        direction: CardinalDirection,
    ) -> Result<MoveTransition, MoveError> {
        let (from, destination) = self.validate_move(ctx, direction)?;
        let session = Self {
            remaining: self.remaining - 1,
            flags: self.flags | TurnFlags::MOVED,
            ..self
        };
        tracing::debug!(
            actor = %ctx.actor,
            %from,
            to = %destination,
            remaining = session.remaining,
            "move accepted"
        );
        Ok(MoveTransition {
            session,
            change: Change::player(ctx.actor.clone(), from, destination),
            destination,
        })
    }

    /// Attacks the neighbouring tile in `direction`.
    ///
    /// An opposing player there is preferred; otherwise the tile must be a
    /// treasure chest owned by the other playing team.
    pub fn submit_attack(
        self,
        ctx: &TurnContext<'_>,
        direction: CardinalDirection,
    ) -> Result<AttackTransition, AttackError> {
        if self.has_skipped() {
            return Err(AttackError::AlreadySkipped);
        }
        if self.has_attacked() {
            return Err(AttackError::AlreadyAttacked);
        }
        if self.has_moved() {
            return Err(AttackError::AlreadyMoved);
        }
        let actor = ctx
            .actor()
            .ok_or_else(|| AttackError::UnknownActor(ctx.actor.clone()))?;

        let target = direction.step(actor.position);
        let target = find_target(ctx.engine, actor, target)
            .ok_or(AttackError::NoTarget { target })?;

        let session = Self {
            remaining: 0,
            flags: self.flags | TurnFlags::ATTACKED,
            ..self
        };
        tracing::debug!(actor = %ctx.actor, ?target, "attack accepted");
        Ok(AttackTransition { session, target })
    }

    /// Gives up the rest of the turn. Terminal until the next turn begins.
    pub fn submit_skip(self) -> Result<Self, SkipError> {
        if self.has_skipped() {
            return Err(SkipError::AlreadySkipped);
        }
        Ok(Self {
            remaining: 0,
            flags: TurnFlags::ATTACKED | TurnFlags::SKIPPED,
            ..self
        })
    }
}

fn find_target(engine: &GridEngine, actor: &Player, position: Position) -> Option<AttackTarget> {
    if let Some(defender) = engine
        .players_at(position)
        .find(|occupant| occupant.is_opponent_of(actor))
    {
        return Some(AttackTarget::Player {
            id: defender.id.clone(),
            position,
        });
    }

    let tile = engine.tile(position)?;
    let claimable =
        tile.flag == TileFlag::TreasureChest && tile.team.is_playing() && tile.team != actor.team;
    claimable.then_some(AttackTarget::Chest {
        position,
        team: tile.team,
    })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::engine::tests::player;
    use crate::state::{MapDimensions, Snapshot, TileOverride};

    fn board(extra: impl FnOnce(Snapshot) -> Snapshot) -> GridEngine {
        let snapshot = Snapshot::new(MapDimensions::new(5, 5))
            .with_player(player("f", PlayerClass::Fighter, Team::Team1, 0, 0))
            .with_player(player("r", PlayerClass::Thief, Team::Team2, 4, 4));
        GridEngine::from_snapshot(&extra(snapshot)).expect("valid snapshot")
    }

    fn view_of(engine: &GridEngine, id: &PlayerId) -> Viewport {
        engine.viewport_for(id).expect("player on board")
    }

    #[test]
    fn each_move_spends_one_point_until_budget_is_gone() {
        let mut engine = board(|s| s);
        let id = PlayerId::new("f");

        let session = TurnSession::with_budget(2);
        let view = view_of(&engine, &id);
        let step = session
            .submit_move(&TurnContext::new(&engine, &id, &view), CardinalDirection::Right)
            .expect("first move");
        assert_eq!(step.session.remaining(), 1);
        assert!(step.session.has_moved());
        assert_eq!(step.destination, Position::new(1, 0));
        engine.apply_changes(&[step.change]);

        let view = view_of(&engine, &id);
        let step = step
            .session
            .submit_move(&TurnContext::new(&engine, &id, &view), CardinalDirection::Down)
            .expect("second move");
        assert_eq!(step.session.remaining(), 0);
        assert_eq!(step.destination, Position::new(1, 1));
    }

    #[test]
    fn fighter_budget_rejects_second_move() {
        let mut engine = board(|s| s);
        let id = PlayerId::new("f");
        let session = TurnSession::new(PlayerClass::Fighter);
        assert_eq!(session.budget(), 1);

        let view = view_of(&engine, &id);
        let step = session
            .submit_move(&TurnContext::new(&engine, &id, &view), CardinalDirection::Right)
            .expect("first move");
        engine.apply_changes(&[step.change]);

        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);
        assert_eq!(
            step.session.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::NoMovementRemaining)
        );
        assert_eq!(
            MoveError::NoMovementRemaining.to_string(),
            "No movement remaining for this turn."
        );
        assert!(step.session.offerable_directions(&ctx).is_empty());
    }

    #[test]
    fn edges_and_walls_are_not_offered() {
        let engine = board(|s| {
            s.with_tile(TileOverride::new(
                Position::new(1, 0),
                TileFlag::Inaccessible,
                Team::Neutral,
            ))
        });
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);
        let session = TurnSession::new(PlayerClass::Fighter);

        let offered = session.offerable_directions(&ctx);
        assert_eq!(offered.as_slice(), &[CardinalDirection::Down]);
        assert!(matches!(
            session.submit_move(&ctx, CardinalDirection::Up),
            Err(MoveError::OutOfBounds { .. })
        ));
        assert!(matches!(
            session.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::Inaccessible { .. })
        ));
    }

    #[test]
    fn opposing_occupant_blocks_but_teammate_does_not() {
        let engine = board(|s| {
            s.with_player(player("e", PlayerClass::Fighter, Team::Team2, 1, 0))
                .with_player(player("m", PlayerClass::Fighter, Team::Team1, 0, 1))
        });
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);
        let session = TurnSession::new(PlayerClass::Fighter);

        assert!(!session.is_direction_offerable(&ctx, CardinalDirection::Right));
        assert!(session.is_direction_offerable(&ctx, CardinalDirection::Down));
        assert_eq!(
            session.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::Blocked {
                destination: Position::new(1, 0)
            })
        );
    }

    #[test]
    fn enemy_on_own_team_tile_still_blocks() {
        let engine = board(|s| {
            s.with_tile(TileOverride::new(
                Position::new(1, 0),
                TileFlag::Spawn,
                Team::Team1,
            ))
            .with_player(player("e", PlayerClass::Fighter, Team::Team2, 1, 0))
        });
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        assert_eq!(
            view.cell(Position::new(1, 0)).map(|cell| cell.team),
            Some(Team::Team1)
        );
        let ctx = TurnContext::new(&engine, &id, &view);
        let session = TurnSession::new(PlayerClass::Fighter);

        assert!(!session.is_direction_offerable(&ctx, CardinalDirection::Right));
        assert_eq!(
            session.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::Blocked {
                destination: Position::new(1, 0)
            })
        );
    }

    #[test]
    fn enemy_behind_a_lower_id_teammate_still_blocks() {
        let engine = board(|s| {
            s.with_player(player("a", PlayerClass::Fighter, Team::Team1, 1, 0))
                .with_player(player("b", PlayerClass::Fighter, Team::Team2, 1, 0))
        });
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        assert_eq!(
            view.cell(Position::new(1, 0)).map(|cell| cell.team),
            Some(Team::Team1)
        );
        let ctx = TurnContext::new(&engine, &id, &view);
        let session = TurnSession::new(PlayerClass::Fighter);

        assert!(!session.is_direction_offerable(&ctx, CardinalDirection::Right));
        assert!(matches!(
            session.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::Blocked { .. })
        ));
    }

    #[test]
    fn attack_ends_movement_for_the_turn() {
        let engine = board(|s| s.with_player(player("e", PlayerClass::Ranger, Team::Team2, 0, 1)));
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);

        let attack = TurnSession::new(PlayerClass::Fighter)
            .submit_attack(&ctx, CardinalDirection::Down)
            .expect("adjacent opponent");
        assert_eq!(
            attack.target,
            AttackTarget::Player {
                id: PlayerId::new("e"),
                position: Position::new(0, 1),
            }
        );
        assert!(attack.session.has_attacked());
        assert_eq!(attack.session.remaining(), 0);
        for direction in CardinalDirection::iter() {
            assert!(!attack.session.is_direction_offerable(&ctx, direction));
        }
        assert_eq!(
            attack.session.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::AlreadyAttacked)
        );

        let next = attack.session.begin_turn();
        assert!(next.is_direction_offerable(&ctx, CardinalDirection::Right));
    }

    #[test]
    fn attack_after_move_is_rejected() {
        let engine = board(|s| s.with_player(player("e", PlayerClass::Ranger, Team::Team2, 1, 1)));
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);

        let moved = TurnSession::with_budget(2)
            .submit_move(&ctx, CardinalDirection::Right)
            .expect("free tile");
        assert_eq!(
            moved.session.submit_attack(&ctx, CardinalDirection::Down),
            Err(AttackError::AlreadyMoved)
        );
    }

    #[test]
    fn only_enemy_team_chests_can_be_attacked() {
        let engine = board(|s| {
            s.with_tile(TileOverride::new(
                Position::new(1, 0),
                TileFlag::TreasureChest,
                Team::Team2,
            ))
            .with_tile(TileOverride::new(
                Position::new(0, 1),
                TileFlag::TreasureChest,
                Team::Team1,
            ))
        });
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);
        let session = TurnSession::new(PlayerClass::Fighter);

        let attack = session
            .submit_attack(&ctx, CardinalDirection::Right)
            .expect("enemy chest");
        assert_eq!(
            attack.target,
            AttackTarget::Chest {
                position: Position::new(1, 0),
                team: Team::Team2,
            }
        );
        assert_eq!(
            session.submit_attack(&ctx, CardinalDirection::Down),
            Err(AttackError::NoTarget {
                target: Position::new(0, 1)
            })
        );
        assert!(matches!(
            session.submit_attack(&ctx, CardinalDirection::Up),
            Err(AttackError::NoTarget { .. })
        ));
    }

    #[test]
    fn skip_is_terminal() {
        let engine = board(|s| s);
        let id = PlayerId::new("f");
        let view = view_of(&engine, &id);
        let ctx = TurnContext::new(&engine, &id, &view);

        let skipped = TurnSession::new(PlayerClass::Thief)
            .submit_skip()
            .expect("first skip");
        assert!(skipped.has_skipped() && skipped.has_attacked());
        assert!(!skipped.has_moved());
        assert_eq!(skipped.remaining(), 0);
        assert_eq!(skipped.submit_skip(), Err(SkipError::AlreadySkipped));
        assert_eq!(
            skipped.submit_move(&ctx, CardinalDirection::Right),
            Err(MoveError::AlreadySkipped)
        );
        assert_eq!(
            skipped.submit_attack(&ctx, CardinalDirection::Right),
            Err(AttackError::AlreadySkipped)
        );
    }
}
