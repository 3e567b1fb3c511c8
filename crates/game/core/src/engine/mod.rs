//! Spatial board state.
//!
//! The [`GridEngine`] owns every [`Tile`] and the id-keyed entity tables. It
//! is built from a [`Snapshot`], folds incremental [`Change`] batches into
//! place without rebuilding, and renders rectangular windows for display
//! layers (see [`render`]).
mod inventory;
mod render;

pub use inventory::ChestInventory;
pub use render::{RenderedCell, RenderedGrid, Viewport};

use std::collections::BTreeMap;

use crate::state::{
    Change, EntityRef, InitializationError, Item, ItemId, MapDimensions, Player, PlayerId,
    Position, Snapshot, Team, Tile, TileFlag,
};

/// Authoritative client-side board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridEngine {
    dimensions: MapDimensions,
    /// Row-major, `width * height` cells.
    tiles: Vec<Tile>,
    players: BTreeMap<PlayerId, Player>,
    items: BTreeMap<ItemId, Item>,
    /// Snapshot start positions, the spawn fallback for teams without a
    /// spawn tile.
    starting_positions: BTreeMap<PlayerId, Position>,
}

impl GridEngine {
    /// Builds a board from a full snapshot.
    ///
    /// Any out-of-bounds terrain or entity rejects the whole snapshot.
    /// Entities at [`Position::OFF_GRID`] are recorded in the tables without
    /// occupying a tile.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, InitializationError> {
        let dimensions = snapshot.dimensions;
        if dimensions.area() == 0 {
            return Err(InitializationError::EmptyBoard {
                width: dimensions.width,
                height: dimensions.height,
            });
        }

        let mut engine = Self {
            dimensions,
            tiles: vec![Tile::default(); dimensions.area()],
            players: BTreeMap::new(),
            items: BTreeMap::new(),
            starting_positions: BTreeMap::new(),
        };

        for tile in &snapshot.tiles {
            let Some(cell) = engine.tile_mut(tile.position) else {
                return Err(InitializationError::TileOutOfBounds {
                    position: tile.position,
                    dimensions,
                });
            };
            cell.flag = tile.flag;
            cell.team = tile.team;
        }

        for player in &snapshot.players {
            if engine.players.contains_key(&player.id) {
                return Err(InitializationError::DuplicatePlayer(player.id.clone()));
            }
            if !player.position.is_off_grid() {
                let Some(cell) = engine.tile_mut(player.position) else {
                    return Err(InitializationError::PlayerOutOfBounds {
                        id: player.id.clone(),
                        position: player.position,
                        dimensions,
                    });
                };
                cell.insert_player(player.id.clone());
            }
            engine
                .starting_positions
                .insert(player.id.clone(), player.position);
            engine.players.insert(player.id.clone(), player.clone());
        }

        for item in &snapshot.items {
            if engine.items.contains_key(&item.id) {
                return Err(InitializationError::DuplicateItem(item.id.clone()));
            }
            if !item.position.is_off_grid() {
                let Some(cell) = engine.tile_mut(item.position) else {
                    return Err(InitializationError::ItemOutOfBounds {
                        id: item.id.clone(),
                        position: item.position,
                        dimensions,
                    });
                };
                cell.insert_item(item.id.clone());
            }
            engine.items.insert(item.id.clone(), item.clone());
        }

        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            players = engine.players.len(),
            items = engine.items.len(),
            "board initialized"
        );
        Ok(engine)
    }

    /// Replaces the whole board with a fresh snapshot.
    ///
    /// On error the current board is left untouched.
    pub fn initialize(&mut self, snapshot: &Snapshot) -> Result<(), InitializationError> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    /// Folds a batch of position changes into the board.
    ///
    /// Every change is applied independently; the ones that cannot apply
    /// (unknown id, out-of-bounds destination) are skipped. Returns how many
    /// changes took effect.
    pub fn apply_changes(&mut self, changes: &[Change]) -> usize {
        let mut applied = 0;
        for change in changes {
            if self.apply_change(change) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_change(&mut self, change: &Change) -> bool {
        if !change.to.is_off_grid() && !self.dimensions.contains(change.to) {
            tracing::debug!(
                entity = change.entity.id(),
                to = %change.to,
                "ignoring off-board destination"
            );
            return false;
        }

        let applied = match &change.entity {
            EntityRef::Player(id) => self.move_player(id, change.from, change.to),
            EntityRef::Item(id) => self.move_item(id, change.from, change.to),
        };
        if !applied {
            tracing::debug!(
                entity = change.entity.id(),
                kind = %change.kind(),
                "ignoring change for unknown entity"
            );
        }
        applied
    }

    fn move_player(&mut self, id: &PlayerId, from: Position, to: Position) -> bool {
        let Some(recorded) = self.players.get(id).map(|player| player.position) else {
            return false;
        };

        // Stale `from` values are tolerated; the recorded position wins.
        for source in [from, recorded] {
            if let Some(tile) = self.tile_mut(source) {
                tile.remove_player(id);
            }
        }

        let destination = match self.tile_mut(to) {
            Some(tile) => {
                tile.insert_player(id.clone());
                to
            }
            None => Position::OFF_GRID,
        };
        if let Some(player) = self.players.get_mut(id) {
            player.position = destination;
        }
        true
    }

    fn move_item(&mut self, id: &ItemId, from: Position, to: Position) -> bool {
        let Some(recorded) = self.items.get(id).map(|item| item.position) else {
            return false;
        };

        for source in [from, recorded] {
            if let Some(tile) = self.tile_mut(source) {
                tile.remove_item(id);
            }
        }

        let destination = match self.tile_mut(to) {
            Some(tile) => {
                tile.insert_item(id.clone());
                to
            }
            None => Position::OFF_GRID,
        };
        if let Some(item) = self.items.get_mut(id) {
            item.position = destination;
        }
        true
    }

    /// Records which item a player is carrying.
    ///
    /// Returns false when the player is unknown.
    pub fn set_carried_item(&mut self, id: &PlayerId, item: Option<ItemId>) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.carried_item = item;
                true
            }
            None => false,
        }
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// All known players in id order, including off-grid ones.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    /// Players standing on `position`, lowest id first.
    pub fn players_at(&self, position: Position) -> impl Iterator<Item = &Player> {
        self.tile(position)
            .into_iter()
            .flat_map(|tile| tile.players())
            .filter_map(|id| self.players.get(id))
    }

    pub fn items_at(&self, position: Position) -> impl Iterator<Item = &Item> {
        self.tile(position)
            .into_iter()
            .flat_map(|tile| tile.items())
            .filter_map(|id| self.items.get(id))
    }

    /// Team displayed for a tile: its own team, or the team of its first
    /// occupant when the tile itself is neutral.
    pub fn effective_team(&self, position: Position) -> Option<Team> {
        let tile = self.tile(position)?;
        if !tile.team.is_neutral() {
            return Some(tile.team);
        }
        let first = self.players_at(position).next();
        Some(first.map_or(Team::Neutral, |player| player.team))
    }

    /// Where a defeated player reappears.
    ///
    /// The first spawn tile of the player's team in row-major order, else
    /// the position the player had in the snapshot.
    pub fn spawn_point(&self, id: &PlayerId) -> Option<Position> {
        let team = self.players.get(id)?.team;
        let spawn = self
            .tiles
            .iter()
            .position(|tile| tile.flag == TileFlag::Spawn && tile.team == team)
            .map(|index| self.position_of(index));
        spawn.or_else(|| self.starting_positions.get(id).copied())
    }

    /// The change that sends a player back to its spawn point.
    pub fn respawn_change(&self, id: &PlayerId) -> Option<Change> {
        let player = self.players.get(id)?;
        let spawn = self.spawn_point(id)?;
        Some(Change::player(id.clone(), player.position, spawn))
    }

    /// Positions of every tile carrying `flag`, row-major.
    pub fn tiles_with_flag(&self, flag: TileFlag) -> impl Iterator<Item = (Position, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, tile)| tile.flag == flag)
            .map(|(index, tile)| (self.position_of(index), tile))
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.dimensions.contains(position) {
            return None;
        }
        Some(position.y as usize * self.dimensions.width as usize + position.x as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        let width = self.dimensions.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        let index = self.index(position)?;
        self.tiles.get_mut(index)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::{PlayerClass, TileOverride};

    pub(crate) fn player(id: &str, class: PlayerClass, team: Team, x: i32, y: i32) -> Player {
        Player::new(PlayerId::new(id), id.to_uppercase(), class, team, Position::new(x, y))
    }

    pub(crate) fn item(id: &str, name: &str, x: i32, y: i32) -> Item {
        Item::new(ItemId::new(id), name, Position::new(x, y))
    }

    fn board() -> GridEngine {
        let snapshot = Snapshot::new(MapDimensions::new(5, 5))
            .with_tile(TileOverride::new(
                Position::new(4, 0),
                TileFlag::Spawn,
                Team::Team2,
            ))
            .with_player(player("a", PlayerClass::Fighter, Team::Team1, 0, 0))
            .with_player(player("b", PlayerClass::Thief, Team::Team2, 4, 4))
            .with_item(item("i1", "Ham", 2, 2));
        GridEngine::from_snapshot(&snapshot).expect("valid snapshot")
    }

    fn occupancy(engine: &GridEngine) -> Vec<(Position, Vec<String>, Vec<String>)> {
        let dims = engine.dimensions();
        let mut out = Vec::new();
        for y in 0..dims.height as i32 {
            for x in 0..dims.width as i32 {
                let pos = Position::new(x, y);
                let tile = engine.tile(pos).expect("in bounds");
                out.push((
                    pos,
                    tile.players().map(|id| id.to_string()).collect(),
                    tile.items().map(|id| id.to_string()).collect(),
                ));
            }
        }
        out
    }

    #[test]
    fn rejects_out_of_bounds_snapshot_entirely() {
        let snapshot = Snapshot::new(MapDimensions::new(3, 3))
            .with_player(player("a", PlayerClass::Fighter, Team::Team1, 0, 0))
            .with_player(player("b", PlayerClass::Fighter, Team::Team2, 3, 1));
        assert!(matches!(
            GridEngine::from_snapshot(&snapshot),
            Err(InitializationError::PlayerOutOfBounds { .. })
        ));

        let mut engine = board();
        let before = engine.clone();
        assert!(engine.initialize(&snapshot).is_err());
        assert_eq!(engine, before);
    }

    #[test]
    fn rejects_empty_board_and_duplicates() {
        assert!(matches!(
            GridEngine::from_snapshot(&Snapshot::new(MapDimensions::new(0, 4))),
            Err(InitializationError::EmptyBoard { .. })
        ));

        let snapshot = Snapshot::new(MapDimensions::new(3, 3))
            .with_item(item("i1", "Ham", 0, 0))
            .with_item(item("i1", "Ham", 1, 0));
        assert_eq!(
            GridEngine::from_snapshot(&snapshot),
            Err(InitializationError::DuplicateItem(ItemId::new("i1")))
        );
    }

    #[test]
    fn removal_keeps_table_entry() {
        let mut engine = board();
        let id = PlayerId::new("a");
        let applied = engine.apply_changes(&[Change::player(
            id.clone(),
            Position::new(0, 0),
            Position::OFF_GRID,
        )]);
        assert_eq!(applied, 1);
        assert!(!engine.tile(Position::new(0, 0)).expect("tile").has_player(&id));
        assert_eq!(
            engine.player(&id).map(|p| p.position),
            Some(Position::OFF_GRID)
        );
    }

    #[test]
    fn off_board_destination_is_ignored() {
        let mut engine = board();
        let before = engine.clone();
        let applied = engine.apply_changes(&[Change::player(
            PlayerId::new("a"),
            Position::new(0, 0),
            Position::new(9, 0),
        )]);
        assert_eq!(applied, 0);
        assert_eq!(engine, before);
    }

    #[test]
    fn stale_source_never_duplicates_an_id() {
        let mut engine = board();
        let id = PlayerId::new("a");
        // Source is wrong and even off the board; the id must still end up
        // on exactly one tile.
        engine.apply_changes(&[
            Change::player(id.clone(), Position::new(-5, 7), Position::new(1, 0)),
            Change::player(id.clone(), Position::new(3, 3), Position::new(1, 1)),
        ]);
        let holders = occupancy(&engine)
            .into_iter()
            .filter(|(_, players, _)| players.contains(&"a".to_string()))
            .count();
        assert_eq!(holders, 1);
        let placed: usize = occupancy(&engine).iter().map(|(_, p, _)| p.len()).sum();
        assert_eq!(placed, 2);
        assert_eq!(
            engine.player(&id).map(|p| p.position),
            Some(Position::new(1, 1))
        );
    }

    #[test]
    fn change_then_reverse_restores_occupancy() {
        let mut engine = board();
        let before = occupancy(&engine);
        let batch = [
            Change::player(PlayerId::new("a"), Position::new(0, 0), Position::new(0, 1)),
            Change::item(ItemId::new("i1"), Position::new(2, 2), Position::OFF_GRID),
        ];
        engine.apply_changes(&batch);
        assert_ne!(occupancy(&engine), before);

        let reversed: Vec<_> = batch.iter().map(Change::reversed).collect();
        engine.apply_changes(&reversed);
        assert_eq!(occupancy(&engine), before);
    }

    #[test]
    fn unknown_entity_changes_are_skipped() {
        let mut engine = board();
        let applied = engine.apply_changes(&[Change::item(
            ItemId::new("ghost"),
            Position::new(0, 0),
            Position::new(1, 1),
        )]);
        assert_eq!(applied, 0);
        assert!(!engine.tile(Position::new(1, 1)).expect("tile").has_item(&ItemId::new("ghost")));
    }

    #[test]
    fn spawn_prefers_team_spawn_tile() {
        let engine = board();
        assert_eq!(
            engine.spawn_point(&PlayerId::new("b")),
            Some(Position::new(4, 0))
        );
        // Team1 has no spawn tile; falls back to the snapshot position.
        assert_eq!(
            engine.spawn_point(&PlayerId::new("a")),
            Some(Position::new(0, 0))
        );
        assert_eq!(engine.spawn_point(&PlayerId::new("zz")), None);
    }

    #[test]
    fn respawn_returns_player_to_team_spawn() {
        let mut engine = board();
        let id = PlayerId::new("b");
        engine.apply_changes(&[Change::player(
            id.clone(),
            Position::new(4, 4),
            Position::new(3, 4),
        )]);
        let change = engine.respawn_change(&id).expect("known player");
        assert_eq!(change.from, Position::new(3, 4));
        assert_eq!(change.to, Position::new(4, 0));
        engine.apply_changes(&[change]);
        assert!(engine.tile(Position::new(4, 0)).expect("tile").has_player(&id));
    }

    #[test]
    fn neutral_tile_takes_first_occupant_team() {
        let snapshot = Snapshot::new(MapDimensions::new(2, 1))
            .with_player(player("b", PlayerClass::Fighter, Team::Team2, 0, 0))
            .with_player(player("a", PlayerClass::Fighter, Team::Team1, 0, 0));
        let engine = GridEngine::from_snapshot(&snapshot).expect("valid snapshot");
        assert_eq!(engine.effective_team(Position::new(0, 0)), Some(Team::Team1));
        assert_eq!(engine.effective_team(Position::new(1, 0)), Some(Team::Neutral));
        assert_eq!(engine.effective_team(Position::new(2, 0)), None);
    }

    #[test]
    fn carried_item_is_tracked() {
        let mut engine = board();
        let id = PlayerId::new("a");
        assert!(engine.set_carried_item(&id, Some(ItemId::new("i1"))));
        assert_eq!(
            engine.player(&id).and_then(|p| p.carried_item.clone()),
            Some(ItemId::new("i1"))
        );
        assert!(!engine.set_carried_item(&PlayerId::new("nobody"), None));
    }
}
