//! Rectangular read views of the board.

use std::collections::BTreeMap;

use super::GridEngine;
use crate::config::GameConfig;
use crate::state::{PlayerId, Position, Team, TileFlag};

/// Display projection of one tile. Derived on demand, never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedCell {
    pub occupant_label: String,
    pub item_label: String,
    pub flag: TileFlag,
    pub team: Team,
    /// Number of players on the tile; labels may be empty for unnamed players.
    pub occupant_count: usize,
}

impl RenderedCell {
    /// What every coordinate outside the board renders as.
    pub fn off_board() -> Self {
        Self {
            flag: TileFlag::Inaccessible,
            ..Self::default()
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant_count > 0
    }
}

/// A `height x width` row-major window anchored at `origin`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedGrid {
    pub origin: Position,
    pub width: u32,
    pub height: u32,
    pub rows: Vec<Vec<RenderedCell>>,
}

impl RenderedGrid {
    /// Cell at a board coordinate, if it lies inside this window.
    pub fn get(&self, position: Position) -> Option<&RenderedCell> {
        let col = usize::try_from(i64::from(position.x) - i64::from(self.origin.x)).ok()?;
        let row = usize::try_from(i64::from(position.y) - i64::from(self.origin.y)).ok()?;
        self.rows.get(row)?.get(col)
    }

    /// Cell at a window-relative row and column.
    pub fn cell(&self, row: usize, col: usize) -> Option<&RenderedCell> {
        self.rows.get(row)?.get(col)
    }

    /// The sub-window starting at window-relative `(row, col)`.
    pub fn sub_grid(&self, row: usize, col: usize, width: u32, height: u32) -> Option<Self> {
        let row_end = row.checked_add(height as usize)?;
        let col_end = col.checked_add(width as usize)?;
        let rows = self
            .rows
            .get(row..row_end)?
            .iter()
            .map(|cells| cells.get(col..col_end).map(<[_]>::to_vec))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            origin: self
                .origin
                .offset(i32::try_from(col).ok()?, i32::try_from(row).ok()?),
            width,
            height,
            rows,
        })
    }
}

/// The fog-of-war window around one player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub center: Position,
    pub radius: u32,
    pub grid: RenderedGrid,
}

impl Viewport {
    /// Looks up a board coordinate; `None` when it falls outside the window.
    pub fn cell(&self, position: Position) -> Option<&RenderedCell> {
        self.grid.get(position)
    }
}

impl GridEngine {
    /// Renders `height` rows of `width` cells starting at `(start_x, start_y)`.
    ///
    /// The window may hang off any edge of the board; those cells render as
    /// [`RenderedCell::off_board`].
    pub fn render_window(
        &self,
        start_x: i32,
        start_y: i32,
        width: u32,
        height: u32,
        condensed: bool,
    ) -> RenderedGrid {
        let rows = (0..i64::from(height))
            .map(|dy| {
                (0..i64::from(width))
                    .map(|dx| {
                        let x = i64::from(start_x) + dx;
                        let y = i64::from(start_y) + dy;
                        self.render_coordinate(x, y, condensed)
                    })
                    .collect()
            })
            .collect();
        RenderedGrid {
            origin: Position::new(start_x, start_y),
            width,
            height,
            rows,
        }
    }

    /// The whole board, condensed.
    pub fn render_all(&self) -> RenderedGrid {
        let dims = self.dimensions();
        self.render_window(0, 0, dims.width, dims.height, true)
    }

    /// Square window of `2 * radius + 1` cells per side centred on `center`.
    pub fn viewport(&self, center: Position, radius: u32) -> Viewport {
        let side = radius * 2 + 1;
        let reach = i32::try_from(radius).unwrap_or(i32::MAX);
        let grid = self.render_window(
            center.x.saturating_sub(reach),
            center.y.saturating_sub(reach),
            side,
            side,
            false,
        );
        Viewport {
            center,
            radius,
            grid,
        }
    }

    /// The window a player sees, sized by their class sight radius.
    pub fn viewport_for(&self, id: &PlayerId) -> Option<Viewport> {
        let player = self.player(id)?;
        Some(self.viewport(player.position, player.class.sight_radius()))
    }

    /// Coordinates that do not fit a board position are off the board.
    fn render_coordinate(&self, x: i64, y: i64, condensed: bool) -> RenderedCell {
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(x), Ok(y)) => self.render_cell(Position::new(x, y), condensed),
            _ => RenderedCell::off_board(),
        }
    }

    fn render_cell(&self, position: Position, condensed: bool) -> RenderedCell {
        let Some(tile) = self.tile(position) else {
            return RenderedCell::off_board();
        };

        let labels: Vec<&str> = self
            .players_at(position)
            .map(|player| player.label(condensed))
            .collect();

        let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
        for item in self.items_at(position) {
            *groups.entry(item.label(condensed)).or_default() += 1;
        }
        let item_label = groups
            .iter()
            .map(|(name, count)| format!("{name}x{count}"))
            .collect::<Vec<_>>()
            .join(GameConfig::ITEM_LABEL_SEPARATOR);

        RenderedCell {
            occupant_label: labels.join(GameConfig::PLAYER_LABEL_SEPARATOR),
            item_label,
            flag: tile.flag,
            team: self.effective_team(position).unwrap_or(tile.team),
            occupant_count: tile.players().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{item, player};
    use super::*;
    use crate::state::{MapDimensions, PlayerClass, Snapshot, TileOverride};

    fn engine() -> GridEngine {
        let snapshot = Snapshot::new(MapDimensions::new(10, 10))
            .with_tile(TileOverride::new(
                Position::new(5, 5),
                TileFlag::Inaccessible,
                Team::Neutral,
            ))
            .with_player(player("t", PlayerClass::Thief, Team::Team2, 2, 2))
            .with_player(player("a", PlayerClass::Fighter, Team::Team1, 3, 2))
            .with_player(player("b", PlayerClass::Ranger, Team::Team2, 3, 2))
            .with_item(item("i1", "Ham", 3, 2))
            .with_item(item("i2", "Ham", 3, 2))
            .with_item(item("i3", "Apple", 3, 2));
        GridEngine::from_snapshot(&snapshot).expect("valid snapshot")
    }

    #[test]
    fn labels_and_groups_items_by_name() {
        let engine = engine();
        let cell = engine
            .render_window(3, 2, 1, 1, false)
            .cell(0, 0)
            .cloned()
            .expect("cell");
        assert_eq!(cell.occupant_label, "A,B");
        assert_eq!(cell.item_label, "Applex1|Hamx2");
        assert_eq!(cell.team, Team::Team1);
        assert_eq!(cell.occupant_count, 2);

        let condensed = engine.render_window(3, 2, 1, 1, true);
        assert_eq!(
            condensed.cell(0, 0).map(|c| c.item_label.as_str()),
            Some("Ax1|Hx2")
        );
    }

    #[test]
    fn window_matches_sub_rectangle_of_full_render() {
        let engine = engine();
        let full = engine.render_all();
        for (x, y, w, h) in [(0, 0, 10, 10), (2, 1, 3, 4), (7, 7, 3, 3), (4, 0, 1, 10)] {
            let window = engine.render_window(x, y, w, h, true);
            let expected = full
                .sub_grid(y as usize, x as usize, w, h)
                .expect("in-bounds window");
            assert_eq!(window, expected, "window at ({x}, {y}) {w}x{h}");
        }
    }

    #[test]
    fn off_board_cells_are_inaccessible_and_blank() {
        let engine = engine();
        let window = engine.render_window(-3, 8, 6, 6, false);
        for y in 8..14 {
            for x in -3..3 {
                let cell = window.get(Position::new(x, y)).expect("inside window");
                let on_board = engine.dimensions().contains(Position::new(x, y));
                if !on_board {
                    assert_eq!(cell, &RenderedCell::off_board());
                }
            }
        }
    }

    #[test]
    fn extreme_anchors_render_off_board() {
        let engine = engine();
        for (x, y) in [(i32::MAX, 0), (i32::MAX, i32::MIN), (i32::MIN, i32::MAX), (-1, i32::MAX)] {
            let window = engine.render_window(x, y, 3, 2, false);
            assert_eq!(window.rows.len(), 2, "anchor ({x}, {y})");
            assert!(
                window
                    .rows
                    .iter()
                    .flatten()
                    .all(|cell| cell == &RenderedCell::off_board()),
                "anchor ({x}, {y})"
            );
            assert_eq!(window.get(Position::new(x, y)), Some(&RenderedCell::off_board()));
        }

        let far = Position::new(i32::MIN, i32::MIN);
        let window = engine.render_window(i32::MAX, i32::MAX, 2, 2, true);
        assert!(window.get(far).is_none());
    }

    #[test]
    fn viewport_near_the_numeric_edge_does_not_wrap() {
        let view = engine().viewport(Position::new(i32::MIN, i32::MAX), 2);
        assert_eq!((view.grid.width, view.grid.height), (5, 5));
        assert!(
            view.grid
                .rows
                .iter()
                .flatten()
                .all(|cell| cell.flag == TileFlag::Inaccessible && !cell.is_occupied())
        );
    }

    #[test]
    fn thief_sees_seven_by_seven_window() {
        let engine = engine();
        let view = engine.viewport_for(&PlayerId::new("t")).expect("player");
        assert_eq!(view.radius, 3);
        assert_eq!((view.grid.width, view.grid.height), (7, 7));
        assert_eq!(view.grid.rows.len(), 7);
        assert!(view.grid.rows.iter().all(|row| row.len() == 7));
        assert_eq!(view.grid.origin, Position::new(-1, -1));

        let corner = view.cell(Position::new(-1, -1)).expect("corner");
        assert_eq!(corner.flag, TileFlag::Inaccessible);
        assert!(corner.occupant_label.is_empty());

        let centre = view.cell(Position::new(2, 2)).expect("centre");
        assert_eq!(centre.occupant_label, "T");
        assert!(view.cell(Position::new(6, 2)).is_none());
    }

    #[test]
    fn empty_window_has_no_rows() {
        let engine = engine();
        let grid = engine.render_window(100, -100, 0, 0, true);
        assert!(grid.rows.is_empty());
    }
}
