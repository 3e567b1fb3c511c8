//! Plain-text presentation of rendered windows.
use std::fmt::Write;

use game_core::{ChestInventory, RenderedCell, RenderedGrid, TileFlag};
use runtime::MessageLog;

fn terrain_glyph(flag: TileFlag) -> &'static str {
    match flag {
        TileFlag::Empty => ".",
        TileFlag::Spawn => "S",
        TileFlag::TreasureChest => "C",
        TileFlag::Inaccessible => "#",
    }
}

/// What a cell shows: its first occupant, else its first item, else terrain.
fn cell_text(cell: &RenderedCell) -> &str {
    if cell.is_occupied() {
        if cell.occupant_label.is_empty() {
            "@"
        } else {
            &cell.occupant_label
        }
    } else if !cell.item_label.is_empty() {
        &cell.item_label
    } else {
        terrain_glyph(cell.flag)
    }
}

/// Rows of space-separated cells, every column padded to the widest label.
pub fn draw_grid(grid: &RenderedGrid) -> String {
    let width = grid
        .rows
        .iter()
        .flatten()
        .map(|cell| cell_text(cell).chars().count())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for row in &grid.rows {
        let line = row
            .iter()
            .map(|cell| format!("{:<width$}", cell_text(cell)))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn draw_chests(inventory: &ChestInventory) -> String {
    if inventory.is_empty() {
        return "Chests: empty\n".to_string();
    }
    let mut out = String::new();
    for (team, items) in inventory.iter() {
        let listing = items
            .iter()
            .map(|(name, count)| format!("{name} x{count}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{team} chest: {listing}");
    }
    out
}

/// The newest `limit` messages, oldest first.
pub fn draw_messages(log: &MessageLog, limit: usize) -> String {
    let mut recent: Vec<_> = log.recent(limit).collect();
    recent.reverse();
    recent.iter().fold(String::new(), |mut out, entry| {
        let _ = writeln!(out, "[{:?}] {}", entry.level, entry.text);
        out
    })
}
