use std::collections::BTreeMap;

use super::GridEngine;
use crate::state::{Team, TileFlag};

/// Item counts held in treasure chests, bucketed by the owning team.
///
/// Teams whose chests are empty do not appear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChestInventory(BTreeMap<Team, BTreeMap<String, u32>>);

impl ChestInventory {
    pub fn team(&self, team: Team) -> Option<&BTreeMap<String, u32>> {
        self.0.get(&team)
    }

    pub fn count(&self, team: Team, name: &str) -> u32 {
        self.team(team)
            .and_then(|items| items.get(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Team, &BTreeMap<String, u32>)> {
        self.0.iter()
    }
}

impl GridEngine {
    /// Tallies the items lying on every treasure chest tile.
    pub fn chest_inventory_by_team(&self) -> ChestInventory {
        let mut inventory = BTreeMap::<Team, BTreeMap<String, u32>>::new();
        for (position, tile) in self.tiles_with_flag(TileFlag::TreasureChest) {
            for item in self.items_at(position) {
                *inventory
                    .entry(tile.team)
                    .or_default()
                    .entry(item.name.clone())
                    .or_default() += 1;
            }
        }
        ChestInventory(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{item, player};
    use super::*;
    use crate::state::{MapDimensions, PlayerClass, Position, Snapshot, TileOverride};

    #[test]
    fn counts_items_on_team_chests() {
        let snapshot = Snapshot::new(MapDimensions::new(5, 5))
            .with_tile(TileOverride::new(
                Position::new(3, 3),
                TileFlag::TreasureChest,
                Team::Team2,
            ))
            .with_player(player("p", PlayerClass::Fighter, Team::Team1, 3, 3))
            .with_item(item("i1", "Ham", 3, 3))
            .with_item(item("i2", "Ham", 3, 3))
            .with_item(item("i3", "Ham", 1, 1));
        let engine = GridEngine::from_snapshot(&snapshot).expect("valid snapshot");

        let inventory = engine.chest_inventory_by_team();
        assert_eq!(inventory.count(Team::Team2, "Ham"), 2);
        assert!(inventory.team(Team::Team1).is_none());
        assert!(inventory.team(Team::Neutral).is_none());
        assert_eq!(inventory.iter().count(), 1);
    }

    #[test]
    fn unclaimed_chest_counts_as_neutral() {
        let snapshot = Snapshot::new(MapDimensions::new(2, 2))
            .with_tile(TileOverride::new(
                Position::new(0, 1),
                TileFlag::TreasureChest,
                Team::Neutral,
            ))
            .with_item(item("g", "Gold", 0, 1));
        let engine = GridEngine::from_snapshot(&snapshot).expect("valid snapshot");
        assert_eq!(engine.chest_inventory_by_team().count(Team::Neutral, "Gold"), 1);

        let empty = Snapshot::new(MapDimensions::new(2, 2));
        let engine = GridEngine::from_snapshot(&empty).expect("valid snapshot");
        assert!(engine.chest_inventory_by_team().is_empty());
    }
}
