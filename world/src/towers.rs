//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use node_defense_core::{TileCoord, TowerId, TowerKind, TowerSnapshot, TowerStats};
use serde::{Deserialize, Serialize};

/// Tower stored inside the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Tile holding the tower.
    pub(crate) at: TileCoord,
    /// Current level, starting at one.
    pub(crate) level: u32,
    /// Stats derived from the kind and level.
    pub(crate) stats: TowerStats,
    /// Ticks remaining before the tower may fire again.
    pub(crate) ready_in: u32,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            at: self.at,
            level: self.level,
            stats: self.stats,
            ready_in: self.ready_in,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new level one tower, returning its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, at: TileCoord, stats: TowerStats) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                at,
                level: 1,
                stats,
                ready_in: 0,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Iterates towers in build order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Counts every tower's cooldown down by one tick.
    pub(crate) fn cool_down(&mut self) {
        for tower in self.entries.values_mut() {
            tower.ready_in = tower.ready_in.saturating_sub(1);
        }
    }
}
