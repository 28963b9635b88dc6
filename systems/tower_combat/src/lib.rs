#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns aim decisions into shots.
//!
//! A tower fires when it holds a target and its cooldown has run out. Shots
//! come out in ascending tower id, which is the order the tower view is
//! already sorted in, so damage application never depends on the order
//! targeting produced its decisions.

use std::collections::BTreeMap;

use node_defense_core::{Command, EnemyId, Phase, TowerId, TowerTarget, TowerView};

/// Tower combat system that fires every ready, aimed tower once per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates the combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits one `Command::FireTower` per ready tower that holds a target.
    ///
    /// Towers still cooling down, and targets naming towers absent from the
    /// view, produce nothing. When a tower appears in several targets the
    /// first one counts.
    pub fn handle(
        &self,
        phase: Phase,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Combat || tower_targets.is_empty() {
            return;
        }

        let aims = aims_by_tower(tower_targets);
        out.extend(
            towers
                .iter()
                .filter(|snapshot| snapshot.is_ready())
                .filter_map(|snapshot| {
                    aims.get(&snapshot.id).map(|&enemy| Command::FireTower {
                        tower: snapshot.id,
                        enemy,
                    })
                }),
        );
    }
}

fn aims_by_tower(tower_targets: &[TowerTarget]) -> BTreeMap<TowerId, EnemyId> {
    let mut aims = BTreeMap::new();
    for target in tower_targets {
        let _ = aims.entry(target.tower).or_insert(target.enemy);
    }
    aims
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_defense_core::{TileCoord, TowerKind, TowerSnapshot, TowerStats};

    fn snapshot(id: u32, ready_in: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::BandwidthFilter,
            at: TileCoord::new(id, 0),
            level: 1,
            stats: TowerStats {
                damage: 8,
                range_tenths: 20,
                cooldown_ticks: 4,
            },
            ready_in,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
        }
    }

    fn shot(tower: u32, enemy: u32) -> Command {
        Command::FireTower {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
        }
    }

    #[test]
    fn build_phase_is_silent() {
        let towers = TowerView::from_snapshots(vec![snapshot(1, 0)]);
        let mut out = Vec::new();

        TowerCombat::new().handle(Phase::Build, &towers, &[target(1, 7)], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn only_ready_towers_fire_in_tower_order() {
        let towers =
            TowerView::from_snapshots(vec![snapshot(5, 0), snapshot(2, 0), snapshot(3, 2)]);
        let targets = [target(5, 1), target(3, 1), target(2, 4)];
        let mut out = Vec::new();

        TowerCombat::new().handle(Phase::Combat, &towers, &targets, &mut out);

        assert_eq!(out, vec![shot(2, 4), shot(5, 1)]);
    }

    #[test]
    fn unknown_and_idle_towers_are_ignored() {
        let towers = TowerView::from_snapshots(vec![snapshot(0, 0), snapshot(1, 0)]);
        let mut out = Vec::new();

        TowerCombat::new().handle(Phase::Combat, &towers, &[target(9, 0)], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn a_tower_fires_once_at_its_first_target() {
        let towers = TowerView::from_snapshots(vec![snapshot(4, 0)]);
        let targets = [target(4, 2), target(4, 8)];
        let mut out = vec![shot(0, 0)];

        TowerCombat::new().handle(Phase::Combat, &towers, &targets, &mut out);

        assert_eq!(out, vec![shot(0, 0), shot(4, 2)]);
    }
}
