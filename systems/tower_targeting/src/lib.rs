#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use node_defense_core::{EnemyId, EnemyView, Phase, TileCoord, TowerTarget, TowerView};

/// Tower targeting system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

#[derive(Clone, Copy, Debug)]
struct EnemyCandidate {
    id: EnemyId,
    tile: TileCoord,
    progress: usize,
}

impl EnemyCandidate {
    /// Furthest along the route wins; the older enemy breaks ties.
    fn precedes(&self, other: &EnemyCandidate) -> bool {
        self.progress > other.progress || (self.progress == other.progress && self.id < other.id)
    }
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments, one per tower with an enemy in range, in tower order.
    /// Every tower evaluates the same snapshot, so several towers may pick
    /// the same enemy.
    pub fn handle(
        &mut self,
        phase: Phase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if phase != Phase::Combat {
            return;
        }

        self.enemy_workspace.clear();
        self.enemy_workspace
            .extend(enemies.iter().map(|enemy| EnemyCandidate {
                id: enemy.id,
                tile: enemy.tile,
                progress: enemy.progress,
            }));
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            let mut best: Option<&EnemyCandidate> = None;
            for candidate in &self.enemy_workspace {
                if !tower.covers(candidate.tile) {
                    continue;
                }
                match best {
                    Some(existing) if !candidate.precedes(existing) => {}
                    _ => best = Some(candidate),
                }
            }

            if let Some(candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                });
            }
        }
    }
}
