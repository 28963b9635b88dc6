#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances enemies along the route.

use node_defense_core::{Command, EnemyView, Event, Phase};

/// Pure system that reacts to clock ticks and emits advance commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Emits `AdvanceEnemy` for every enemy whose step interval elapsed, in
    /// ascending identifier order.
    pub fn handle(
        &self,
        phase: Phase,
        events: &[Event],
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Combat {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        out.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.ready_to_advance())
                .map(|enemy| Command::AdvanceEnemy { enemy: enemy.id }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_defense_core::{EnemyId, EnemyKind, EnemySnapshot, TileCoord};

    fn enemy(id: u32, move_ready_in: u32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Worm,
            tile: TileCoord::new(0, 0),
            progress: 0,
            hp: 20,
            max_hp: 20,
            move_ready_in,
        }
    }

    #[test]
    fn only_ready_enemies_advance() {
        let view = EnemyView::from_snapshots(vec![enemy(3, 0), enemy(1, 2), enemy(0, 0)]);
        let mut out = Vec::new();
        Movement.handle(
            Phase::Combat,
            &[Event::TimeAdvanced { tick: 4 }],
            &view,
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::AdvanceEnemy {
                    enemy: EnemyId::new(0)
                },
                Command::AdvanceEnemy {
                    enemy: EnemyId::new(3)
                },
            ]
        );
    }

    #[test]
    fn idle_without_clock_or_outside_combat() {
        let view = EnemyView::from_snapshots(vec![enemy(0, 0)]);
        let mut out = Vec::new();
        Movement.handle(Phase::Combat, &[], &view, &mut out);
        Movement.handle(
            Phase::Build,
            &[Event::TimeAdvanced { tick: 0 }],
            &view,
            &mut out,
        );
        assert!(out.is_empty());
    }
}
