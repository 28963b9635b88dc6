#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that releases scheduled enemies.

use node_defense_core::{Command, Event, Phase, ScheduledWave};

/// Pure system that walks a wave's schedule as the wave clock advances.
#[derive(Debug, Default)]
pub struct Spawning {
    schedule: Option<ScheduledWave>,
    cursor: usize,
}

impl Spawning {
    /// Creates a spawning system with no schedule loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active schedule and rewinds to its first entry.
    pub fn load(&mut self, schedule: ScheduledWave) {
        self.schedule = Some(schedule);
        self.cursor = 0;
    }

    /// Number of scheduled enemies that have not spawned yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.schedule
            .as_ref()
            .map_or(0, |schedule| schedule.len().saturating_sub(self.cursor))
    }

    /// Reports whether every scheduled enemy has been released.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Emits `SpawnEnemy` for every entry due at or before the latest tick.
    pub fn handle(&mut self, phase: Phase, events: &[Event], out: &mut Vec<Command>) {
        if phase != Phase::Combat {
            return;
        }

        let Some(now) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { tick } => Some(*tick),
            _ => None,
        }) else {
            return;
        };

        let Some(schedule) = &self.schedule else {
            return;
        };

        for spawn in &schedule.spawns()[self.cursor..] {
            if spawn.tick > now {
                break;
            }
            out.push(Command::SpawnEnemy {
                kind: spawn.kind,
                stats: spawn.stats,
            });
            self.cursor += 1;
        }
    }
}
