//! Fixed-order tick pipeline that resolves one wave.

use log::debug;
use node_defense_core::{Command, Event, Phase, ScheduledWave, TowerTarget};
use node_defense_system_movement::Movement;
use node_defense_system_spawning::Spawning;
use node_defense_system_tower_combat::TowerCombat;
use node_defense_system_tower_targeting::TowerTargeting;
use node_defense_world::{self as world, query, World};
use serde::{Deserialize, Serialize};

/// Result of a single combat tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// The wave continues.
    Continue,
    /// Every scheduled enemy spawned and none remain on the route.
    Cleared,
    /// The core ran out of hit points; the tick stopped at the breach.
    CoreDestroyed,
}

/// Drives the combat systems in a fixed order, once per tick.
///
/// Targeting reads a single snapshot taken after movement, so every tower
/// sees the same enemies and damage lands before any casualty is removed.
#[derive(Debug, Default)]
pub struct CombatResolver {
    spawning: Spawning,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl CombatResolver {
    /// Creates a resolver with no wave loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the schedule of the wave that is about to be fought.
    pub fn begin(&mut self, schedule: ScheduledWave) {
        self.spawning.load(schedule);
    }

    /// Scheduled enemies that have not entered the route yet.
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.spawning.remaining()
    }

    /// Runs one tick: clock, spawns, movement, targeting and fire, casualties.
    pub fn step(&mut self, world: &mut World, out_events: &mut Vec<Event>) -> TickOutcome {
        let phase = Phase::Combat;
        let first_event = out_events.len();

        world::apply(world, Command::Tick, out_events);

        self.commands.clear();
        self.spawning
            .handle(phase, &out_events[first_event..], &mut self.commands);
        self.flush(world, out_events);

        let enemies = query::enemy_view(world);
        self.movement
            .handle(phase, &out_events[first_event..], &enemies, &mut self.commands);
        self.flush(world, out_events);
        if out_events[first_event..]
            .iter()
            .any(|event| matches!(event, Event::CoreDestroyed))
        {
            return TickOutcome::CoreDestroyed;
        }

        let towers = query::tower_view(world);
        let enemies = query::enemy_view(world);
        self.targeting
            .handle(phase, &towers, &enemies, &mut self.targets);
        self.combat
            .handle(phase, &towers, &self.targets, &mut self.commands);
        self.flush(world, out_events);

        world::apply(world, Command::ResolveCasualties, out_events);

        if self.spawning.is_exhausted() && query::is_wave_clear(world) {
            debug!("wave cleared after {} ticks", query::tick(world));
            return TickOutcome::Cleared;
        }
        TickOutcome::Continue
    }

    fn flush(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(world, command, out_events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_defense_core::{
        EngineConfig, EnemyKind, EnemyStats, ScheduledSpawn, TileCoord, TowerKind, WaveNumber,
    };
    use node_defense_world::GridMap;

    fn corridor_world() -> World {
        let route = (0..5).map(|column| TileCoord::new(column, 1)).collect();
        let map = GridMap::from_route(5, 3, route).expect("corridor");
        World::with_map(&EngineConfig::default(), map)
    }

    fn schedule(ticks: &[u64]) -> ScheduledWave {
        let stats = EnemyStats {
            hp: 10,
            step_interval: 1,
            reward: 4,
            core_damage: 2,
        };
        ScheduledWave::new(
            WaveNumber::new(1),
            ticks
                .iter()
                .map(|&tick| ScheduledSpawn {
                    tick,
                    kind: EnemyKind::Ddos,
                    stats,
                })
                .collect(),
        )
    }

    #[test]
    fn spawns_drain_on_schedule_until_cleared() {
        let mut world = corridor_world();
        let mut resolver = CombatResolver::new();
        resolver.begin(schedule(&[0, 2]));
        let mut events = Vec::new();

        assert_eq!(resolver.step(&mut world, &mut events), TickOutcome::Continue);
        assert_eq!(resolver.pending_spawns(), 1);
        let _ = resolver.step(&mut world, &mut events);
        assert_eq!(resolver.pending_spawns(), 1);
        let _ = resolver.step(&mut world, &mut events);
        assert_eq!(resolver.pending_spawns(), 0);

        let mut outcome = TickOutcome::Continue;
        for _ in 0..10 {
            outcome = resolver.step(&mut world, &mut events);
            if outcome != TickOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, TickOutcome::Cleared);
        assert_eq!(query::core_hp(&world), 96);
    }

    #[test]
    fn stacked_towers_kill_once_and_pay_once() {
        let mut world = corridor_world();
        let mut events = Vec::new();
        for column in [0, 1] {
            world::apply(
                &mut world,
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(column, 0),
                },
                &mut events,
            );
        }
        let credits = query::resources(&world).credits;

        let mut resolver = CombatResolver::new();
        resolver.begin(schedule(&[0]));
        events.clear();
        assert_eq!(resolver.step(&mut world, &mut events), TickOutcome::Cleared);

        let fired = events
            .iter()
            .filter(|event| matches!(event, Event::TowerFired { .. }))
            .count();
        let destroyed = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDestroyed { reward: 4, .. }))
            .count();
        assert_eq!(fired, 2);
        assert_eq!(destroyed, 1);
        assert_eq!(query::resources(&world).credits, credits + 4);
    }
}
