#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Node Defense.

mod economy;
mod factions;
pub mod grid;
mod navigation;
mod towers;

use log::{debug, info, warn};
use node_defense_core::{
    BuildError, Command, EngineConfig, EnemyId, EnemyKind, EnemyStats, Event, FactionId,
    GenerationError, Resources, TileCoord, TowerId, TowerKind, TradeError, TradeOffer,
    UpgradeError, WaveNumber, MAX_LEVEL, WELCOME_BANNER,
};
use serde::{Deserialize, Serialize};

use crate::{economy::EconomyLedger, factions::FactionRegistry, towers::TowerRegistry};

pub use grid::GridMap;

const SEED_RETRY_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    stats: EnemyStats,
    hp: u32,
    progress: usize,
    move_ready_in: u32,
}

/// Represents the authoritative Node Defense world state.
///
/// Every piece of session state lives here, so a serialized world is a
/// complete save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    config: EngineConfig,
    map: GridMap,
    towers: TowerRegistry,
    ledger: EconomyLedger,
    factions: FactionRegistry,
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
    core_hp: u32,
    wave: WaveNumber,
    tick_index: u64,
}

impl World {
    /// Creates a world on a freshly generated map.
    ///
    /// Carving failures are retried with derived seeds up to
    /// `config.map.seed_retries` times before the last error is surfaced.
    pub fn generate(config: &EngineConfig, seed: u64) -> Result<Self, GenerationError> {
        let map_config = &config.map;
        let mut attempt: u64 = 0;
        loop {
            let attempt_seed = seed.wrapping_add(attempt.wrapping_mul(SEED_RETRY_STRIDE));
            match GridMap::generate(attempt_seed, map_config) {
                Ok(map) => return Ok(Self::with_map(config, map)),
                Err(error @ GenerationError::RouteNotFound { .. })
                    if attempt < u64::from(map_config.seed_retries) =>
                {
                    warn!("map generation failed for seed {attempt_seed}: {error}; retrying");
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Creates a world around an existing map.
    #[must_use]
    pub fn with_map(config: &EngineConfig, map: GridMap) -> Self {
        Self {
            config: config.clone(),
            map,
            towers: TowerRegistry::new(),
            ledger: EconomyLedger::new(config.economy.starting_resources),
            factions: FactionRegistry::new(&config.diplomacy),
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            core_hp: config.economy.core_hp,
            wave: WaveNumber::default(),
            tick_index: 0,
        }
    }

    fn route_tile(&self, progress: usize) -> TileCoord {
        self.map
            .route()
            .get(progress)
            .copied()
            .unwrap_or_else(|| self.map.core())
    }

    fn build_tower(&mut self, kind: TowerKind, at: TileCoord) -> Result<Event, BuildError> {
        if !self.map.is_buildable(at) {
            return Err(BuildError::InvalidPosition);
        }
        let spec = *self.config.towers.spec(kind);
        if !self.ledger.spend(&spec.cost) {
            return Err(BuildError::InsufficientResources);
        }

        let tower = self.towers.insert(kind, at, spec.stats_at(1));
        self.map.place_tower(at, tower);
        debug!("built {} at {at:?} for {}", kind.name(), spec.cost);
        Ok(Event::TowerBuilt { tower, kind, at })
    }

    fn upgrade_tower(&mut self, at: TileCoord) -> Result<Event, UpgradeError> {
        let id = self.map.occupant(at).ok_or(UpgradeError::NoTower)?;
        let (kind, level) = self
            .towers
            .get(id)
            .map(|tower| (tower.kind, tower.level))
            .ok_or(UpgradeError::NoTower)?;
        if level >= MAX_LEVEL {
            return Err(UpgradeError::MaxLevel);
        }

        let spec = *self.config.towers.spec(kind);
        let cost = spec.upgrade_cost(level);
        if !self.ledger.spend(&cost) {
            return Err(UpgradeError::InsufficientResources);
        }

        let tower = self.towers.get_mut(id).ok_or(UpgradeError::NoTower)?;
        tower.level = level + 1;
        tower.stats = spec.stats_at(tower.level);
        debug!("upgraded {} at {at:?} to level {}", kind.name(), tower.level);
        Ok(Event::TowerUpgraded {
            tower: id,
            level: tower.level,
        })
    }

    fn accept_trade(&mut self, faction: FactionId, index: usize) -> Result<Event, TradeError> {
        if !faction.disposition().trades() {
            return Err(TradeError::NoTradeAvailable);
        }
        let offer: TradeOffer = self
            .factions
            .offer(faction, index)
            .cloned()
            .ok_or(TradeError::InvalidIndex)?;
        if !self.ledger.spend(&offer.give) {
            return Err(TradeError::InsufficientResources);
        }

        self.ledger.earn(&offer.receive);
        let reputation = self.factions.adjust_reputation(
            faction,
            self.config.diplomacy.trade_reputation_delta,
            &self.config.diplomacy,
        );
        self.factions.set_offers(faction, Vec::new());
        info!(
            "traded {} for {} with {}",
            offer.give,
            offer.receive,
            faction.name()
        );
        Ok(Event::TradeCompleted {
            faction,
            offer,
            reputation,
        })
    }

    fn advance_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let last = self.map.route().len().saturating_sub(1);
        let Some(index) = self.enemies.iter().position(|entry| entry.id == enemy) else {
            return;
        };

        let entry = &mut self.enemies[index];
        if entry.move_ready_in > 0 {
            return;
        }
        entry.progress += 1;
        entry.move_ready_in = entry.stats.step_interval.max(1);

        if entry.progress < last {
            out_events.push(Event::EnemyAdvanced {
                enemy,
                progress: entry.progress,
            });
            return;
        }

        let damage = entry.stats.core_damage;
        let _ = self.enemies.remove(index);
        self.core_hp = self.core_hp.saturating_sub(damage);
        debug!("enemy {} breached the core for {damage}", enemy.get());
        out_events.push(Event::CoreBreached {
            enemy,
            damage,
            core_hp: self.core_hp,
        });
        if self.core_hp == 0 {
            info!("core destroyed");
            out_events.push(Event::CoreDestroyed);
        }
    }

    fn fire_tower(&mut self, tower: TowerId, enemy: EnemyId) -> Option<Event> {
        let shooter = self.towers.get_mut(tower)?;
        if shooter.ready_in > 0 {
            return None;
        }
        let target = self.enemies.iter_mut().find(|entry| entry.id == enemy)?;

        let damage = shooter.stats.damage;
        target.hp = target.hp.saturating_sub(damage);
        shooter.ready_in = shooter.stats.cooldown_ticks;
        Some(Event::TowerFired {
            tower,
            enemy,
            damage,
        })
    }

    fn resolve_casualties(&mut self, out_events: &mut Vec<Event>) {
        let mut bounty = 0u32;
        let mut survivors = Vec::with_capacity(self.enemies.len());
        for enemy in self.enemies.drain(..) {
            if enemy.hp > 0 {
                survivors.push(enemy);
                continue;
            }
            bounty = bounty.saturating_add(enemy.stats.reward);
            out_events.push(Event::EnemyDestroyed {
                enemy: enemy.id,
                reward: enemy.stats.reward,
            });
        }
        self.enemies = survivors;
        self.ledger.earn(&Resources::credits(bounty));
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.tick_index = world.tick_index.saturating_add(1);
            world.towers.cool_down();
            for enemy in &mut world.enemies {
                enemy.move_ready_in = enemy.move_ready_in.saturating_sub(1);
            }
        }
        Command::BuildTower { kind, at } => match world.build_tower(kind, at) {
            Ok(event) => out_events.push(event),
            Err(reason) => out_events.push(Event::TowerBuildRejected { kind, at, reason }),
        },
        Command::UpgradeTower { at } => match world.upgrade_tower(at) {
            Ok(event) => out_events.push(event),
            Err(reason) => out_events.push(Event::TowerUpgradeRejected { at, reason }),
        },
        Command::PublishOffers { faction, offers } => {
            let count = offers.len();
            world.factions.set_offers(faction, offers);
            out_events.push(Event::OffersPublished { faction, count });
        }
        Command::AcceptTrade { faction, offer } => match world.accept_trade(faction, offer) {
            Ok(event) => out_events.push(event),
            Err(reason) => out_events.push(Event::TradeRejected { faction, reason }),
        },
        Command::BeginWave { wave } => {
            world.wave = wave;
            world.tick_index = 0;
            world.enemies.clear();
            info!("wave {} began", wave.get());
            out_events.push(Event::WaveBegan { wave });
        }
        Command::SpawnEnemy { kind, stats } => {
            let id = world.next_enemy_id;
            world.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
            let stats = EnemyStats {
                hp: stats.hp.max(1),
                step_interval: stats.step_interval.max(1),
                ..stats
            };
            world.enemies.push(Enemy {
                id,
                kind,
                stats,
                hp: stats.hp,
                progress: 0,
                move_ready_in: stats.step_interval,
            });
            out_events.push(Event::EnemySpawned { enemy: id, kind });
        }
        Command::AdvanceEnemy { enemy } => world.advance_enemy(enemy, out_events),
        Command::FireTower { tower, enemy } => {
            if let Some(event) = world.fire_tower(tower, enemy) {
                out_events.push(event);
            }
        }
        Command::ResolveCasualties => world.resolve_casualties(out_events),
        Command::GrantResources { amount } => {
            world.ledger.earn(&amount);
            out_events.push(Event::ResourcesGranted { amount });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use node_defense_core::{
        EngineConfig, EnemySnapshot, EnemyView, FactionId, FactionSnapshot, MapView, Resources,
        TileCoord, TileView, TowerSnapshot, TowerView, WaveNumber,
    };

    use super::{GridMap, World, WELCOME_BANNER};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(_world: &World) -> &'static str {
        WELCOME_BANNER
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &EngineConfig {
        &world.config
    }

    /// Provides read-only access to the map.
    #[must_use]
    pub fn map(world: &World) -> &GridMap {
        &world.map
    }

    /// Snapshot of the tower standing on the tile, if any.
    #[must_use]
    pub fn tower_at(world: &World, at: TileCoord) -> Option<TowerSnapshot> {
        let id = world.map.occupant(at)?;
        world.towers.get(id).map(|tower| tower.snapshot())
    }

    /// Captures a read-only view of every tower in build order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the active enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    kind: enemy.kind,
                    tile: world.route_tile(enemy.progress),
                    progress: enemy.progress,
                    hp: enemy.hp,
                    max_hp: enemy.stats.hp,
                    move_ready_in: enemy.move_ready_in,
                })
                .collect(),
        )
    }

    /// Current resource pool.
    #[must_use]
    pub fn resources(world: &World) -> Resources {
        world.ledger.balance()
    }

    /// Reports whether the pool covers the provided cost.
    #[must_use]
    pub fn can_afford(world: &World, cost: &Resources) -> bool {
        world.ledger.can_afford(cost)
    }

    /// Remaining core hit points.
    #[must_use]
    pub fn core_hp(world: &World) -> u32 {
        world.core_hp
    }

    /// Wave most recently begun; zero before the first wave.
    #[must_use]
    pub fn wave(world: &World) -> WaveNumber {
        world.wave
    }

    /// Number of ticks processed in the current wave.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether no enemy remains on the route.
    #[must_use]
    pub fn is_wave_clear(world: &World) -> bool {
        world.enemies.is_empty()
    }

    /// Snapshot of a single faction.
    #[must_use]
    pub fn faction(world: &World, id: FactionId) -> Option<FactionSnapshot> {
        world.factions.snapshot(id)
    }

    /// Snapshots every faction in roster order.
    #[must_use]
    pub fn factions(world: &World) -> Vec<FactionSnapshot> {
        world.factions.snapshots()
    }

    /// Presentation-facing legend of the whole map.
    #[must_use]
    pub fn map_view(world: &World) -> MapView {
        let tiles = world
            .map
            .tiles()
            .map(|(at, kind)| {
                let tower = world
                    .map
                    .occupant(at)
                    .and_then(|id| world.towers.get(id))
                    .map(|tower| (tower.kind, tower.level));
                let enemy = world
                    .enemies
                    .iter()
                    .filter(|enemy| world.route_tile(enemy.progress) == at)
                    .min_by_key(|enemy| enemy.id)
                    .map(|enemy| enemy.kind);
                TileView { kind, tower, enemy }
            })
            .collect();
        MapView::new(world.map.columns(), world.map.rows(), tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_defense_core::{Disposition, TileKind};

    fn corridor_world(config: &EngineConfig) -> World {
        let route = (0..6).map(|column| TileCoord::new(column, 1)).collect();
        let map = GridMap::from_route(6, 3, route).expect("corridor");
        World::with_map(config, map)
    }

    fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command, &mut events);
        }
        events
    }

    fn stats(hp: u32, core_damage: u32) -> EnemyStats {
        EnemyStats {
            hp,
            step_interval: 1,
            reward: 10,
            core_damage,
        }
    }

    #[test]
    fn generated_world_starts_with_configured_state() {
        let config = EngineConfig::default();
        let world = World::generate(&config, 11).expect("world");
        assert_eq!(query::resources(&world), Resources::new(100, 150, 150, 150));
        assert_eq!(query::core_hp(&world), 100);
        assert_eq!(query::wave(&world), WaveNumber::new(0));
        assert_eq!(query::factions(&world).len(), 5);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        let (columns, rows) = query::map_view(&world).dimensions();
        assert_eq!((columns, rows), (15, 10));
    }

    #[test]
    fn generation_surfaces_error_after_retries() {
        let mut config = EngineConfig::default();
        config.map.min_route_length = Some(10_000);
        config.map.max_attempts = 1;
        config.map.seed_retries = 2;
        assert_eq!(
            World::generate(&config, 5),
            Err(GenerationError::RouteNotFound { attempts: 1 })
        );
    }

    #[test]
    fn exact_cost_build_empties_pool_and_occupies_tile() {
        let mut config = EngineConfig::default();
        config.economy.starting_resources = Resources::new(50, 10, 0, 0);
        let mut world = corridor_world(&config);
        let at = TileCoord::new(2, 0);

        let events = apply_all(
            &mut world,
            vec![
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at,
                },
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at,
                },
            ],
        );

        assert_eq!(
            events,
            vec![
                Event::TowerBuilt {
                    tower: TowerId::new(0),
                    kind: TowerKind::Firewall,
                    at,
                },
                Event::TowerBuildRejected {
                    kind: TowerKind::Firewall,
                    at,
                    reason: BuildError::InvalidPosition,
                },
            ]
        );
        assert!(query::resources(&world).is_zero());
        assert_eq!(query::tower_at(&world, at).map(|tower| tower.level), Some(1));
    }

    #[test]
    fn build_rejections_leave_pool_untouched() {
        let mut config = EngineConfig::default();
        config.economy.starting_resources = Resources::credits(40);
        let mut world = corridor_world(&config);

        let events = apply_all(
            &mut world,
            vec![
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(1, 1),
                },
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(9, 9),
                },
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(1, 0),
                },
            ],
        );

        let reasons: Vec<BuildError> = events
            .iter()
            .filter_map(|event| match event {
                Event::TowerBuildRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                BuildError::InvalidPosition,
                BuildError::InvalidPosition,
                BuildError::InsufficientResources,
            ]
        );
        assert_eq!(query::resources(&world), Resources::credits(40));
    }

    #[test]
    fn upgrades_stop_at_max_level() {
        let mut config = EngineConfig::default();
        config.economy.starting_resources = Resources::new(10_000, 10_000, 0, 0);
        let mut world = corridor_world(&config);
        let at = TileCoord::new(3, 2);

        let mut commands = vec![Command::BuildTower {
            kind: TowerKind::Firewall,
            at,
        }];
        commands.extend((0..MAX_LEVEL).map(|_| Command::UpgradeTower { at }));
        let events = apply_all(&mut world, commands);

        assert_eq!(
            events.last(),
            Some(&Event::TowerUpgradeRejected {
                at,
                reason: UpgradeError::MaxLevel,
            })
        );
        let tower = query::tower_at(&world, at).expect("tower");
        assert_eq!(tower.level, MAX_LEVEL);
        assert_eq!(
            tower.stats,
            config.towers.spec(TowerKind::Firewall).stats_at(MAX_LEVEL)
        );

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::UpgradeTower {
                at: TileCoord::new(0, 0),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TowerUpgradeRejected {
                at: TileCoord::new(0, 0),
                reason: UpgradeError::NoTower,
            }]
        );
    }

    #[test]
    fn simultaneous_kill_credits_reward_once() {
        let mut config = EngineConfig::default();
        config.economy.starting_resources = Resources::new(100, 20, 0, 0);
        config.towers.firewall.base.damage = 6;
        let mut world = corridor_world(&config);

        let _ = apply_all(
            &mut world,
            vec![
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(0, 0),
                },
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(0, 2),
                },
                Command::SpawnEnemy {
                    kind: EnemyKind::Botnet,
                    stats: stats(10, 5),
                },
            ],
        );
        assert!(query::resources(&world).is_zero());

        let enemy = EnemyId::new(0);
        let events = apply_all(
            &mut world,
            vec![
                Command::FireTower {
                    tower: TowerId::new(0),
                    enemy,
                },
                Command::FireTower {
                    tower: TowerId::new(1),
                    enemy,
                },
                Command::ResolveCasualties,
                Command::ResolveCasualties,
            ],
        );

        let destroyed = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
        assert!(query::is_wave_clear(&world));
        assert_eq!(query::resources(&world), Resources::credits(10));
    }

    #[test]
    fn cooling_tower_holds_fire() {
        let mut config = EngineConfig::default();
        config.economy.starting_resources = Resources::new(50, 10, 0, 0);
        let mut world = corridor_world(&config);
        let _ = apply_all(
            &mut world,
            vec![
                Command::BuildTower {
                    kind: TowerKind::Firewall,
                    at: TileCoord::new(1, 0),
                },
                Command::SpawnEnemy {
                    kind: EnemyKind::Intrusion,
                    stats: stats(100, 5),
                },
            ],
        );
        let fire = Command::FireTower {
            tower: TowerId::new(0),
            enemy: EnemyId::new(0),
        };
        let events = apply_all(&mut world, vec![fire.clone(), fire]);
        assert_eq!(events.len(), 1);
        assert_eq!(
            query::tower_at(&world, TileCoord::new(1, 0)).map(|tower| tower.ready_in),
            Some(10)
        );
    }

    #[test]
    fn breach_at_five_hp_destroys_core() {
        let mut config = EngineConfig::default();
        config.economy.core_hp = 5;
        let mut world = corridor_world(&config);
        let enemy = EnemyId::new(0);

        let mut commands = vec![Command::SpawnEnemy {
            kind: EnemyKind::Botnet,
            stats: stats(30, 5),
        }];
        for _ in 0..5 {
            commands.push(Command::Tick);
            commands.push(Command::AdvanceEnemy { enemy });
        }
        let events = apply_all(&mut world, commands);

        assert_eq!(
            events[events.len() - 2..],
            [
                Event::CoreBreached {
                    enemy,
                    damage: 5,
                    core_hp: 0,
                },
                Event::CoreDestroyed,
            ]
        );
        assert_eq!(query::core_hp(&world), 0);
        assert!(query::is_wave_clear(&world));
        assert_eq!(query::resources(&world).credits, 100);
    }

    #[test]
    fn enemies_wait_for_their_step_interval() {
        let config = EngineConfig::default();
        let mut world = corridor_world(&config);
        let enemy = EnemyId::new(0);
        let events = apply_all(
            &mut world,
            vec![
                Command::SpawnEnemy {
                    kind: EnemyKind::Botnet,
                    stats: EnemyStats {
                        step_interval: 2,
                        ..stats(30, 5)
                    },
                },
                Command::Tick,
                Command::AdvanceEnemy { enemy },
                Command::Tick,
                Command::AdvanceEnemy { enemy },
            ],
        );
        let advances: Vec<&Event> = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyAdvanced { .. }))
            .collect();
        assert_eq!(
            advances,
            vec![&Event::EnemyAdvanced { enemy, progress: 1 }]
        );
        let view = query::map_view(&world);
        assert_eq!(
            view.tile(TileCoord::new(1, 1)).and_then(|tile| tile.enemy),
            Some(EnemyKind::Botnet)
        );
        assert_eq!(
            view.tile(TileCoord::new(0, 1)).map(|tile| tile.kind),
            Some(TileKind::Spawn)
        );
    }

    #[test]
    fn unaffordable_trade_changes_nothing() {
        let mut config = EngineConfig::default();
        config.economy.starting_resources = Resources::credits(5);
        let mut world = corridor_world(&config);
        let faction = FactionId::DarknetCommune;
        let offer = TradeOffer {
            give: Resources::credits(20),
            receive: Resources::new(0, 30, 0, 0),
            description: "power cells".to_owned(),
        };

        let events = apply_all(
            &mut world,
            vec![
                Command::PublishOffers {
                    faction,
                    offers: vec![offer],
                },
                Command::AcceptTrade { faction, offer: 0 },
                Command::AcceptTrade { faction, offer: 3 },
                Command::AcceptTrade {
                    faction: FactionId::RogueSwarm,
                    offer: 0,
                },
            ],
        );

        assert_eq!(
            events[1..],
            [
                Event::TradeRejected {
                    faction,
                    reason: TradeError::InsufficientResources,
                },
                Event::TradeRejected {
                    faction,
                    reason: TradeError::InvalidIndex,
                },
                Event::TradeRejected {
                    faction: FactionId::RogueSwarm,
                    reason: TradeError::NoTradeAvailable,
                },
            ]
        );
        assert_eq!(query::resources(&world), Resources::credits(5));
        let snapshot = query::faction(&world, faction).expect("faction");
        assert_eq!(snapshot.reputation, 30);
        assert_eq!(snapshot.disposition, Disposition::Friendly);
        assert_eq!(snapshot.offers.len(), 1);
    }

    #[test]
    fn honored_trade_moves_resources_and_clears_offers() {
        let config = EngineConfig::default();
        let mut world = corridor_world(&config);
        let faction = FactionId::ArchivistCollective;
        let offer = TradeOffer {
            give: Resources::credits(30),
            receive: Resources::new(0, 0, 40, 0),
            description: "bandwidth lease".to_owned(),
        };

        let events = apply_all(
            &mut world,
            vec![
                Command::PublishOffers {
                    faction,
                    offers: vec![offer.clone()],
                },
                Command::AcceptTrade { faction, offer: 0 },
            ],
        );

        assert_eq!(
            events.last(),
            Some(&Event::TradeCompleted {
                faction,
                offer,
                reputation: 25,
            })
        );
        assert_eq!(query::resources(&world), Resources::new(70, 150, 190, 150));
        assert!(query::faction(&world, faction)
            .expect("faction")
            .offers
            .is_empty());
    }

    #[test]
    fn world_state_round_trips_through_bincode() {
        let config = EngineConfig::default();
        let mut world = World::generate(&config, 3).expect("world");
        let _ = apply_all(
            &mut world,
            vec![
                Command::BeginWave {
                    wave: WaveNumber::new(1),
                },
                Command::SpawnEnemy {
                    kind: EnemyKind::Worm,
                    stats: stats(20, 4),
                },
                Command::GrantResources {
                    amount: Resources::credits(15),
                },
            ],
        );

        let bytes = bincode::serialize(&world).expect("serialize");
        let restored: World = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, world);
        assert_eq!(query::enemy_view(&restored).len(), 1);
        assert_eq!(query::resources(&restored).credits, 115);
    }
}
