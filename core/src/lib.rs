#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Node Defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The phase controller submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened, rejections included. Systems consume immutable
//! views such as [`TowerView`] and [`EnemyView`] and respond exclusively with
//! new command batches.

pub mod catalog;
pub mod config;
pub mod error;
pub mod faction;
pub mod resources;

use serde::{Deserialize, Serialize};

pub use catalog::{
    EnemyCatalog, EnemyKind, EnemySpec, TowerCatalog, TowerKind, TowerSpec, TowerStats, MAX_LEVEL,
};
pub use config::{
    DiplomacyConfig, EconomyConfig, EngineConfig, MapConfig, RewardConfig, WaveConfig,
};
pub use error::{BuildError, GenerationError, ResultTag, TradeError, UpgradeError};
pub use faction::{Disposition, FactionId, FactionSnapshot, TradeOffer};
pub use resources::{ResourceKind, Resources};

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Server Strike: Network Wars. Defend the node.";

/// Location of a single map tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the squared Euclidean distance between two tiles.
    #[must_use]
    pub fn distance_squared(self, other: TileCoord) -> u64 {
        let dx = u64::from(self.column.abs_diff(other.column));
        let dy = u64::from(self.row.abs_diff(other.row));
        dx * dx + dy * dy
    }

    /// Computes the Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Reports whether the two tiles share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: TileCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Terrain classification of a single map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open ground where towers may be built.
    Empty,
    /// Part of the route enemies traverse.
    Path,
    /// Impassable terrain that cannot hold towers.
    Blocked,
    /// Entry point where enemies appear.
    Spawn,
    /// The defended node at the end of the route.
    Core,
}

/// Unique identifier assigned to a tower in build order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based ordinal of a wave.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a new wave number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric wave ordinal.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Top-level state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The player places towers, upgrades, and trades.
    Build,
    /// A wave is being simulated tick by tick.
    Combat,
    /// Wave rewards are being applied.
    Reward,
    /// The final wave was cleared.
    Victory,
    /// The core was destroyed.
    Defeat,
    /// The player ended the session.
    Quit,
}

impl Phase {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Quit)
    }
}

/// Per-enemy stats resolved by the wave manager at schedule time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Hit points the enemy spawns with.
    pub hp: u32,
    /// Ticks the enemy waits between one-tile advances.
    pub step_interval: u32,
    /// Credits awarded when the enemy is destroyed.
    pub reward: u32,
    /// Core hit points removed when the enemy reaches the core.
    pub core_damage: u32,
}

/// Single entry of a wave's spawn schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSpawn {
    /// Wave-relative tick at which the enemy enters the route.
    pub tick: u64,
    /// Kind of enemy to spawn.
    pub kind: EnemyKind,
    /// Stats the enemy spawns with.
    pub stats: EnemyStats,
}

/// Ordered enemy spawn schedule for one wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWave {
    wave: WaveNumber,
    spawns: Vec<ScheduledSpawn>,
}

impl ScheduledWave {
    /// Creates a schedule, ordering the entries by spawn tick.
    #[must_use]
    pub fn new(wave: WaveNumber, mut spawns: Vec<ScheduledSpawn>) -> Self {
        spawns.sort_by_key(|spawn| spawn.tick);
        Self { wave, spawns }
    }

    /// Wave the schedule belongs to.
    #[must_use]
    pub const fn wave(&self) -> WaveNumber {
        self.wave
    }

    /// Scheduled entries in spawn order.
    #[must_use]
    pub fn spawns(&self) -> &[ScheduledSpawn] {
        &self.spawns
    }

    /// Number of enemies scheduled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    /// Reports whether the schedule contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    /// Sum of the hit points of every scheduled enemy.
    #[must_use]
    pub fn total_hp(&self) -> u64 {
        self.spawns
            .iter()
            .map(|spawn| u64::from(spawn.stats.hp))
            .sum()
    }

    /// Number of scheduled enemies of the provided kind.
    #[must_use]
    pub fn count_of(&self, kind: EnemyKind) -> usize {
        self.spawns.iter().filter(|spawn| spawn.kind == kind).count()
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by a single tick.
    Tick,
    /// Requests construction of a tower on the provided tile.
    BuildTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile that will hold the tower.
        at: TileCoord,
    },
    /// Requests an upgrade of the tower standing on the provided tile.
    UpgradeTower {
        /// Tile holding the tower.
        at: TileCoord,
    },
    /// Replaces a faction's current trade offer set.
    PublishOffers {
        /// Faction presenting the offers.
        faction: FactionId,
        /// Offers generated for the faction.
        offers: Vec<TradeOffer>,
    },
    /// Requests acceptance of one of a faction's current offers.
    AcceptTrade {
        /// Faction whose offer is accepted.
        faction: FactionId,
        /// Zero-based index into the faction's current offer set.
        offer: usize,
    },
    /// Starts a new wave, resetting the wave clock.
    BeginWave {
        /// Ordinal of the wave that begins.
        wave: WaveNumber,
    },
    /// Places a new enemy on the spawn tile.
    SpawnEnemy {
        /// Kind of enemy spawned.
        kind: EnemyKind,
        /// Stats resolved for the enemy.
        stats: EnemyStats,
    },
    /// Moves an enemy one tile further along the route.
    AdvanceEnemy {
        /// Identifier of the enemy that advances.
        enemy: EnemyId,
    },
    /// Fires a tower at an enemy.
    FireTower {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy that receives the damage.
        enemy: EnemyId,
    },
    /// Removes every enemy whose hit points are exhausted, crediting rewards.
    ResolveCasualties,
    /// Credits the provided resources to the pool.
    GrantResources {
        /// Resources credited.
        amount: Resources,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Wave-relative index of the tick that is being processed.
        tick: u64,
    },
    /// Confirms that a tower was built.
    TowerBuilt {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower built.
        kind: TowerKind,
        /// Tile holding the tower.
        at: TileCoord,
    },
    /// Reports that a build request was rejected.
    TowerBuildRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Tile provided in the request.
        at: TileCoord,
        /// Reason the build failed.
        reason: BuildError,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached.
        level: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tile provided in the request.
        at: TileCoord,
        /// Reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a faction's offer set was replaced.
    OffersPublished {
        /// Faction presenting the offers.
        faction: FactionId,
        /// Number of offers now available.
        count: usize,
    },
    /// Confirms that a trade was honored.
    TradeCompleted {
        /// Faction that traded.
        faction: FactionId,
        /// Offer that was accepted.
        offer: TradeOffer,
        /// Reputation after the trade.
        reputation: i32,
    },
    /// Reports that a trade was rejected.
    TradeRejected {
        /// Faction addressed by the request.
        faction: FactionId,
        /// Reason the trade failed.
        reason: TradeError,
    },
    /// Announces that a wave began.
    WaveBegan {
        /// Ordinal of the wave.
        wave: WaveNumber,
    },
    /// Confirms that an enemy entered the route.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy spawned.
        kind: EnemyKind,
    },
    /// Confirms that an enemy advanced one tile.
    EnemyAdvanced {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Route index reached.
        progress: usize,
    },
    /// Reports that an enemy reached the core and was removed without reward.
    CoreBreached {
        /// Identifier of the breaching enemy.
        enemy: EnemyId,
        /// Damage dealt to the core.
        damage: u32,
        /// Core hit points remaining.
        core_hp: u32,
    },
    /// Reports that the core ran out of hit points.
    CoreDestroyed,
    /// Confirms that a tower fired.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage dealt.
        damage: u32,
    },
    /// Reports that an enemy was destroyed and its reward credited.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Credits awarded.
        reward: u32,
    },
    /// Confirms that resources were credited outside of combat.
    ResourcesGranted {
        /// Resources credited.
        amount: Resources,
    },
}

/// Player-facing commands accepted by the phase controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Builds a tower of the given kind on a tile.
    Build {
        /// Type of tower.
        kind: TowerKind,
        /// Column of the tile.
        column: u32,
        /// Row of the tile.
        row: u32,
    },
    /// Upgrades the tower on a tile.
    Upgrade {
        /// Column of the tile.
        column: u32,
        /// Row of the tile.
        row: u32,
    },
    /// Reports the tower standing on a tile, if any.
    Info {
        /// Column of the tile.
        column: u32,
        /// Row of the tile.
        row: u32,
    },
    /// Enters the trading interaction.
    Trade,
    /// Lists a faction's offers.
    Talk {
        /// Faction addressed.
        faction: FactionId,
    },
    /// Accepts an offer of the faction last talked to.
    Accept {
        /// Zero-based offer index.
        offer: usize,
    },
    /// Leaves the trading interaction.
    Back,
    /// Starts the next wave.
    Start,
    /// Ends the session.
    Quit,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile holding the tower.
    pub at: TileCoord,
    /// Current level, starting at one.
    pub level: u32,
    /// Current combat stats.
    pub stats: TowerStats,
    /// Ticks remaining before the tower may fire again.
    pub ready_in: u32,
}

impl TowerSnapshot {
    /// Reports whether the tower may fire this tick.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready_in == 0
    }

    /// Reports whether the provided tile lies within the tower's range.
    #[must_use]
    pub fn covers(&self, tile: TileCoord) -> bool {
        let range = u64::from(self.stats.range_tenths);
        self.at.distance_squared(tile) * 100 <= range * range
    }
}

/// Target assignment produced by the targeting system for a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerTarget {
    /// Tower that aims.
    pub tower: TowerId,
    /// Enemy the tower aims at.
    pub enemy: EnemyId,
}

/// Read-only snapshot describing all towers on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view ordered by tower identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in build order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Tile currently occupied.
    pub tile: TileCoord,
    /// Index into the route of the occupied tile.
    pub progress: usize,
    /// Remaining hit points.
    pub hp: u32,
    /// Hit points at spawn.
    pub max_hp: u32,
    /// Ticks remaining before the enemy may advance.
    pub move_ready_in: u32,
}

impl EnemySnapshot {
    /// Reports whether the enemy may advance this tick.
    #[must_use]
    pub const fn ready_to_advance(&self) -> bool {
        self.move_ready_in == 0
    }
}

/// Read-only snapshot describing all active enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view ordered by enemy identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of active enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Presentation-facing description of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// Terrain of the tile.
    pub kind: TileKind,
    /// Tower kind and level standing on the tile.
    pub tower: Option<(TowerKind, u32)>,
    /// Kind of the foremost enemy standing on the tile.
    pub enemy: Option<EnemyKind>,
}

/// Presentation-facing legend of the whole map in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapView {
    columns: u32,
    rows: u32,
    tiles: Vec<TileView>,
}

impl MapView {
    /// Creates a map view from row-major tiles.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tiles: Vec<TileView>) -> Self {
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Provides the dimensions of the map.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Returns the tile at the provided coordinate.
    #[must_use]
    pub fn tile(&self, at: TileCoord) -> Option<&TileView> {
        if at.column() >= self.columns || at.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(at.row()).ok()?;
        let column = usize::try_from(at.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.tiles.get(row * width + column)
    }

    /// Iterates rows of tiles from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[TileView]> {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.tiles.chunks(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_matches_expectation() {
        let origin = TileCoord::new(1, 1);
        let destination = TileCoord::new(4, 5);
        assert_eq!(origin.distance_squared(destination), 25);
        assert_eq!(origin.manhattan_distance(destination), 7);
        assert!(TileCoord::new(2, 2).is_adjacent(TileCoord::new(2, 3)));
        assert!(!TileCoord::new(2, 2).is_adjacent(TileCoord::new(3, 3)));
    }

    #[test]
    fn schedule_orders_by_tick() {
        let stats = EnemyStats {
            hp: 10,
            step_interval: 2,
            reward: 1,
            core_damage: 1,
        };
        let schedule = ScheduledWave::new(
            WaveNumber::new(1),
            vec![
                ScheduledSpawn {
                    tick: 8,
                    kind: EnemyKind::Worm,
                    stats,
                },
                ScheduledSpawn {
                    tick: 0,
                    kind: EnemyKind::Botnet,
                    stats,
                },
            ],
        );
        let ticks: Vec<u64> = schedule.spawns().iter().map(|spawn| spawn.tick).collect();
        assert_eq!(ticks, vec![0, 8]);
        assert_eq!(schedule.total_hp(), 20);
        assert_eq!(schedule.count_of(EnemyKind::Worm), 1);
    }

    #[test]
    fn tower_range_uses_tenths_of_tiles() {
        let snapshot = TowerSnapshot {
            id: TowerId::new(0),
            kind: TowerKind::Firewall,
            at: TileCoord::new(5, 5),
            level: 1,
            stats: TowerStats {
                damage: 15,
                range_tenths: 25,
                cooldown_ticks: 10,
            },
            ready_in: 0,
        };
        assert!(snapshot.covers(TileCoord::new(7, 6)));
        assert!(!snapshot.covers(TileCoord::new(7, 7)));
        assert!(!snapshot.covers(TileCoord::new(8, 5)));
    }

    #[test]
    fn player_command_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Script {
            commands: Vec<PlayerCommand>,
        }

        let script: Script = toml::from_str(
            r#"
            commands = [
                { build = { kind = "firewall", column = 3, row = 1 } },
                { talk = { faction = "darknet_commune" } },
                "start",
            ]
            "#,
        )
        .expect("script parses");

        assert_eq!(
            script.commands,
            vec![
                PlayerCommand::Build {
                    kind: TowerKind::Firewall,
                    column: 3,
                    row: 1,
                },
                PlayerCommand::Talk {
                    faction: FactionId::DarknetCommune,
                },
                PlayerCommand::Start,
            ]
        );
    }

    #[test]
    fn wave_number_round_trips_through_bincode() {
        let wave = WaveNumber::new(7);
        let bytes = bincode::serialize(&wave).expect("serialize");
        let restored: WaveNumber = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, wave);
        assert_eq!(restored.next().get(), 8);
    }
}
