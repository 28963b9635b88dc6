//! Fixed tower and enemy catalogs together with the per-level upgrade table.

use serde::{Deserialize, Serialize};

use crate::{EnemyStats, FactionId, Resources};

/// Highest level a tower can reach.
pub const MAX_LEVEL: u32 = 5;

/// Damage multiplier per level, in percent of the base damage.
const DAMAGE_PERCENT: [u32; MAX_LEVEL as usize] = [100, 130, 169, 219, 285];
/// Range bonus per level, in tenths of a tile.
const RANGE_BONUS_TENTHS: [u32; MAX_LEVEL as usize] = [0, 3, 6, 9, 12];
/// Cooldown multiplier per level, in percent of the base cooldown.
const COOLDOWN_PERCENT: [u32; MAX_LEVEL as usize] = [100, 91, 83, 75, 68];
/// Upgrade price per current level, in percent of the base cost.
const UPGRADE_COST_PERCENT_PER_LEVEL: u32 = 50;

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Basic defense with moderate damage and range.
    Firewall,
    /// Autonomous agent with high damage and slower attacks.
    AiAgent,
    /// Fast attacks with low damage, good against swarms.
    BandwidthFilter,
    /// Devastating damage with a very slow cycle.
    QuantumTrap,
    /// Long range with moderate damage.
    SignalJammer,
}

impl TowerKind {
    /// Every tower kind in catalog order.
    pub const ALL: [TowerKind; 5] = [
        TowerKind::Firewall,
        TowerKind::AiAgent,
        TowerKind::BandwidthFilter,
        TowerKind::QuantumTrap,
        TowerKind::SignalJammer,
    ];

    /// Human readable name of the tower.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Firewall => "Firewall",
            Self::AiAgent => "AI Agent",
            Self::BandwidthFilter => "Bandwidth Filter",
            Self::QuantumTrap => "Quantum Trap",
            Self::SignalJammer => "Signal Jammer",
        }
    }

    /// Single-character legend symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Firewall => 'F',
            Self::AiAgent => 'A',
            Self::BandwidthFilter => 'B',
            Self::QuantumTrap => 'Q',
            Self::SignalJammer => 'J',
        }
    }
}

/// Combat stats of a tower at a given level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerStats {
    /// Damage dealt per shot.
    pub damage: u32,
    /// Targeting radius in tenths of a tile.
    pub range_tenths: u32,
    /// Ticks between consecutive shots.
    pub cooldown_ticks: u32,
}

/// Base definition of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerSpec {
    /// Resources deducted when the tower is built.
    pub cost: Resources,
    /// Level one combat stats.
    pub base: TowerStats,
}

impl TowerSpec {
    const fn new(cost: Resources, damage: u32, range_tenths: u32, cooldown_ticks: u32) -> Self {
        Self {
            cost,
            base: TowerStats {
                damage,
                range_tenths,
                cooldown_ticks,
            },
        }
    }

    /// Stats of the tower at the provided level, clamped to `1..=MAX_LEVEL`.
    #[must_use]
    pub fn stats_at(&self, level: u32) -> TowerStats {
        let index = usize::try_from(level.clamp(1, MAX_LEVEL) - 1).unwrap_or(0);
        let percent = |value: u32, percent: u32| -> u32 {
            let scaled = u64::from(value) * u64::from(percent) / 100;
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };

        TowerStats {
            damage: percent(self.base.damage, DAMAGE_PERCENT[index]),
            range_tenths: self
                .base
                .range_tenths
                .saturating_add(RANGE_BONUS_TENTHS[index]),
            cooldown_ticks: percent(self.base.cooldown_ticks, COOLDOWN_PERCENT[index]).max(1),
        }
    }

    /// Cost of raising a tower from `level` to `level + 1`.
    #[must_use]
    pub fn upgrade_cost(&self, level: u32) -> Resources {
        self.cost
            .scaled_percent(level.saturating_mul(UPGRADE_COST_PERCENT_PER_LEVEL))
    }
}

/// Definitions of every tower kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerCatalog {
    /// Definition of [`TowerKind::Firewall`].
    pub firewall: TowerSpec,
    /// Definition of [`TowerKind::AiAgent`].
    pub ai_agent: TowerSpec,
    /// Definition of [`TowerKind::BandwidthFilter`].
    pub bandwidth_filter: TowerSpec,
    /// Definition of [`TowerKind::QuantumTrap`].
    pub quantum_trap: TowerSpec,
    /// Definition of [`TowerKind::SignalJammer`].
    pub signal_jammer: TowerSpec,
}

impl TowerCatalog {
    /// Definition of the provided tower kind.
    #[must_use]
    pub const fn spec(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Firewall => &self.firewall,
            TowerKind::AiAgent => &self.ai_agent,
            TowerKind::BandwidthFilter => &self.bandwidth_filter,
            TowerKind::QuantumTrap => &self.quantum_trap,
            TowerKind::SignalJammer => &self.signal_jammer,
        }
    }
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self {
            firewall: TowerSpec::new(Resources::new(50, 10, 0, 0), 15, 25, 10),
            ai_agent: TowerSpec::new(Resources::new(100, 0, 0, 30), 25, 30, 12),
            bandwidth_filter: TowerSpec::new(Resources::new(70, 0, 20, 0), 8, 20, 4),
            quantum_trap: TowerSpec::new(Resources::new(150, 20, 0, 50), 50, 20, 33),
            signal_jammer: TowerSpec::new(Resources::new(80, 25, 0, 0), 12, 40, 8),
        }
    }
}

/// Types of hostile programs that traverse the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Sturdy baseline attacker.
    Botnet,
    /// Fragile and fast.
    Ddos,
    /// Slow and heavily armored.
    Intrusion,
    /// Slow, durable resource thief.
    Siphon,
    /// Fast and fragile.
    Worm,
    /// Rare, slow, and extremely durable.
    EliteHacker,
}

impl EnemyKind {
    /// Every enemy kind in catalog order.
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Botnet,
        EnemyKind::Ddos,
        EnemyKind::Intrusion,
        EnemyKind::Siphon,
        EnemyKind::Worm,
        EnemyKind::EliteHacker,
    ];

    /// Human readable name of the enemy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Botnet => "Botnet Drone",
            Self::Ddos => "DDoS Packet",
            Self::Intrusion => "Intrusion Attempt",
            Self::Siphon => "Resource Siphon",
            Self::Worm => "Network Worm",
            Self::EliteHacker => "Elite Hacker",
        }
    }

    /// Single-character legend symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Botnet => 'b',
            Self::Ddos => 'd',
            Self::Intrusion => 'i',
            Self::Siphon => 's',
            Self::Worm => 'w',
            Self::EliteHacker => 'E',
        }
    }

    /// Faction that fields this kind of enemy.
    #[must_use]
    pub const fn faction(self) -> FactionId {
        match self {
            Self::Botnet | Self::Ddos | Self::Worm => FactionId::RogueSwarm,
            Self::Intrusion | Self::Siphon | Self::EliteHacker => FactionId::CorporateRemnant,
        }
    }
}

/// Base definition of an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Hit points before wave scaling.
    pub hp: u32,
    /// Ticks between one-tile advances before wave scaling.
    pub step_interval: u32,
    /// Credits awarded on destruction.
    pub reward: u32,
    /// Core damage dealt on breach.
    pub core_damage: u32,
}

impl EnemySpec {
    const fn new(hp: u32, step_interval: u32, reward: u32, core_damage: u32) -> Self {
        Self {
            hp,
            step_interval,
            reward,
            core_damage,
        }
    }

    /// Unscaled stats for an enemy of this kind.
    #[must_use]
    pub const fn base_stats(&self) -> EnemyStats {
        EnemyStats {
            hp: self.hp,
            step_interval: self.step_interval,
            reward: self.reward,
            core_damage: self.core_damage,
        }
    }
}

/// Definitions of every enemy kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCatalog {
    /// Definition of [`EnemyKind::Botnet`].
    pub botnet: EnemySpec,
    /// Definition of [`EnemyKind::Ddos`].
    pub ddos: EnemySpec,
    /// Definition of [`EnemyKind::Intrusion`].
    pub intrusion: EnemySpec,
    /// Definition of [`EnemyKind::Siphon`].
    pub siphon: EnemySpec,
    /// Definition of [`EnemyKind::Worm`].
    pub worm: EnemySpec,
    /// Definition of [`EnemyKind::EliteHacker`].
    pub elite_hacker: EnemySpec,
}

impl EnemyCatalog {
    /// Definition of the provided enemy kind.
    #[must_use]
    pub const fn spec(&self, kind: EnemyKind) -> &EnemySpec {
        match kind {
            EnemyKind::Botnet => &self.botnet,
            EnemyKind::Ddos => &self.ddos,
            EnemyKind::Intrusion => &self.intrusion,
            EnemyKind::Siphon => &self.siphon,
            EnemyKind::Worm => &self.worm,
            EnemyKind::EliteHacker => &self.elite_hacker,
        }
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self {
            botnet: EnemySpec::new(30, 3, 10, 5),
            ddos: EnemySpec::new(15, 2, 8, 3),
            intrusion: EnemySpec::new(50, 4, 20, 10),
            siphon: EnemySpec::new(40, 4, 15, 8),
            worm: EnemySpec::new(20, 2, 12, 4),
            elite_hacker: EnemySpec::new(100, 6, 50, 20),
        }
    }
}
