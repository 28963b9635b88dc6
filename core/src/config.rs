//! Tuning knobs for every adjustable aspect of a session.
//!
//! Every section falls back to its defaults when omitted, so a configuration
//! file only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::{EnemyCatalog, Resources, TowerCatalog};

/// Aggregated configuration for a whole session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Map dimensions and carving parameters.
    pub map: MapConfig,
    /// Starting pool and core durability.
    pub economy: EconomyConfig,
    /// Difficulty curve and spawn pacing.
    pub waves: WaveConfig,
    /// Resources credited after each cleared wave.
    pub rewards: RewardConfig,
    /// Reputation bounds and trade pricing.
    pub diplomacy: DiplomacyConfig,
    /// Tower definitions.
    pub towers: TowerCatalog,
    /// Enemy definitions.
    pub enemies: EnemyCatalog,
}

/// Map dimensions and route carving parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Chance, in percent, that a tile off the route becomes blocked.
    pub blocked_percent: u32,
    /// Random walks attempted per seed before carving gives up.
    pub max_attempts: u32,
    /// Shortest acceptable route; defaults to `columns + rows / 2`.
    pub min_route_length: Option<u32>,
    /// Fresh seeds tried by session setup when carving fails.
    pub seed_retries: u32,
}

impl MapConfig {
    /// Shortest acceptable route for the configured dimensions.
    #[must_use]
    pub fn effective_min_route_length(&self) -> u32 {
        self.min_route_length
            .unwrap_or_else(|| self.columns.saturating_add(self.rows / 2))
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            columns: 15,
            rows: 10,
            blocked_percent: 10,
            max_attempts: 16,
            min_route_length: None,
            seed_retries: 8,
        }
    }
}

/// Starting pool and core durability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Resources available when the session starts.
    pub starting_resources: Resources,
    /// Hit points of the defended core.
    pub core_hp: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_resources: Resources::new(100, 150, 150, 150),
            core_hp: 100,
        }
    }
}

/// Difficulty curve and spawn pacing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemy count before wave scaling.
    pub base_count: u32,
    /// Extra enemies per wave, in percent of one enemy.
    pub count_growth_percent: u32,
    /// Extra hit points per wave, in percent of the base hit points.
    pub hp_growth_percent: u32,
    /// Number of waves after which enemies step one tick faster; zero disables.
    pub speed_growth_every: u32,
    /// Ticks between consecutive spawns in the first wave.
    pub spawn_interval: u32,
    /// Lower bound for the spawn interval as waves progress.
    pub min_spawn_interval: u32,
    /// Whether low reputation with hostile factions raises their share of a wave.
    pub reputation_bias: bool,
    /// Wave whose clearance wins the session.
    pub final_wave: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_count: 5,
            count_growth_percent: 150,
            hp_growth_percent: 15,
            speed_growth_every: 10,
            spawn_interval: 4,
            min_spawn_interval: 2,
            reputation_bias: true,
            final_wave: 20,
        }
    }
}

/// Resources credited after each cleared wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Credits awarded for every cleared wave.
    pub wave_bonus_base: u32,
    /// Additional credits per wave number.
    pub wave_bonus_per_wave: u32,
    /// Lowest regeneration rolled for power, bandwidth, and processing.
    pub regen_min: u32,
    /// Highest regeneration rolled for power, bandwidth, and processing.
    pub regen_max: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            wave_bonus_base: 50,
            wave_bonus_per_wave: 10,
            regen_min: 10,
            regen_max: 20,
        }
    }
}

/// Reputation bounds and trade pricing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiplomacyConfig {
    /// Lowest reputation a faction can hold.
    pub reputation_min: i32,
    /// Highest reputation a faction can hold.
    pub reputation_max: i32,
    /// Reputation gained for every honored trade.
    pub trade_reputation_delta: i32,
    /// Discount, in percent, friendly factions grant at maximum reputation.
    pub max_discount_percent: u32,
}

impl DiplomacyConfig {
    /// Clamps a reputation value into the configured bounds.
    #[must_use]
    pub fn clamp_reputation(&self, reputation: i64) -> i32 {
        let low = i64::from(self.reputation_min.min(self.reputation_max));
        let high = i64::from(self.reputation_max.max(self.reputation_min));
        let clamped = reputation.clamp(low, high);
        i32::try_from(clamped).unwrap_or(self.reputation_max)
    }
}

impl Default for DiplomacyConfig {
    fn default() -> Self {
        Self {
            reputation_min: -100,
            reputation_max: 100,
            trade_reputation_delta: 5,
            max_discount_percent: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [map]
            columns = 20

            [economy.starting_resources]
            credits = 500
            "#,
        )
        .expect("config parses");

        assert_eq!(config.map.columns, 20);
        assert_eq!(config.map.rows, 10);
        assert_eq!(config.economy.starting_resources, Resources::credits(500));
        assert_eq!(config.economy.core_hp, 100);
        assert_eq!(config.waves, WaveConfig::default());
    }

    #[test]
    fn minimum_route_defaults_from_dimensions() {
        let config = MapConfig::default();
        assert_eq!(config.effective_min_route_length(), 20);
    }

    #[test]
    fn reputation_clamps_to_bounds() {
        let config = DiplomacyConfig::default();
        assert_eq!(config.clamp_reputation(250), 100);
        assert_eq!(config.clamp_reputation(-250), -100);
        assert_eq!(config.clamp_reputation(42), 42);
    }
}
