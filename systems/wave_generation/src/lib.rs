#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave generation system.
//!
//! Each wave draws its composition from a dedicated random stream derived
//! from the session seed and the wave number, so replaying a session with the
//! same seed reproduces every schedule regardless of what happened between
//! waves.

use log::debug;
use node_defense_core::{
    Disposition, EnemyCatalog, EnemyKind, EnemyStats, FactionSnapshot, ScheduledSpawn,
    ScheduledWave, WaveConfig, WaveNumber,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_WAVE: &str = "wave";

const BASE_KIND_WEIGHT: u32 = 10;
const EARLY_POOL: [EnemyKind; 2] = [EnemyKind::Botnet, EnemyKind::Ddos];
const MID_POOL: [EnemyKind; 4] = [
    EnemyKind::Botnet,
    EnemyKind::Ddos,
    EnemyKind::Worm,
    EnemyKind::Siphon,
];
const LATE_POOL: [EnemyKind; 3] = [EnemyKind::Intrusion, EnemyKind::Siphon, EnemyKind::Worm];
const FINAL_POOL: [EnemyKind; 5] = [
    EnemyKind::Botnet,
    EnemyKind::Ddos,
    EnemyKind::Intrusion,
    EnemyKind::Siphon,
    EnemyKind::Worm,
];

/// Pure system that produces deterministic spawn schedules for waves.
#[derive(Clone, Debug)]
pub struct WaveGeneration {
    global_seed: u64,
    config: WaveConfig,
    catalog: EnemyCatalog,
}

impl WaveGeneration {
    /// Creates a generator bound to the session seed and tuning.
    #[must_use]
    pub fn new(global_seed: u64, config: &WaveConfig, catalog: &EnemyCatalog) -> Self {
        Self {
            global_seed,
            config: config.clone(),
            catalog: catalog.clone(),
        }
    }

    /// Builds the spawn schedule for the provided wave.
    ///
    /// `factions` feeds the optional reputation bias; hostile factions the
    /// player has antagonized field a larger share of the wave.
    #[must_use]
    pub fn start_wave(&self, wave: WaveNumber, factions: &[FactionSnapshot]) -> ScheduledWave {
        let total = self.enemy_count(wave);
        let elites = elite_count(wave).min(total);
        let interval = self.spawn_interval(wave);
        let pool = regular_pool(wave);
        let weights: Vec<u32> = pool
            .iter()
            .map(|kind| self.kind_weight(*kind, factions))
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(derive_labeled_seed(
            derive_base_seed(self.global_seed, wave),
            RNG_STREAM_WAVE,
        ));

        let mut kinds: Vec<EnemyKind> = (0..total - elites)
            .map(|_| pick_weighted(&mut rng, pool, &weights))
            .collect();
        kinds.extend((0..elites).map(|_| EnemyKind::EliteHacker));

        let spawns = kinds
            .into_iter()
            .enumerate()
            .map(|(index, kind)| ScheduledSpawn {
                tick: u64::try_from(index).unwrap_or(u64::MAX) * u64::from(interval),
                kind,
                stats: self.scaled_stats(kind, wave),
            })
            .collect();

        let schedule = ScheduledWave::new(wave, spawns);
        debug!(
            "wave {} scheduled {} enemies ({} elite) every {} ticks",
            wave.get(),
            schedule.len(),
            elites,
            interval
        );
        schedule
    }

    /// Number of enemies the wave fields, elites included.
    #[must_use]
    pub fn enemy_count(&self, wave: WaveNumber) -> u32 {
        let growth = u64::from(wave.get()) * u64::from(self.config.count_growth_percent) / 100;
        let growth = u32::try_from(growth).unwrap_or(u32::MAX);
        self.config.base_count.saturating_add(growth)
    }

    /// Ticks between consecutive spawns in the provided wave.
    #[must_use]
    pub fn spawn_interval(&self, wave: WaveNumber) -> u32 {
        self.config
            .spawn_interval
            .saturating_sub(wave.get() / 5)
            .max(self.config.min_spawn_interval)
            .max(1)
    }

    /// Stats an enemy of the provided kind spawns with in the provided wave.
    #[must_use]
    pub fn scaled_stats(&self, kind: EnemyKind, wave: WaveNumber) -> EnemyStats {
        let base = self.catalog.spec(kind).base_stats();
        let percent =
            100 + u64::from(self.config.hp_growth_percent) * u64::from(wave.get());
        let hp = u32::try_from(u64::from(base.hp) * percent / 100).unwrap_or(u32::MAX);
        let step_interval = match self.config.speed_growth_every {
            0 => base.step_interval,
            every => base.step_interval.saturating_sub(wave.get() / every),
        }
        .max(1);

        EnemyStats {
            hp,
            step_interval,
            ..base
        }
    }

    fn kind_weight(&self, kind: EnemyKind, factions: &[FactionSnapshot]) -> u32 {
        if !self.config.reputation_bias {
            return BASE_KIND_WEIGHT;
        }

        let affiliated = kind.faction();
        let bias = factions
            .iter()
            .find(|snapshot| snapshot.id == affiliated)
            .filter(|snapshot| snapshot.disposition == Disposition::Hostile)
            .map_or(0, |snapshot| snapshot.reputation.min(0).unsigned_abs() / 10);
        BASE_KIND_WEIGHT + bias
    }
}

/// Number of elite hackers the wave fields.
#[must_use]
pub fn elite_count(wave: WaveNumber) -> u32 {
    match wave.get() {
        n @ 8..=12 if n % 3 == 0 => 1,
        n if n >= 13 => n / 5,
        _ => 0,
    }
}

fn regular_pool(wave: WaveNumber) -> &'static [EnemyKind] {
    match wave.get() {
        0..=3 => &EARLY_POOL,
        4..=7 => &MID_POOL,
        8..=12 => &LATE_POOL,
        _ => &FINAL_POOL,
    }
}

fn pick_weighted(rng: &mut ChaCha8Rng, pool: &[EnemyKind], weights: &[u32]) -> EnemyKind {
    let total: u32 = weights.iter().sum();
    let mut roll = rng.gen_range(0..total.max(1));
    for (kind, weight) in pool.iter().zip(weights) {
        if roll < *weight {
            return *kind;
        }
        roll -= weight;
    }
    pool[0]
}

fn derive_base_seed(global_seed: u64, wave: WaveNumber) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.get().to_le_bytes());
    finalize_seed(hasher)
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> WaveGeneration {
        WaveGeneration::new(7, &WaveConfig::default(), &EnemyCatalog::default())
    }

    #[test]
    fn elite_cadence_follows_wave_tiers() {
        assert_eq!(elite_count(WaveNumber::new(6)), 0);
        assert_eq!(elite_count(WaveNumber::new(9)), 1);
        assert_eq!(elite_count(WaveNumber::new(10)), 0);
        assert_eq!(elite_count(WaveNumber::new(12)), 1);
        assert_eq!(elite_count(WaveNumber::new(15)), 3);
    }

    #[test]
    fn first_wave_uses_early_pool() {
        let schedule = generator().start_wave(WaveNumber::new(1), &[]);
        assert_eq!(schedule.len(), 6);
        assert!(schedule
            .spawns()
            .iter()
            .all(|spawn| EARLY_POOL.contains(&spawn.kind)));
    }

    #[test]
    fn spawns_are_interleaved() {
        let schedule = generator().start_wave(WaveNumber::new(4), &[]);
        let ticks: Vec<u64> = schedule.spawns().iter().map(|spawn| spawn.tick).collect();
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ticks[1], 4);
    }

    #[test]
    fn stats_scale_with_wave() {
        let generator = generator();
        let botnet = generator.scaled_stats(EnemyKind::Botnet, WaveNumber::new(10));
        assert_eq!(botnet.hp, 75);
        assert_eq!(botnet.step_interval, 2);
        assert_eq!(botnet.reward, 10);

        let ddos = generator.scaled_stats(EnemyKind::Ddos, WaveNumber::new(30));
        assert_eq!(ddos.step_interval, 1);
    }

    #[test]
    fn seed_derivation_separates_waves() {
        let first = derive_base_seed(1, WaveNumber::new(1));
        let second = derive_base_seed(1, WaveNumber::new(2));
        assert_ne!(first, second);
        assert_eq!(first, derive_base_seed(1, WaveNumber::new(1)));
    }
}
