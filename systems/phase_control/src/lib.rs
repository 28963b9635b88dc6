#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session state machine that owns the world and drives every system.
//!
//! A session moves `Build → Combat → Reward → Build` until it reaches one of
//! the terminal phases. Player commands are queued and only drained while
//! building, so nothing the player does can interleave with a running wave.

pub mod combat;

use std::collections::VecDeque;

use log::{debug, info};
use node_defense_core::{
    Command, EngineConfig, Event, FactionId, FactionSnapshot, GenerationError, Phase,
    PlayerCommand, ResourceKind, Resources, ResultTag, TileCoord, TowerId, TowerKind,
    TowerSnapshot, TradeOffer, WaveNumber,
};
use node_defense_system_diplomacy::Diplomacy;
use node_defense_system_wave_generation::WaveGeneration;
use node_defense_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use combat::{CombatResolver, TickOutcome};

/// Reply produced for every drained player command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// A tower was built.
    Built {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower built.
        kind: TowerKind,
        /// Tile holding the tower.
        at: TileCoord,
    },
    /// A tower gained a level.
    Upgraded {
        /// Identifier of the tower.
        tower: TowerId,
        /// Level reached.
        level: u32,
    },
    /// Describes the tower on the requested tile.
    Info {
        /// Tower standing on the tile, if any.
        tower: Option<TowerSnapshot>,
    },
    /// The trading interaction opened.
    TradeOpened {
        /// Every faction with its disposition and reputation.
        factions: Vec<FactionSnapshot>,
    },
    /// A faction presented its offers.
    Offers {
        /// Faction addressed.
        faction: FactionId,
        /// Offers now available from the faction.
        offers: Vec<TradeOffer>,
    },
    /// A trade was honored.
    Traded {
        /// Faction that traded.
        faction: FactionId,
        /// Offer that was accepted.
        offer: TradeOffer,
        /// Reputation after the trade.
        reputation: i32,
    },
    /// The trading interaction closed.
    TradeClosed,
    /// A wave began and the session entered combat.
    WaveStarted {
        /// Ordinal of the wave.
        wave: WaveNumber,
        /// Enemies scheduled for the wave.
        enemies: usize,
    },
    /// The session ended at the player's request.
    Quit,
    /// The command had no effect.
    Rejected {
        /// Command that was refused.
        command: PlayerCommand,
        /// Reason for the refusal.
        tag: ResultTag,
    },
}

impl Response {
    /// Result tag reported for the response.
    #[must_use]
    pub fn tag(&self) -> ResultTag {
        match self {
            Self::Rejected { tag, .. } => *tag,
            _ => ResultTag::Success,
        }
    }
}

/// How a wave ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveOutcome {
    /// Every enemy was destroyed or breached and the core survived.
    Cleared,
    /// The core was destroyed.
    GameOver,
    /// The player quit mid-wave.
    Quit,
}

/// Summary of one fought wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveReport {
    /// Ordinal of the wave.
    pub wave: WaveNumber,
    /// How the wave ended.
    pub outcome: WaveOutcome,
    /// Ticks processed.
    pub ticks: u64,
    /// Enemies destroyed by towers.
    pub destroyed: u32,
    /// Enemies that reached the core.
    pub breaches: u32,
    /// Core hit points left after the wave.
    pub core_hp: u32,
    /// Resources granted in the reward phase, if it was reached.
    pub reward: Option<Resources>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Interaction {
    Building,
    Trading { talking: Option<FactionId> },
}

/// Owns a session and sequences its phases.
#[derive(Debug)]
pub struct PhaseController {
    world: World,
    phase: Phase,
    seed: u64,
    waves: WaveGeneration,
    diplomacy: Diplomacy,
    resolver: CombatResolver,
    queue: VecDeque<PlayerCommand>,
    interaction: Interaction,
    quit_requested: bool,
    events: Vec<Event>,
}

impl PhaseController {
    /// Starts a session on a freshly generated map.
    pub fn new(config: &EngineConfig, seed: u64) -> Result<Self, GenerationError> {
        let world = World::generate(config, seed)?;
        Ok(Self::from_world(world, seed))
    }

    /// Resumes a session from a world saved between waves.
    #[must_use]
    pub fn from_world(world: World, seed: u64) -> Self {
        let config = query::config(&world);
        let waves = WaveGeneration::new(seed, &config.waves, &config.enemies);
        let diplomacy = Diplomacy::new(seed, &config.diplomacy);
        info!(
            "session ready at wave {} with {}",
            query::wave(&world).get(),
            query::resources(&world)
        );
        Self {
            world,
            phase: Phase::Build,
            seed,
            waves,
            diplomacy,
            resolver: CombatResolver::new(),
            queue: VecDeque::new(),
            interaction: Interaction::Building,
            quit_requested: false,
            events: Vec::new(),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Gives up the world, typically to save it.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    /// Commands waiting for the next build phase.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Submits a player command.
    ///
    /// Quit during combat is honored once the running tick completes; every
    /// other command waits in the queue until the session is building.
    pub fn submit(&mut self, command: PlayerCommand) {
        if command == PlayerCommand::Quit && self.phase == Phase::Combat {
            debug!("quit requested mid-wave");
            self.quit_requested = true;
            return;
        }
        self.queue.push_back(command);
    }

    /// Drains queued commands while the session is building.
    ///
    /// Draining stops after a command that leaves the build phase, leaving
    /// the rest queued for the next build phase.
    pub fn pump(&mut self) -> Vec<Response> {
        let mut responses = Vec::new();
        while self.phase == Phase::Build {
            let Some(command) = self.queue.pop_front() else {
                break;
            };
            let response = self.handle(command);
            debug!("{command:?} -> {:?}", response.tag());
            responses.push(response);
        }
        responses
    }

    /// Runs one combat tick, returning every event it produced.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.phase != Phase::Combat {
            return events;
        }

        match self.resolver.step(&mut self.world, &mut events) {
            TickOutcome::Continue => {}
            TickOutcome::Cleared => {
                info!("wave {} cleared", query::wave(&self.world).get());
                self.phase = Phase::Reward;
            }
            TickOutcome::CoreDestroyed => {
                info!("core destroyed during wave {}", query::wave(&self.world).get());
                self.phase = Phase::Defeat;
                return events;
            }
        }

        if self.quit_requested {
            info!("session quit during wave {}", query::wave(&self.world).get());
            self.quit_requested = false;
            self.phase = Phase::Quit;
        }
        events
    }

    /// Applies the wave reward and leaves the reward phase.
    ///
    /// Returns the granted resources, or `None` outside the reward phase.
    pub fn collect_reward(&mut self) -> Option<Resources> {
        if self.phase != Phase::Reward {
            return None;
        }

        let wave = query::wave(&self.world);
        let config = query::config(&self.world);
        let rewards = config.rewards.clone();
        let final_wave = config.waves.final_wave;

        let mut rng = ChaCha8Rng::seed_from_u64(derive_reward_seed(self.seed, wave));
        let credits = rewards
            .wave_bonus_base
            .saturating_add(rewards.wave_bonus_per_wave.saturating_mul(wave.get()));
        let mut amount = Resources::credits(credits);
        for kind in [
            ResourceKind::Power,
            ResourceKind::Bandwidth,
            ResourceKind::Processing,
        ] {
            let regen =
                rng.gen_range(rewards.regen_min..=rewards.regen_max.max(rewards.regen_min));
            amount = amount.saturating_add(&Resources::single(kind, regen));
        }

        let _ = self.apply(Command::GrantResources { amount });
        info!("wave {} reward: {amount}", wave.get());

        self.phase = if wave.get() >= final_wave {
            info!("final wave {} cleared", wave.get());
            Phase::Victory
        } else {
            Phase::Build
        };
        Some(amount)
    }

    /// Fights the running wave to its end and applies its reward.
    ///
    /// Returns `None` when no wave is running.
    pub fn run_wave(&mut self) -> Option<WaveReport> {
        if self.phase != Phase::Combat {
            return None;
        }

        let wave = query::wave(&self.world);
        let mut destroyed = 0u32;
        let mut breaches = 0u32;
        while self.phase == Phase::Combat {
            for event in self.tick() {
                match event {
                    Event::EnemyDestroyed { .. } => destroyed += 1,
                    Event::CoreBreached { .. } => breaches += 1,
                    _ => {}
                }
            }
        }
        let ticks = query::tick(&self.world);

        let (outcome, reward) = match self.phase {
            Phase::Defeat => (WaveOutcome::GameOver, None),
            Phase::Quit => (WaveOutcome::Quit, None),
            _ => (WaveOutcome::Cleared, self.collect_reward()),
        };

        Some(WaveReport {
            wave,
            outcome,
            ticks,
            destroyed,
            breaches,
            core_hp: query::core_hp(&self.world),
            reward,
        })
    }

    fn handle(&mut self, command: PlayerCommand) -> Response {
        match (self.interaction, command) {
            (_, PlayerCommand::Quit) => {
                info!("session quit at wave {}", query::wave(&self.world).get());
                self.phase = Phase::Quit;
                Response::Quit
            }
            (Interaction::Building, PlayerCommand::Build { kind, column, row }) => {
                self.build(command, kind, TileCoord::new(column, row))
            }
            (Interaction::Building, PlayerCommand::Upgrade { column, row }) => {
                self.upgrade(command, TileCoord::new(column, row))
            }
            (Interaction::Building, PlayerCommand::Info { column, row }) => {
                let at = TileCoord::new(column, row);
                if query::map(&self.world).tile_at(at).is_none() {
                    return rejected(command, ResultTag::InvalidPosition);
                }
                Response::Info {
                    tower: query::tower_at(&self.world, at),
                }
            }
            (Interaction::Building, PlayerCommand::Trade) => {
                self.interaction = Interaction::Trading { talking: None };
                Response::TradeOpened {
                    factions: query::factions(&self.world),
                }
            }
            (Interaction::Building, PlayerCommand::Start) => self.start_wave(),
            (Interaction::Trading { .. }, PlayerCommand::Talk { faction }) => {
                self.talk(command, faction)
            }
            (Interaction::Trading { talking: Some(faction) }, PlayerCommand::Accept { offer }) => {
                self.accept(command, faction, offer)
            }
            (Interaction::Trading { .. }, PlayerCommand::Back) => {
                self.interaction = Interaction::Building;
                Response::TradeClosed
            }
            _ => rejected(command, ResultTag::Unavailable),
        }
    }

    fn build(&mut self, command: PlayerCommand, kind: TowerKind, at: TileCoord) -> Response {
        match self.apply(Command::BuildTower { kind, at }) {
            Some(Event::TowerBuilt { tower, kind, at }) => Response::Built { tower, kind, at },
            Some(Event::TowerBuildRejected { reason, .. }) => rejected(command, reason.into()),
            _ => rejected(command, ResultTag::Unavailable),
        }
    }

    fn upgrade(&mut self, command: PlayerCommand, at: TileCoord) -> Response {
        match self.apply(Command::UpgradeTower { at }) {
            Some(Event::TowerUpgraded { tower, level }) => Response::Upgraded { tower, level },
            Some(Event::TowerUpgradeRejected { reason, .. }) => rejected(command, reason.into()),
            _ => rejected(command, ResultTag::Unavailable),
        }
    }

    fn talk(&mut self, command: PlayerCommand, faction: FactionId) -> Response {
        let Some(snapshot) = query::faction(&self.world, faction) else {
            return rejected(command, ResultTag::InvalidIndex);
        };
        // Accept addresses the faction last talked to, even one that refused.
        self.interaction = Interaction::Trading {
            talking: Some(faction),
        };

        let mut commands = Vec::new();
        let wave = query::wave(&self.world);
        if let Err(error) = self.diplomacy.talk(&snapshot, wave, &mut commands) {
            return rejected(command, error.into());
        }
        for published in commands {
            let _ = self.apply(published);
        }

        Response::Offers {
            faction,
            offers: query::faction(&self.world, faction)
                .map(|snapshot| snapshot.offers)
                .unwrap_or_default(),
        }
    }

    fn accept(&mut self, command: PlayerCommand, faction: FactionId, offer: usize) -> Response {
        match self.apply(Command::AcceptTrade { faction, offer }) {
            Some(Event::TradeCompleted {
                faction,
                offer,
                reputation,
            }) => Response::Traded {
                faction,
                offer,
                reputation,
            },
            Some(Event::TradeRejected { reason, .. }) => rejected(command, reason.into()),
            _ => rejected(command, ResultTag::Unavailable),
        }
    }

    fn start_wave(&mut self) -> Response {
        let wave = query::wave(&self.world).next();
        let schedule = self.waves.start_wave(wave, &query::factions(&self.world));
        let enemies = schedule.len();

        let _ = self.apply(Command::BeginWave { wave });
        self.resolver.begin(schedule);
        self.quit_requested = false;
        self.phase = Phase::Combat;
        info!("wave {} started with {enemies} enemies", wave.get());
        Response::WaveStarted { wave, enemies }
    }

    /// Applies a single command, returning the last event it produced.
    fn apply(&mut self, command: Command) -> Option<Event> {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);
        self.events.pop()
    }
}

fn rejected(command: PlayerCommand, tag: ResultTag) -> Response {
    Response::Rejected { command, tag }
}

fn derive_reward_seed(global_seed: u64, wave: WaveNumber) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.get().to_le_bytes());
    hasher.update(b"reward");
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}
