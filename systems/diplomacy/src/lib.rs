#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Faction trade offer generation.
//!
//! Every trading faction owns a small table of offer templates. A single
//! generator turns templates into concrete offers: the faction's disposition
//! decides whether it trades at all and how reputation shapes the price,
//! while the received quantities are rolled from a stream derived from the
//! session seed, the faction, and the wave.

use log::debug;
use node_defense_core::{
    Command, DiplomacyConfig, Disposition, FactionId, FactionSnapshot, ResourceKind, Resources,
    TradeError, TradeOffer, WaveNumber,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

struct OfferTemplate {
    give: Resources,
    receive: &'static [(ResourceKind, u32, u32)],
    description: &'static str,
}

static ARCHIVIST_OFFERS: [OfferTemplate; 2] = [
    OfferTemplate {
        give: Resources::credits(30),
        receive: &[(ResourceKind::Processing, 30, 50)],
        description: "Trade credits for processing power",
    },
    OfferTemplate {
        give: Resources::single(ResourceKind::Bandwidth, 30),
        receive: &[(ResourceKind::Credits, 30, 50)],
        description: "Trade bandwidth for credits",
    },
];

static RED_MARKET_OFFERS: [OfferTemplate; 2] = [
    OfferTemplate {
        give: Resources::credits(50),
        receive: &[(ResourceKind::Power, 50, 70)],
        description: "Buy power",
    },
    OfferTemplate {
        give: Resources::credits(80),
        receive: &[
            (ResourceKind::Processing, 40, 60),
            (ResourceKind::Bandwidth, 40, 60),
        ],
        description: "Buy resource package",
    },
];

static DARKNET_OFFERS: [OfferTemplate; 2] = [
    OfferTemplate {
        give: Resources::credits(20),
        receive: &[(ResourceKind::Power, 30, 50)],
        description: "Community trade - power",
    },
    OfferTemplate {
        give: Resources::credits(25),
        receive: &[(ResourceKind::Bandwidth, 40, 60)],
        description: "Community trade - bandwidth",
    },
];

fn templates(faction: FactionId) -> &'static [OfferTemplate] {
    match faction {
        FactionId::ArchivistCollective => &ARCHIVIST_OFFERS,
        FactionId::RedMarketSyndicate => &RED_MARKET_OFFERS,
        FactionId::DarknetCommune => &DARKNET_OFFERS,
        FactionId::RogueSwarm | FactionId::CorporateRemnant => &[],
    }
}

/// Pure system that prices and publishes faction trade offers.
#[derive(Clone, Debug)]
pub struct Diplomacy {
    global_seed: u64,
    config: DiplomacyConfig,
}

impl Diplomacy {
    /// Creates a diplomacy system bound to the session seed and pricing rules.
    #[must_use]
    pub fn new(global_seed: u64, config: &DiplomacyConfig) -> Self {
        Self {
            global_seed,
            config: config.clone(),
        }
    }

    /// Generates the offers a faction presents during the provided wave.
    ///
    /// Hostile factions refuse with [`TradeError::NoTradeAvailable`].
    /// Neutral factions ignore reputation, friendly ones discount the give
    /// side as reputation grows.
    pub fn list_offers(
        &self,
        faction: &FactionSnapshot,
        wave: WaveNumber,
    ) -> Result<Vec<TradeOffer>, TradeError> {
        let discount_percent = match faction.disposition {
            Disposition::Hostile => return Err(TradeError::NoTradeAvailable),
            Disposition::Neutral => 0,
            Disposition::Friendly => self.discount_percent(faction.reputation),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(derive_offer_seed(
            self.global_seed,
            faction.id,
            wave,
        ));
        let offers = templates(faction.id)
            .iter()
            .map(|template| {
                let receive = template
                    .receive
                    .iter()
                    .fold(Resources::ZERO, |total, (kind, low, high)| {
                        let amount = rng.gen_range(*low..=(*high).max(*low));
                        total.saturating_add(&Resources::single(*kind, amount))
                    });
                TradeOffer {
                    give: template.give.scaled_percent(100 - discount_percent),
                    receive,
                    description: template.description.to_owned(),
                }
            })
            .collect();
        Ok(offers)
    }

    /// Publishes the faction's current offers to the world, returning how
    /// many were published.
    pub fn talk(
        &self,
        faction: &FactionSnapshot,
        wave: WaveNumber,
        out: &mut Vec<Command>,
    ) -> Result<usize, TradeError> {
        let offers = self.list_offers(faction, wave)?;
        let count = offers.len();
        debug!("{} presents {count} offers", faction.id.name());
        out.push(Command::PublishOffers {
            faction: faction.id,
            offers,
        });
        Ok(count)
    }

    /// Give-side discount, in percent, granted at the provided reputation.
    #[must_use]
    pub fn discount_percent(&self, reputation: i32) -> u32 {
        let standing = reputation.max(0).unsigned_abs();
        (standing * self.config.max_discount_percent / 100).min(100)
    }
}

fn derive_offer_seed(global_seed: u64, faction: FactionId, wave: WaveNumber) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(faction.name().as_bytes());
    hasher.update(wave.get().to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: FactionId, reputation: i32) -> FactionSnapshot {
        FactionSnapshot {
            id,
            disposition: id.disposition(),
            reputation,
            offers: Vec::new(),
        }
    }

    fn diplomacy() -> Diplomacy {
        Diplomacy::new(17, &DiplomacyConfig::default())
    }

    #[test]
    fn hostile_factions_refuse() {
        let result =
            diplomacy().list_offers(&snapshot(FactionId::RogueSwarm, 100), WaveNumber::new(1));
        assert_eq!(result, Err(TradeError::NoTradeAvailable));
    }

    #[test]
    fn neutral_prices_ignore_reputation() {
        let diplomacy = diplomacy();
        let wave = WaveNumber::new(3);
        let cold = diplomacy
            .list_offers(&snapshot(FactionId::RedMarketSyndicate, -60), wave)
            .expect("offers");
        let warm = diplomacy
            .list_offers(&snapshot(FactionId::RedMarketSyndicate, 90), wave)
            .expect("offers");
        assert_eq!(cold, warm);
        assert_eq!(cold[0].give, Resources::credits(50));
    }

    #[test]
    fn friendly_prices_fall_with_reputation() {
        let diplomacy = diplomacy();
        let wave = WaveNumber::new(2);
        let base = diplomacy
            .list_offers(&snapshot(FactionId::DarknetCommune, 0), wave)
            .expect("offers");
        let allied = diplomacy
            .list_offers(&snapshot(FactionId::DarknetCommune, 100), wave)
            .expect("offers");

        assert_eq!(base[0].give, Resources::credits(20));
        assert_eq!(allied[0].give, Resources::credits(12));
        assert_eq!(base[0].receive, allied[0].receive);
        assert_eq!(diplomacy.discount_percent(30), 12);
        assert_eq!(diplomacy.discount_percent(-30), 0);
    }

    #[test]
    fn quantities_stay_within_template_ranges() {
        let diplomacy = diplomacy();
        for wave in 1..=30 {
            let offers = diplomacy
                .list_offers(&snapshot(FactionId::RedMarketSyndicate, 0), WaveNumber::new(wave))
                .expect("offers");
            let package = offers[1].receive;
            assert!((40..=60).contains(&package.processing));
            assert!((40..=60).contains(&package.bandwidth));
            assert_eq!(package.credits, 0);
        }
    }

    #[test]
    fn talk_publishes_offers() {
        let mut out = Vec::new();
        let count = diplomacy()
            .talk(
                &snapshot(FactionId::ArchivistCollective, 20),
                WaveNumber::new(1),
                &mut out,
            )
            .expect("talk");
        assert_eq!(count, 2);
        assert!(matches!(
            out.as_slice(),
            [Command::PublishOffers {
                faction: FactionId::ArchivistCollective,
                offers,
            }] if offers.len() == 2
        ));
    }
}
