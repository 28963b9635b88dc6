//! Faction reputation and offer bookkeeping.

use std::collections::BTreeMap;

use node_defense_core::{DiplomacyConfig, FactionId, FactionSnapshot, TradeOffer};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct FactionState {
    reputation: i32,
    offers: Vec<TradeOffer>,
}

/// Registry of every faction's reputation and current offer set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FactionRegistry {
    entries: BTreeMap<FactionId, FactionState>,
}

impl FactionRegistry {
    /// Seeds the roster with starting reputations clamped to the configured bounds.
    pub(crate) fn new(config: &DiplomacyConfig) -> Self {
        let entries = FactionId::ALL
            .into_iter()
            .map(|id| {
                let reputation = config.clamp_reputation(i64::from(id.starting_reputation()));
                (
                    id,
                    FactionState {
                        reputation,
                        offers: Vec::new(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn snapshot(&self, id: FactionId) -> Option<FactionSnapshot> {
        self.entries.get(&id).map(|state| FactionSnapshot {
            id,
            disposition: id.disposition(),
            reputation: state.reputation,
            offers: state.offers.clone(),
        })
    }

    /// Snapshots every faction in roster order.
    pub(crate) fn snapshots(&self) -> Vec<FactionSnapshot> {
        self.entries
            .keys()
            .filter_map(|id| self.snapshot(*id))
            .collect()
    }

    pub(crate) fn offer(&self, id: FactionId, index: usize) -> Option<&TradeOffer> {
        self.entries
            .get(&id)
            .and_then(|state| state.offers.get(index))
    }

    pub(crate) fn set_offers(&mut self, id: FactionId, offers: Vec<TradeOffer>) {
        if let Some(state) = self.entries.get_mut(&id) {
            state.offers = offers;
        }
    }

    /// Shifts reputation by `delta`, clamped to the configured bounds.
    pub(crate) fn adjust_reputation(
        &mut self,
        id: FactionId,
        delta: i32,
        config: &DiplomacyConfig,
    ) -> i32 {
        match self.entries.get_mut(&id) {
            Some(state) => {
                state.reputation =
                    config.clamp_reputation(i64::from(state.reputation) + i64::from(delta));
                state.reputation
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roster_starts_with_default_reputations() {
        let registry = FactionRegistry::new(&DiplomacyConfig::default());
        let reputations: Vec<i32> = registry
            .snapshots()
            .into_iter()
            .map(|snapshot| snapshot.reputation)
            .collect();
        assert_eq!(reputations, vec![20, 0, 30, -80, -40]);
    }

    #[test]
    fn narrow_bounds_clamp_starting_reputation() {
        let config = DiplomacyConfig {
            reputation_min: -50,
            reputation_max: 25,
            ..DiplomacyConfig::default()
        };
        let registry = FactionRegistry::new(&config);
        assert_eq!(
            registry.snapshot(FactionId::RogueSwarm).map(|s| s.reputation),
            Some(-50)
        );
        assert_eq!(
            registry.snapshot(FactionId::DarknetCommune).map(|s| s.reputation),
            Some(25)
        );
    }

    proptest! {
        #[test]
        fn reputation_stays_within_bounds(deltas in proptest::collection::vec(-40i32..40, 0..300)) {
            let config = DiplomacyConfig::default();
            let mut registry = FactionRegistry::new(&config);
            for delta in deltas {
                let reputation =
                    registry.adjust_reputation(FactionId::DarknetCommune, delta, &config);
                prop_assert!((config.reputation_min..=config.reputation_max).contains(&reputation));
            }
        }
    }
}
