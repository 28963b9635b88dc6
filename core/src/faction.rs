//! Faction roster, dispositions, and trade offer contracts.

use serde::{Deserialize, Serialize};

use crate::Resources;

/// Fixed stance of a faction towards the player's node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Attacks the node and refuses to trade.
    Hostile,
    /// Trades at fixed prices regardless of reputation.
    Neutral,
    /// Trades at prices that improve with reputation.
    Friendly,
}

impl Disposition {
    /// Reports whether factions with this disposition trade at all.
    #[must_use]
    pub const fn trades(self) -> bool {
        !matches!(self, Self::Hostile)
    }
}

/// Factions inhabiting the fragmented network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionId {
    /// Knowledge-obsessed traders of data.
    ArchivistCollective,
    /// Profit-driven, expensive but reliable.
    RedMarketSyndicate,
    /// Idealistic, generous to allies.
    DarknetCommune,
    /// Hostile hivemind.
    RogueSwarm,
    /// Old-world corporations seeking control.
    CorporateRemnant,
}

impl FactionId {
    /// Every faction in roster order.
    pub const ALL: [FactionId; 5] = [
        FactionId::ArchivistCollective,
        FactionId::RedMarketSyndicate,
        FactionId::DarknetCommune,
        FactionId::RogueSwarm,
        FactionId::CorporateRemnant,
    ];

    /// Display name of the faction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ArchivistCollective => "Archivist Collective",
            Self::RedMarketSyndicate => "Red Market Syndicate",
            Self::DarknetCommune => "Darknet Commune",
            Self::RogueSwarm => "Rogue Swarm",
            Self::CorporateRemnant => "Corporate Remnant",
        }
    }

    /// Fixed disposition of the faction.
    #[must_use]
    pub const fn disposition(self) -> Disposition {
        match self {
            Self::ArchivistCollective | Self::RedMarketSyndicate => Disposition::Neutral,
            Self::DarknetCommune => Disposition::Friendly,
            Self::RogueSwarm | Self::CorporateRemnant => Disposition::Hostile,
        }
    }

    /// Reputation the faction holds towards the player when a session starts.
    #[must_use]
    pub const fn starting_reputation(self) -> i32 {
        match self {
            Self::ArchivistCollective => 20,
            Self::RedMarketSyndicate => 0,
            Self::DarknetCommune => 30,
            Self::RogueSwarm => -80,
            Self::CorporateRemnant => -40,
        }
    }
}

/// Exchange proposed by a faction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Resources the player hands over.
    pub give: Resources,
    /// Resources the player receives.
    pub receive: Resources,
    /// Short description shown to the player.
    pub description: String,
}

/// Immutable representation of a faction's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionSnapshot {
    /// Identifier of the faction.
    pub id: FactionId,
    /// Fixed disposition of the faction.
    pub disposition: Disposition,
    /// Current reputation.
    pub reputation: i32,
    /// Offers currently on the table.
    pub offers: Vec<TradeOffer>,
}
