//! Named resource quantities used for the pool, costs, and rewards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names of the resources tracked by the economy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// General currency used for construction.
    Credits,
    /// Electrical capacity.
    Power,
    /// Network throughput.
    Bandwidth,
    /// Compute capacity.
    Processing,
}

impl ResourceKind {
    /// Every resource kind in display order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Credits,
        ResourceKind::Power,
        ResourceKind::Bandwidth,
        ResourceKind::Processing,
    ];

    /// Lowercase display name of the resource.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Credits => "credits",
            Self::Power => "power",
            Self::Bandwidth => "bandwidth",
            Self::Processing => "processing",
        }
    }
}

/// Non-negative quantities of every named resource.
///
/// The same type describes the player's pool, the cost of an action, and the
/// amount credited by a reward or trade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    /// General currency used for construction.
    pub credits: u32,
    /// Electrical capacity.
    pub power: u32,
    /// Network throughput.
    pub bandwidth: u32,
    /// Compute capacity.
    pub processing: u32,
}

impl Resources {
    /// Resource map with every quantity at zero.
    pub const ZERO: Resources = Resources::new(0, 0, 0, 0);

    /// Creates a resource map from explicit quantities.
    #[must_use]
    pub const fn new(credits: u32, power: u32, bandwidth: u32, processing: u32) -> Self {
        Self {
            credits,
            power,
            bandwidth,
            processing,
        }
    }

    /// Creates a resource map holding only the provided credits.
    #[must_use]
    pub const fn credits(credits: u32) -> Self {
        Self::new(credits, 0, 0, 0)
    }

    /// Creates a resource map holding a single resource.
    #[must_use]
    pub const fn single(kind: ResourceKind, amount: u32) -> Self {
        match kind {
            ResourceKind::Credits => Self::new(amount, 0, 0, 0),
            ResourceKind::Power => Self::new(0, amount, 0, 0),
            ResourceKind::Bandwidth => Self::new(0, 0, amount, 0),
            ResourceKind::Processing => Self::new(0, 0, 0, amount),
        }
    }

    /// Quantity of the provided resource.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Credits => self.credits,
            ResourceKind::Power => self.power,
            ResourceKind::Bandwidth => self.bandwidth,
            ResourceKind::Processing => self.processing,
        }
    }

    /// Reports whether every quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.credits == 0 && self.power == 0 && self.bandwidth == 0 && self.processing == 0
    }

    /// Reports whether this map holds at least `cost` of every resource.
    #[must_use]
    pub const fn covers(&self, cost: &Resources) -> bool {
        self.credits >= cost.credits
            && self.power >= cost.power
            && self.bandwidth >= cost.bandwidth
            && self.processing >= cost.processing
    }

    /// Subtracts `cost` from every resource, or returns `None` if any would go negative.
    #[must_use]
    pub fn checked_sub(&self, cost: &Resources) -> Option<Resources> {
        Some(Resources {
            credits: self.credits.checked_sub(cost.credits)?,
            power: self.power.checked_sub(cost.power)?,
            bandwidth: self.bandwidth.checked_sub(cost.bandwidth)?,
            processing: self.processing.checked_sub(cost.processing)?,
        })
    }

    /// Adds `amount` to every resource, saturating at the numeric maximum.
    #[must_use]
    pub const fn saturating_add(&self, amount: &Resources) -> Resources {
        Resources {
            credits: self.credits.saturating_add(amount.credits),
            power: self.power.saturating_add(amount.power),
            bandwidth: self.bandwidth.saturating_add(amount.bandwidth),
            processing: self.processing.saturating_add(amount.processing),
        }
    }

    /// Scales every quantity by `percent / 100`, rounding down.
    #[must_use]
    pub fn scaled_percent(&self, percent: u32) -> Resources {
        let scale = |value: u32| -> u32 {
            let scaled = u64::from(value) * u64::from(percent) / 100;
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        Resources {
            credits: scale(self.credits),
            power: scale(self.power),
            bandwidth: scale(self.bandwidth),
            processing: scale(self.processing),
        }
    }

    /// Iterates the non-zero quantities in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, amount)| *amount > 0)
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "nothing");
        }

        let mut first = true;
        for (kind, amount) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{amount} {}", kind.name())?;
            first = false;
        }
        Ok(())
    }
}
