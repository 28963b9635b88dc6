//! Resource pool owned by the world.

use node_defense_core::Resources;
use serde::{Deserialize, Serialize};

/// Ledger that guards the shared resource pool.
///
/// Deductions are all-or-nothing: a cost is either covered in full and
/// deducted, or the pool is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EconomyLedger {
    balance: Resources,
}

impl EconomyLedger {
    pub(crate) const fn new(balance: Resources) -> Self {
        Self { balance }
    }

    pub(crate) const fn balance(&self) -> Resources {
        self.balance
    }

    pub(crate) fn can_afford(&self, cost: &Resources) -> bool {
        self.balance.covers(cost)
    }

    /// Deducts the cost when the pool covers it, reporting success.
    pub(crate) fn spend(&mut self, cost: &Resources) -> bool {
        match self.balance.checked_sub(cost) {
            Some(remaining) => {
                self.balance = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn earn(&mut self, amount: &Resources) {
        self.balance = self.balance.saturating_add(amount);
    }
}
