use std::fmt;

use serde::{Deserialize, Serialize};

use super::profile::{CandyType, Character, PersistentProfile, UpgradeId, MAX_BUYERS};

pub const BICYCLE_SPEED: f32 = 600.0;
pub const FORFEIT_PERCENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    InvalidQuantity,
    InsufficientFunds,
    InsufficientCandy,
    OverCapacity,
    AlreadyOwned,
    NoBuyers,
    NothingToPay,
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeclineReason::InvalidQuantity => "invalid quantity",
            DeclineReason::InsufficientFunds => "not enough money",
            DeclineReason::InsufficientCandy => "not enough candy",
            DeclineReason::OverCapacity => "backpack full",
            DeclineReason::AlreadyOwned => "already owned",
            DeclineReason::NoBuyers => "no buyers",
            DeclineReason::NothingToPay => "no candy to pay with",
        };
        f.write_str(text)
    }
}

/// Result of a check-then-apply economy action. A declined action leaves
/// the profile untouched; it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum TradeOutcome {
    Completed,
    Declined(DeclineReason),
}

impl TradeOutcome {
    pub fn is_completed(self) -> bool {
        self == TradeOutcome::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpgradeOffer {
    #[serde(rename = "id")]
    pub upgrade: UpgradeId,
    pub cost: u32,
    #[serde(default)]
    pub bonus: Option<(CandyType, u32)>,
}

impl PersistentProfile {
    pub fn sell(&mut self, candy: CandyType, unit_price: u32, quantity: u32) -> TradeOutcome {
        if quantity == 0 {
            return TradeOutcome::Declined(DeclineReason::InvalidQuantity);
        }
        if self.buyer_count == 0 {
            return TradeOutcome::Declined(DeclineReason::NoBuyers);
        }
        if self.candy(candy) < quantity {
            return TradeOutcome::Declined(DeclineReason::InsufficientCandy);
        }

        self.debit_candy(candy, quantity);
        self.money = self.money.saturating_add(unit_price.saturating_mul(quantity));
        self.buyer_count -= 1;
        TradeOutcome::Completed
    }

    pub fn buy(&mut self, candy: CandyType, unit_price: u32, quantity: u32) -> TradeOutcome {
        if quantity == 0 {
            return TradeOutcome::Declined(DeclineReason::InvalidQuantity);
        }
        let Some(total_cost) = unit_price.checked_mul(quantity) else {
            return TradeOutcome::Declined(DeclineReason::InsufficientFunds);
        };
        if self.money < total_cost {
            return TradeOutcome::Declined(DeclineReason::InsufficientFunds);
        }
        if quantity > self.free_capacity() {
            return TradeOutcome::Declined(DeclineReason::OverCapacity);
        }

        self.money -= total_cost;
        self.credit_candy(candy, quantity);
        TradeOutcome::Completed
    }

    pub fn purchase_upgrade(&mut self, offer: &UpgradeOffer) -> TradeOutcome {
        if self.owns(offer.upgrade) {
            return TradeOutcome::Declined(DeclineReason::AlreadyOwned);
        }
        if self.money < offer.cost {
            return TradeOutcome::Declined(DeclineReason::InsufficientFunds);
        }

        self.money -= offer.cost;
        self.owned_upgrades.insert(offer.upgrade);
        if offer.upgrade == UpgradeId::Bicycle {
            self.speed_by_character
                .insert(Character::Secondary, BICYCLE_SPEED);
        }
        if let Some((candy, quantity)) = offer.bonus {
            self.grant_candy(candy, quantity);
        }
        TradeOutcome::Completed
    }

    /// Takes one unit of the first candy type with stock, in
    /// [`CandyType::ALL`] order.
    pub fn pay_toll(&mut self) -> Result<CandyType, DeclineReason> {
        let paid = CandyType::ALL
            .into_iter()
            .find(|candy| self.candy(*candy) > 0)
            .ok_or(DeclineReason::NothingToPay)?;
        self.debit_candy(paid, 1);
        Ok(paid)
    }

    pub fn purchase_goal(&mut self, cost: u32) -> TradeOutcome {
        if self.goal_reached {
            return TradeOutcome::Declined(DeclineReason::AlreadyOwned);
        }
        if self.money < cost {
            return TradeOutcome::Declined(DeclineReason::InsufficientFunds);
        }

        self.money -= cost;
        self.goal_reached = true;
        TradeOutcome::Completed
    }

    pub fn record_negotiation_win(&mut self) {
        self.buyer_count = self.buyer_count.saturating_add(1).min(MAX_BUYERS);
    }

    /// Removes `percent` of current money, rounded down, and returns the amount taken.
    pub fn forfeit_share(&mut self, percent: u32) -> u32 {
        let taken = (u64::from(self.money) * u64::from(percent.min(100)) / 100) as u32;
        self.money -= taken;
        taken
    }

    pub fn credit_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn grant_candy(&mut self, candy: CandyType, quantity: u32) -> u32 {
        let granted = quantity.min(self.free_capacity());
        self.credit_candy(candy, granted);
        granted
    }

    pub fn set_carry_over(&mut self, seconds: f32) {
        self.carry_over_seconds = Some(seconds.max(0.0));
    }

    pub fn take_carry_over(&mut self) -> Option<f32> {
        self.carry_over_seconds.take()
    }

    pub fn reset_to_defaults(&mut self) {
        *self = PersistentProfile::default();
    }

    fn credit_candy(&mut self, candy: CandyType, quantity: u32) {
        let count = self.candy.count_mut(candy);
        *count = count.saturating_add(quantity);
    }

    fn debit_candy(&mut self, candy: CandyType, quantity: u32) {
        let count = self.candy.count_mut(candy);
        *count = count.saturating_sub(quantity);
    }
}
