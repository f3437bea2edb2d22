use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub const BASE_CAPACITY: u32 = 50;
pub const BIGGER_PACK_CAPACITY: u32 = 200;
pub const DEFAULT_SPEED: f32 = 400.0;
pub const STARTING_COMMON_CANDY: u32 = 15;
pub const MAX_BUYERS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandyType {
    Common,
    Uncommon,
    Rare,
}

impl CandyType {
    /// Also the toll priority order.
    pub const ALL: [CandyType; 3] = [CandyType::Common, CandyType::Uncommon, CandyType::Rare];

    pub const fn display_name(self) -> &'static str {
        match self {
            CandyType::Common => "Twizzlers",
            CandyType::Uncommon => "Skizzles",
            CandyType::Rare => "Woozers",
        }
    }
}

impl fmt::Display for CandyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Character {
    Primary,
    Secondary,
}

impl Character {
    pub const fn display_name(self) -> &'static str {
        match self {
            Character::Primary => "Andrew",
            Character::Secondary => "Mark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    Bicycle,
    BulkMembership,
    VendingMachine,
    BiggerPack,
}

impl UpgradeId {
    pub const fn display_name(self) -> &'static str {
        match self {
            UpgradeId::Bicycle => "Bicycle",
            UpgradeId::BulkMembership => "Costco Membership",
            UpgradeId::VendingMachine => "Candy Machine",
            UpgradeId::BiggerPack => "Bigger Backpack",
        }
    }
}

/// Per-type candy stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandyCounts {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
}

impl CandyCounts {
    pub fn get(&self, candy: CandyType) -> u32 {
        match candy {
            CandyType::Common => self.common,
            CandyType::Uncommon => self.uncommon,
            CandyType::Rare => self.rare,
        }
    }

    pub(super) fn count_mut(&mut self, candy: CandyType) -> &mut u32 {
        match candy {
            CandyType::Common => &mut self.common,
            CandyType::Uncommon => &mut self.uncommon,
            CandyType::Rare => &mut self.rare,
        }
    }

    pub fn total(&self) -> u32 {
        CandyType::ALL
            .iter()
            .map(|candy| self.get(*candy))
            .fold(0u32, u32::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fullscreen: bool,
    pub audio: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fullscreen: false,
            audio: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistentProfile {
    pub(super) money: u32,
    pub(super) candy: CandyCounts,
    pub(super) buyer_count: u32,
    pub(super) speed_by_character: BTreeMap<Character, f32>,
    pub(super) owned_upgrades: BTreeSet<UpgradeId>,
    pub(super) carry_over_seconds: Option<f32>,
    pub(super) goal_reached: bool,
    pub(super) settings: Settings,
}

impl Default for PersistentProfile {
    fn default() -> Self {
        let candy = CandyCounts {
            common: STARTING_COMMON_CANDY,
            ..CandyCounts::default()
        };
        let speed_by_character = [
            (Character::Primary, DEFAULT_SPEED),
            (Character::Secondary, DEFAULT_SPEED),
        ]
        .into_iter()
        .collect();

        Self {
            money: 0,
            candy,
            buyer_count: 0,
            speed_by_character,
            owned_upgrades: BTreeSet::new(),
            carry_over_seconds: None,
            goal_reached: false,
            settings: Settings::default(),
        }
    }
}

impl PersistentProfile {
    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn candy(&self, candy: CandyType) -> u32 {
        self.candy.get(candy)
    }

    pub fn total_candy(&self) -> u32 {
        self.candy.total()
    }

    pub fn capacity(&self) -> u32 {
        if self.owns(UpgradeId::BiggerPack) {
            BIGGER_PACK_CAPACITY
        } else {
            BASE_CAPACITY
        }
    }

    pub fn free_capacity(&self) -> u32 {
        self.capacity().saturating_sub(self.total_candy())
    }

    pub fn buyer_count(&self) -> u32 {
        self.buyer_count
    }

    pub fn speed(&self, character: Character) -> f32 {
        self.speed_by_character
            .get(&character)
            .copied()
            .unwrap_or(DEFAULT_SPEED)
    }

    pub fn owns(&self, upgrade: UpgradeId) -> bool {
        self.owned_upgrades.contains(&upgrade)
    }

    pub fn owned_upgrades(&self) -> impl Iterator<Item = UpgradeId> + '_ {
        self.owned_upgrades.iter().copied()
    }

    pub fn carry_over_seconds(&self) -> Option<f32> {
        self.carry_over_seconds
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn candy_counts(&self) -> [(CandyType, u32); 3] {
        CandyType::ALL.map(|candy| (candy, self.candy(candy)))
    }
}
