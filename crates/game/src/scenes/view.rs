use sugar_engine::{Rect, SceneId, Vec2};

use crate::economy::{CandyType, Character, PersistentProfile, UpgradeId};
use crate::minigame::MinigameView;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub scene: SceneId,
    pub title: String,
    pub background: Option<String>,
    pub character: Option<Character>,
    pub remaining_seconds: Option<f32>,
    pub player: Option<Vec2>,
    pub obstacles: Vec<Rect>,
    pub inventory_open: bool,
    pub economy: EconomyView,
    pub hints: Vec<String>,
    pub minigames: Vec<MinigameView>,
    pub npcs: Vec<Vec2>,
    pub bullies: Vec<Vec2>,
    pub buyers: Vec<Vec2>,
    pub panel: Option<PanelView>,
    pub menu: Vec<String>,
    pub notice: Option<String>,
}

impl FrameView {
    pub fn new(scene: SceneId, title: impl Into<String>, profile: &PersistentProfile) -> Self {
        Self {
            scene,
            title: title.into(),
            background: None,
            character: None,
            remaining_seconds: None,
            player: None,
            obstacles: Vec::new(),
            inventory_open: false,
            economy: EconomyView::from_profile(profile),
            hints: Vec::new(),
            minigames: Vec::new(),
            npcs: Vec::new(),
            bullies: Vec::new(),
            buyers: Vec::new(),
            panel: None,
            menu: Vec::new(),
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EconomyView {
    pub money: u32,
    pub candy: [(CandyType, u32); 3],
    pub buyers: u32,
    pub capacity: u32,
    pub upgrades: Vec<UpgradeId>,
    pub goal_reached: bool,
}

impl EconomyView {
    pub fn from_profile(profile: &PersistentProfile) -> Self {
        Self {
            money: profile.money(),
            candy: profile.candy_counts(),
            buyers: profile.buyer_count(),
            capacity: profile.capacity(),
            upgrades: profile.owned_upgrades().collect(),
            goal_reached: profile.goal_reached(),
        }
    }

    pub fn total_candy(&self) -> u32 {
        self.candy.iter().map(|(_, count)| count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub lines: Vec<String>,
    pub quantity: Option<u32>,
}
