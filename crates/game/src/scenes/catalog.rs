use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sugar_engine::{Rect, SceneId, Vec2};
use thiserror::Error;
use tracing::info;

use crate::economy::{CandyType, Character, UpgradeId, UpgradeOffer};
use crate::minigame::{DetectorConfig, DETECTION_PENALTY_SECONDS, NEGOTIATION_TIME_LIMIT_SECONDS};

use super::ids;

pub const CATALOG_OVERRIDE_FILE: &str = "scenes.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read scene catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{message}")]
    Parse { message: String },
    #[error("scene catalog '{path}' overrides unknown scene '{id}'")]
    UnknownEntry { path: PathBuf, id: SceneId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    pub title: String,
    pub background: String,
    pub character: Character,
    pub spawn: Vec2,
    /// Fixed duration, or the fallback when `use_carry_over` finds nothing.
    #[serde(default)]
    pub duration_seconds: Option<f32>,
    #[serde(default)]
    pub use_carry_over: bool,
    #[serde(default)]
    pub next: Option<SceneId>,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorConfig {
    Classroom(ClassroomConfig),
    Playground(PlaygroundConfig),
    Hallway(HallwayConfig),
    Street(StreetConfig),
    Shop(ShopConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassroomConfig {
    pub npcs: Vec<Vec2>,
    pub npc_radius: f32,
    #[serde(default = "default_negotiation_seconds")]
    pub negotiation_seconds: f32,
    pub detector: DetectorConfig,
    /// Common candy granted on entry to owners of the candy machine.
    pub vending_restock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaygroundConfig {
    pub sell_prices: PriceList,
    pub max_quantity: u32,
    pub buyer_radius: f32,
    pub buyer_area: Rect,
    pub bullies: BullyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BullyConfig {
    pub big_count: u32,
    pub big_speed: f32,
    pub small_count: u32,
    pub small_speed: f32,
    pub spawn_area: Rect,
    pub bounds: Rect,
    pub hit_radius: f32,
    pub forfeit_percent: u32,
    pub penalty_seconds: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HallwayConfig {
    pub monitor: Vec2,
    pub monitor_radius: f32,
    pub gate: Rect,
    pub shop: Vec2,
    pub shop_radius: f32,
    pub upgrades: Vec<UpgradeOffer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreetConfig {
    pub success: SceneId,
    #[serde(default)]
    pub upgrade_route: Option<UpgradeRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpgradeRoute {
    pub upgrade: UpgradeId,
    pub target: SceneId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopConfig {
    pub counters: Vec<Vec2>,
    pub counter_radius: f32,
    pub prices: PriceList,
    pub max_quantity: u32,
    #[serde(default)]
    pub machine: Option<MachineConfig>,
    #[serde(default)]
    pub goal: Option<GoalConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    pub position: Vec2,
    pub radius: f32,
    pub offer: UpgradeOffer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalConfig {
    pub name: String,
    pub position: Vec2,
    pub radius: f32,
    pub cost: u32,
    pub next: SceneId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceList {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
}

impl PriceList {
    pub const fn new(common: u32, uncommon: u32, rare: u32) -> Self {
        Self {
            common,
            uncommon,
            rare,
        }
    }

    pub fn price(&self, candy: CandyType) -> u32 {
        match candy {
            CandyType::Common => self.common,
            CandyType::Uncommon => self.uncommon,
            CandyType::Rare => self.rare,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneCatalog {
    scenes: BTreeMap<SceneId, SceneConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogOverrides {
    scenes: BTreeMap<SceneId, SceneConfig>,
}

impl SceneCatalog {
    pub fn builtin() -> Self {
        let scenes = [
            (ids::CLASSROOM, classroom()),
            (ids::PLAYGROUND, playground()),
            (ids::HALLWAY, hallway()),
            (ids::STREET, street()),
            (ids::STORE, store()),
            (ids::COSTCO, costco()),
        ]
        .into_iter()
        .map(|(id, config)| (SceneId::from(id), config))
        .collect();
        Self { scenes }
    }

    pub fn load(config_dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        let path = config_dir.join(CATALOG_OVERRIDE_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(catalog),
            Err(source) => return Err(CatalogError::Read { path, source }),
        };
        let replaced = catalog.apply_overrides(&raw, &path)?;
        info!(path = %path.display(), replaced, "scene_catalog_overrides_applied");
        Ok(catalog)
    }

    pub fn apply_overrides(&mut self, raw: &str, path: &Path) -> Result<usize, CatalogError> {
        let overrides = parse_overrides(raw, path)?;
        if let Some(id) = overrides
            .scenes
            .keys()
            .find(|id| !self.scenes.contains_key(*id))
        {
            return Err(CatalogError::UnknownEntry {
                path: path.to_path_buf(),
                id: id.clone(),
            });
        }
        let replaced = overrides.scenes.len();
        self.scenes.extend(overrides.scenes);
        Ok(replaced)
    }

    pub fn get(&self, id: &SceneId) -> Option<&SceneConfig> {
        self.scenes.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SceneId, &SceneConfig)> {
        self.scenes.iter()
    }
}

fn parse_overrides(raw: &str, path: &Path) -> Result<CatalogOverrides, CatalogError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        let source = error.into_inner();
        CatalogError::Parse {
            message: format!(
                "parse scene catalog '{}' at {json_path}: {source}",
                path.display()
            ),
        }
    })
}

fn default_negotiation_seconds() -> f32 {
    NEGOTIATION_TIME_LIMIT_SECONDS
}

const SCREEN_BOUNDS: [Rect; 4] = [
    Rect::new(-1.0, 0.0, 1.0, 720.0),
    Rect::new(0.0, -1.0, 1280.0, 1.0),
    Rect::new(1280.0, 0.0, 1.0, 720.0),
    Rect::new(0.0, 720.0, 1280.0, 1.0),
];

fn rects(list: &[(f32, f32, f32, f32)]) -> Vec<Rect> {
    list.iter().map(|&(x, y, w, h)| Rect::new(x, y, w, h)).collect()
}

fn with_bounds(mut obstacles: Vec<Rect>) -> Vec<Rect> {
    obstacles.extend(SCREEN_BOUNDS);
    obstacles
}

fn classroom() -> SceneConfig {
    SceneConfig {
        title: "Classroom".to_string(),
        background: "classroom".to_string(),
        character: Character::Primary,
        spawn: Vec2::new(600.0, 400.0),
        duration_seconds: Some(120.0),
        use_carry_over: false,
        next: Some(SceneId::from(ids::PLAYGROUND)),
        obstacles: with_bounds(rects(&[
            (0.0, 0.0, 1280.0, 196.0),
            (0.0, 577.0, 1280.0, 143.0),
            (0.0, 196.0, 11.0, 20.0),
            (13.0, 338.0, 113.0, 71.0),
            (315.0, 338.0, 61.0, 71.0),
            (210.0, 160.0, 235.0, 58.0),
            (712.0, 263.0, 44.0, 100.0),
            (873.0, 263.0, 44.0, 100.0),
            (712.0, 406.0, 44.0, 100.0),
            (873.0, 406.0, 44.0, 100.0),
            (1033.0, 275.0, 87.0, 217.0),
        ])),
        behavior: BehaviorConfig::Classroom(ClassroomConfig {
            npcs: vec![
                Vec2::new(280.0, 220.0),
                Vec2::new(680.0, 290.0),
                Vec2::new(840.0, 290.0),
                Vec2::new(680.0, 440.0),
                Vec2::new(840.0, 440.0),
                Vec2::new(70.0, 373.0),
            ],
            npc_radius: 50.0,
            negotiation_seconds: NEGOTIATION_TIME_LIMIT_SECONDS,
            detector: DetectorConfig {
                start: Vec2::new(300.0, 300.0),
                speed: Vec2::new(70.0, 45.0),
                bounds: Rect::new(250.0, 250.0, 700.0, 200.0),
                radius: 100.0,
                hold_position: Vec2::new(50.0, 500.0),
                hold_seconds: 5.0,
                release_position: Vec2::new(600.0, 400.0),
                immunity_seconds: 1.0,
                penalty_seconds: DETECTION_PENALTY_SECONDS,
            },
            vending_restock: 10,
        }),
    }
}

fn playground() -> SceneConfig {
    SceneConfig {
        title: "Playground".to_string(),
        background: "playground".to_string(),
        character: Character::Primary,
        spawn: Vec2::new(640.0, 360.0),
        duration_seconds: Some(120.0),
        use_carry_over: false,
        next: Some(SceneId::from(ids::HALLWAY)),
        obstacles: rects(&[
            (0.0, 0.0, 10.0, 720.0),
            (1270.0, 0.0, 10.0, 720.0),
            (0.0, 0.0, 1280.0, 260.0),
            (0.0, 630.0, 1280.0, 70.0),
            (40.0, 250.0, 180.0, 80.0),
            (270.0, 250.0, 220.0, 80.0),
            (570.0, 250.0, 120.0, 70.0),
            (800.0, 250.0, 380.0, 75.0),
        ]),
        behavior: BehaviorConfig::Playground(PlaygroundConfig {
            sell_prices: PriceList::new(2, 9, 40),
            max_quantity: 5,
            buyer_radius: 60.0,
            buyer_area: Rect::new(100.0, 300.0, 1080.0, 320.0),
            bullies: BullyConfig {
                big_count: 4,
                big_speed: 50.0,
                small_count: 4,
                small_speed: 60.0,
                spawn_area: Rect::new(50.0, 500.0, 1180.0, 50.0),
                bounds: Rect::new(50.0, 300.0, 1180.0, 300.0),
                hit_radius: 40.0,
                forfeit_percent: 10,
                penalty_seconds: 30.0,
            },
        }),
    }
}

fn hallway() -> SceneConfig {
    SceneConfig {
        title: "Hallway".to_string(),
        background: "hallway".to_string(),
        character: Character::Primary,
        spawn: Vec2::new(200.0, 360.0),
        duration_seconds: Some(120.0),
        use_carry_over: false,
        next: Some(SceneId::from(ids::BROTHER_B_TRANSITION)),
        obstacles: with_bounds(rects(&[
            (0.0, 0.0, 395.0, 320.0),
            (636.0, 0.0, 644.0, 320.0),
        ])),
        behavior: BehaviorConfig::Hallway(HallwayConfig {
            monitor: Vec2::new(500.0, 360.0),
            monitor_radius: 60.0,
            gate: Rect::new(530.0, 0.0, 100.0, 720.0),
            shop: Vec2::new(1100.0, 360.0),
            shop_radius: 60.0,
            upgrades: vec![
                UpgradeOffer {
                    upgrade: UpgradeId::Bicycle,
                    cost: 50,
                    bonus: None,
                },
                UpgradeOffer {
                    upgrade: UpgradeId::BulkMembership,
                    cost: 100,
                    bonus: None,
                },
                UpgradeOffer {
                    upgrade: UpgradeId::VendingMachine,
                    cost: 200,
                    bonus: None,
                },
                UpgradeOffer {
                    upgrade: UpgradeId::BiggerPack,
                    cost: 75,
                    bonus: None,
                },
            ],
        }),
    }
}

fn street() -> SceneConfig {
    SceneConfig {
        title: "Street".to_string(),
        background: "street".to_string(),
        character: Character::Secondary,
        spawn: Vec2::new(100.0, 360.0),
        duration_seconds: Some(180.0),
        use_carry_over: false,
        next: Some(SceneId::from(ids::BROTHER_A_TRANSITION)),
        obstacles: SCREEN_BOUNDS.to_vec(),
        behavior: BehaviorConfig::Street(StreetConfig {
            success: SceneId::from(ids::STORE),
            upgrade_route: Some(UpgradeRoute {
                upgrade: UpgradeId::BulkMembership,
                target: SceneId::from(ids::COSTCO),
            }),
        }),
    }
}

fn store() -> SceneConfig {
    SceneConfig {
        title: "Candy Store".to_string(),
        background: "store".to_string(),
        character: Character::Secondary,
        spawn: Vec2::new(640.0, 500.0),
        duration_seconds: None,
        use_carry_over: true,
        next: Some(SceneId::from(ids::BROTHER_A_TRANSITION)),
        obstacles: rects(&[
            (0.0, 0.0, 280.0, 720.0),
            (0.0, 0.0, 1280.0, 250.0),
            (1000.0, 0.0, 250.0, 720.0),
            (0.0, 600.0, 1280.0, 120.0),
            (520.0, 445.0, 245.0, 50.0),
            (540.0, 200.0, 330.0, 145.0),
            (510.0, 600.0, 245.0, 50.0),
        ]),
        behavior: BehaviorConfig::Shop(ShopConfig {
            counters: vec![Vec2::new(800.0, 300.0)],
            counter_radius: 80.0,
            prices: PriceList::new(1, 5, 30),
            max_quantity: 10,
            machine: Some(MachineConfig {
                position: Vec2::new(600.0, 300.0),
                radius: 80.0,
                offer: UpgradeOffer {
                    upgrade: UpgradeId::VendingMachine,
                    cost: 150,
                    bonus: Some((CandyType::Rare, 5)),
                },
            }),
            goal: None,
        }),
    }
}

fn costco() -> SceneConfig {
    SceneConfig {
        title: "Costco".to_string(),
        background: "costco".to_string(),
        character: Character::Secondary,
        spawn: Vec2::new(200.0, 500.0),
        duration_seconds: Some(180.0),
        use_carry_over: true,
        next: Some(SceneId::from(ids::BROTHER_A_TRANSITION)),
        obstacles: with_bounds(rects(&[
            (100.0, 300.0, 200.0, 100.0),
            (400.0, 300.0, 200.0, 100.0),
            (700.0, 300.0, 200.0, 100.0),
            (850.0, 350.0, 300.0, 100.0),
            (920.0, 280.0, 60.0, 60.0),
            (1020.0, 280.0, 60.0, 60.0),
            (550.0, 150.0, 100.0, 100.0),
        ])),
        behavior: BehaviorConfig::Shop(ShopConfig {
            counters: vec![Vec2::new(950.0, 320.0), Vec2::new(1050.0, 320.0)],
            counter_radius: 80.0,
            prices: PriceList::new(1, 3, 20),
            max_quantity: 20,
            machine: None,
            goal: Some(GoalConfig {
                name: "PS5".to_string(),
                position: Vec2::new(600.0, 200.0),
                radius: 80.0,
                cost: 500,
                next: SceneId::from(ids::ENDING),
            }),
        }),
    }
}
