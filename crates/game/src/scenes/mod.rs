mod catalog;
mod clock;
mod context;
mod hazards;
pub mod ids;
mod menu;
mod movement;
mod play;
mod view;

use sugar_engine::{SceneDirector, SceneError, SceneId, SceneRegistry};

pub use catalog::{CatalogError, SceneCatalog};
pub use context::SceneContext;
pub use menu::MenuScene;
pub use play::PlayScene;
pub use view::FrameView;

pub type GameRegistry = SceneRegistry<SceneContext, FrameView>;
pub type GameDirector = SceneDirector<SceneContext, FrameView>;

pub fn build_registry(catalog: &SceneCatalog) -> Result<GameRegistry, SceneError> {
    let mut registry = GameRegistry::default();

    registry.register(SceneId::from(ids::TITLE_SCREEN), |_| {
        Box::new(MenuScene::title_screen())
    })?;
    registry.register(SceneId::from(ids::INSTRUCTIONS), |_| {
        Box::new(MenuScene::instructions())
    })?;
    registry.register(SceneId::from(ids::LOAD_SAVE), |context| {
        Box::new(MenuScene::load_save(context))
    })?;
    registry.register(SceneId::from(ids::BROTHER_A_TRANSITION), |_| {
        Box::new(MenuScene::interlude(
            ids::BROTHER_A_TRANSITION,
            "Andrew heads to school...",
            ids::CLASSROOM,
        ))
    })?;
    registry.register(SceneId::from(ids::BROTHER_B_TRANSITION), |_| {
        Box::new(MenuScene::interlude(
            ids::BROTHER_B_TRANSITION,
            "Mark hits the street...",
            ids::STREET,
        ))
    })?;
    registry.register(SceneId::from(ids::ENDING), |_| Box::new(MenuScene::ending()))?;

    for (id, config) in catalog.entries() {
        let scene_id = id.clone();
        let config = config.clone();
        registry.register(id.clone(), move |context| {
            Box::new(PlayScene::new(scene_id.clone(), config.clone(), context))
        })?;
    }

    Ok(registry)
}

pub fn build_director(
    catalog: &SceneCatalog,
    context: SceneContext,
) -> Result<GameDirector, SceneError> {
    let registry = build_registry(catalog)?;
    SceneDirector::new(registry, context, SceneId::from(ids::TITLE_SCREEN))
}
