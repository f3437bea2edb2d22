use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::input::InputSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneId),
    Quit,
}

impl From<Option<SceneId>> for SceneCommand {
    fn from(pending: Option<SceneId>) -> Self {
        match pending {
            Some(next) => SceneCommand::SwitchTo(next),
            None => SceneCommand::None,
        }
    }
}

pub trait Scene {
    type Context;
    type View;

    fn load(&mut self, _context: &mut Self::Context) {}
    fn process_input(&mut self, input: &InputSnapshot, context: &mut Self::Context);
    fn update(&mut self, fixed_dt_seconds: f32, context: &mut Self::Context) -> SceneCommand;
    fn unload(&mut self, _context: &mut Self::Context) {}
    fn view(&self, context: &Self::Context) -> Self::View;
}

pub type BoxedScene<C, V> = Box<dyn Scene<Context = C, View = V>>;

type SceneFactory<C, V> = Box<dyn Fn(&mut C) -> BoxedScene<C, V>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("no scene registered under id '{id}'")]
    UnknownScene { id: SceneId },
    #[error("scene id '{id}' registered twice")]
    DuplicateScene { id: SceneId },
}

pub struct SceneRegistry<C, V> {
    factories: BTreeMap<SceneId, SceneFactory<C, V>>,
}

impl<C, V> Default for SceneRegistry<C, V> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<C, V> SceneRegistry<C, V> {
    pub fn register<F>(&mut self, id: SceneId, factory: F) -> Result<(), SceneError>
    where
        F: Fn(&mut C) -> BoxedScene<C, V> + 'static,
    {
        if self.factories.contains_key(&id) {
            return Err(SceneError::DuplicateScene { id });
        }
        self.factories.insert(id, Box::new(factory));
        Ok(())
    }

    pub fn contains(&self, id: &SceneId) -> bool {
        self.factories.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SceneId> {
        self.factories.keys()
    }

    pub fn instantiate(
        &self,
        id: &SceneId,
        context: &mut C,
    ) -> Result<BoxedScene<C, V>, SceneError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| SceneError::UnknownScene { id: id.clone() })?;
        Ok(factory(context))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Switched { from: SceneId, to: SceneId },
    Quit,
}

/// Owns the live scene and the context every scene shares. Only the
/// context survives a transition.
pub struct SceneDirector<C, V> {
    registry: SceneRegistry<C, V>,
    context: C,
    active_id: SceneId,
    active: BoxedScene<C, V>,
}

impl<C, V> SceneDirector<C, V> {
    pub fn new(
        registry: SceneRegistry<C, V>,
        mut context: C,
        initial: SceneId,
    ) -> Result<Self, SceneError> {
        let mut active = registry.instantiate(&initial, &mut context)?;
        active.load(&mut context);
        info!(scene = %initial, "scene_loaded");
        Ok(Self {
            registry,
            context,
            active_id: initial,
            active,
        })
    }

    pub fn active_id(&self) -> &SceneId {
        &self.active_id
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn view(&self) -> V {
        self.active.view(&self.context)
    }

    pub fn tick(
        &mut self,
        input: &InputSnapshot,
        fixed_dt_seconds: f32,
    ) -> Result<TickOutcome, SceneError> {
        self.active.process_input(input, &mut self.context);
        match self.active.update(fixed_dt_seconds, &mut self.context) {
            SceneCommand::None => Ok(TickOutcome::Continue),
            SceneCommand::Quit => Ok(TickOutcome::Quit),
            SceneCommand::SwitchTo(next) => {
                let from = self.switch_to(next)?;
                Ok(TickOutcome::Switched {
                    from,
                    to: self.active_id.clone(),
                })
            }
        }
    }

    /// Tears down the live scene and builds a fresh instance of `next`,
    /// even when `next` names the scene already running.
    pub fn switch_to(&mut self, next: SceneId) -> Result<SceneId, SceneError> {
        if !self.registry.contains(&next) {
            return Err(SceneError::UnknownScene { id: next });
        }

        self.active.unload(&mut self.context);
        let mut scene = self.registry.instantiate(&next, &mut self.context)?;
        scene.load(&mut self.context);
        self.active = scene;
        let from = std::mem::replace(&mut self.active_id, next);
        info!(from = %from, to = %self.active_id, "scene_switched");
        Ok(from)
    }

    pub fn shutdown(&mut self) {
        self.active.unload(&mut self.context);
        info!(scene = %self.active_id, "scene_unloaded");
    }
}
