mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod scene;

pub use geometry::{Rect, Vec2};
pub use input::{ActionSlot, Direction, InputSnapshot, KeyPress};
pub use loop_runner::{
    run_app, AppError, ExitReason, InputPoll, InputSource, LoopConfig, LoopExit, Pacing,
    RenderError, Renderer,
};
pub use scene::{
    BoxedScene, Scene, SceneCommand, SceneDirector, SceneError, SceneId, SceneRegistry,
    TickOutcome,
};
