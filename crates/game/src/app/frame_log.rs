use sugar_engine::{RenderError, Renderer, SceneId};
use tracing::{debug, info};

use crate::minigame::MinigameView;
use crate::scenes::FrameView;

#[derive(Default)]
pub(crate) struct TraceRenderer {
    last_scene: Option<SceneId>,
    last_notice: Option<String>,
    frames: u64,
}

impl TraceRenderer {
    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer<FrameView> for TraceRenderer {
    fn present(&mut self, view: &FrameView) -> Result<(), RenderError> {
        self.frames += 1;

        if self.last_scene.as_ref() != Some(&view.scene) {
            info!(
                scene = %view.scene,
                title = %view.title,
                character = view.character.map(|character| character.display_name()),
                remaining_seconds = ?view.remaining_seconds,
                money = view.economy.money,
                candy = view.economy.total_candy(),
                buyers = view.economy.buyers,
                "scene_presented"
            );
            if !view.menu.is_empty() {
                info!(menu = %view.menu.join(" | "), "menu");
            }
            self.last_scene = Some(view.scene.clone());
            self.last_notice = None;
        }

        if view.notice.is_some() && view.notice != self.last_notice {
            if let Some(notice) = &view.notice {
                info!(scene = %view.scene, notice = %notice, "notice");
            }
            self.last_notice = view.notice.clone();
        }

        debug!(
            frame = self.frames,
            scene = %view.scene,
            remaining = ?view.remaining_seconds.map(|seconds| seconds.ceil()),
            player = ?view.player.map(|player| (player.x.round(), player.y.round())),
            money = view.economy.money,
            candy = ?view.economy.candy,
            hints = ?view.hints,
            minigames = %minigame_summary(&view.minigames),
            panel = ?view.panel.as_ref().map(|panel| &panel.title),
            "frame"
        );
        Ok(())
    }
}

fn minigame_summary(minigames: &[MinigameView]) -> String {
    minigames
        .iter()
        .map(MinigameView::summary)
        .collect::<Vec<_>>()
        .join("; ")
}
