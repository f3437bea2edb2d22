use serde::{Deserialize, Serialize};
use sugar_engine::{Rect, Vec2};

use super::MinigameView;

pub const DETECTION_PENALTY_SECONDS: f32 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    pub start: Vec2,
    pub speed: Vec2,
    pub bounds: Rect,
    pub radius: f32,
    pub hold_position: Vec2,
    pub hold_seconds: f32,
    pub release_position: Vec2,
    pub immunity_seconds: f32,
    #[serde(default = "default_penalty_seconds")]
    pub penalty_seconds: f32,
}

fn default_penalty_seconds() -> f32 {
    DETECTION_PENALTY_SECONDS
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionState {
    Watching,
    Holding { remaining: f32 },
    Immune { remaining: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionEvent {
    Caught { hold_at: Vec2, penalty_seconds: f32 },
    Released { release_at: Vec2 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionGame {
    config: DetectorConfig,
    position: Vec2,
    direction: Vec2,
    state: DetectionState,
}

impl DetectionGame {
    pub fn new(config: DetectorConfig) -> Self {
        let position = clamp_to(config.start, &config.bounds);
        Self {
            config,
            position,
            direction: Vec2::new(1.0, 1.0),
            state: DetectionState::Watching,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn state(&self) -> DetectionState {
        self.state
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn blocks_movement(&self) -> bool {
        matches!(self.state, DetectionState::Holding { .. })
    }

    /// Moves the detector, then advances the hold or immunity timers or
    /// runs the catch test against `player`.
    pub fn tick(&mut self, dt: f32, player: Vec2) -> Option<DetectionEvent> {
        self.advance_detector(dt);

        match self.state {
            DetectionState::Watching => {
                if player.distance(self.position) < self.config.radius {
                    self.state = DetectionState::Holding {
                        remaining: self.config.hold_seconds,
                    };
                    Some(DetectionEvent::Caught {
                        hold_at: self.config.hold_position,
                        penalty_seconds: self.config.penalty_seconds,
                    })
                } else {
                    None
                }
            }
            DetectionState::Holding { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.state = DetectionState::Immune {
                        remaining: self.config.immunity_seconds,
                    };
                    Some(DetectionEvent::Released {
                        release_at: self.config.release_position,
                    })
                } else {
                    self.state = DetectionState::Holding { remaining };
                    None
                }
            }
            DetectionState::Immune { remaining } => {
                let remaining = remaining - dt;
                self.state = if remaining <= 0.0 {
                    DetectionState::Watching
                } else {
                    DetectionState::Immune { remaining }
                };
                None
            }
        }
    }

    pub fn view(&self) -> MinigameView {
        MinigameView::Detection {
            position: self.position,
            radius: self.config.radius,
            held: matches!(self.state, DetectionState::Holding { .. }),
            immune: matches!(self.state, DetectionState::Immune { .. }),
        }
    }

    fn advance_detector(&mut self, dt: f32) {
        let bounds = self.config.bounds;
        let (x, dir_x) = step_axis(
            self.position.x,
            self.direction.x,
            self.config.speed.x * dt,
            bounds.x,
            bounds.right(),
        );
        let (y, dir_y) = step_axis(
            self.position.y,
            self.direction.y,
            self.config.speed.y * dt,
            bounds.y,
            bounds.bottom(),
        );
        self.position = Vec2::new(x, y);
        self.direction = Vec2::new(dir_x, dir_y);
    }
}

fn step_axis(value: f32, direction: f32, distance: f32, min: f32, max: f32) -> (f32, f32) {
    let next = value + direction * distance;
    if next <= min {
        (min, 1.0)
    } else if next >= max {
        (max, -1.0)
    } else {
        (next, direction)
    }
}

fn clamp_to(point: Vec2, bounds: &Rect) -> Vec2 {
    Vec2::new(
        point.x.clamp(bounds.x, bounds.right().max(bounds.x)),
        point.y.clamp(bounds.y, bounds.bottom().max(bounds.y)),
    )
}
