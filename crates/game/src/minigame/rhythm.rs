use rand::Rng;
use sugar_engine::Direction;

use super::MinigameView;

pub const DEFAULT_REQUIRED_ALTERNATIONS: u32 = 20;
pub const BICYCLE_REQUIRED_ALTERNATIONS: u32 = 10;
pub const COUNTDOWN_MIN_SECONDS: f32 = 0.5;
pub const COUNTDOWN_MAX_SECONDS: f32 = 1.5;
pub const PRESS_WINDOW_SECONDS: f32 = 0.3;
pub const FAILURE_DISPLAY_SECONDS: f32 = 1.5;
pub const RHYTHM_PENALTY_SECONDS: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RhythmPhase {
    Idle,
    Countdown { remaining: f32 },
    PressWindow { remaining: f32 },
    Failed { remaining: f32 },
    Complete,
}

impl RhythmPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RhythmPhase::Idle => "idle",
            RhythmPhase::Countdown { .. } => "wait",
            RhythmPhase::PressWindow { .. } => "press",
            RhythmPhase::Failed { .. } => "failed",
            RhythmPhase::Complete => "complete",
        }
    }

    pub fn remaining(&self) -> f32 {
        match self {
            RhythmPhase::Countdown { remaining }
            | RhythmPhase::PressWindow { remaining }
            | RhythmPhase::Failed { remaining } => *remaining,
            RhythmPhase::Idle | RhythmPhase::Complete => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmFailure {
    TooEarly,
    TooLate,
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RhythmEvent {
    Stepped { completed: u32 },
    Failed {
        reason: RhythmFailure,
        penalty_seconds: f32,
    },
    Completed,
}

/// Alternating-step cadence game. Each accepted press must land inside a
/// short window and differ from the previous direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmGame {
    required: u32,
    completed: u32,
    last_direction: Option<Direction>,
    phase: RhythmPhase,
    last_failure: Option<RhythmFailure>,
}

impl RhythmGame {
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            completed: 0,
            last_direction: None,
            phase: RhythmPhase::Idle,
            last_failure: None,
        }
    }

    pub fn for_bicycle(owns_bicycle: bool) -> Self {
        if owns_bicycle {
            Self::new(BICYCLE_REQUIRED_ALTERNATIONS)
        } else {
            Self::new(DEFAULT_REQUIRED_ALTERNATIONS)
        }
    }

    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.phase == RhythmPhase::Idle {
            self.phase = draw_countdown(rng);
        }
    }

    pub fn phase(&self) -> RhythmPhase {
        self.phase
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RhythmPhase::Complete
    }

    /// Presses while idle, complete, or showing a failure are ignored.
    pub fn press<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Option<RhythmEvent> {
        match self.phase {
            RhythmPhase::Countdown { .. } => Some(self.fail(RhythmFailure::TooEarly)),
            RhythmPhase::PressWindow { .. } => {
                if self.last_direction == Some(direction) {
                    return Some(self.fail(RhythmFailure::Repeated));
                }
                self.completed += 1;
                self.last_direction = Some(direction);
                if self.completed >= self.required {
                    self.phase = RhythmPhase::Complete;
                    Some(RhythmEvent::Completed)
                } else {
                    self.phase = draw_countdown(rng);
                    Some(RhythmEvent::Stepped {
                        completed: self.completed,
                    })
                }
            }
            RhythmPhase::Idle | RhythmPhase::Failed { .. } | RhythmPhase::Complete => None,
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<RhythmEvent> {
        match self.phase {
            RhythmPhase::Countdown { remaining } => {
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    RhythmPhase::PressWindow {
                        remaining: PRESS_WINDOW_SECONDS,
                    }
                } else {
                    RhythmPhase::Countdown { remaining }
                };
                None
            }
            RhythmPhase::PressWindow { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    Some(self.fail(RhythmFailure::TooLate))
                } else {
                    self.phase = RhythmPhase::PressWindow { remaining };
                    None
                }
            }
            RhythmPhase::Failed { remaining } => {
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    draw_countdown(rng)
                } else {
                    RhythmPhase::Failed { remaining }
                };
                None
            }
            RhythmPhase::Idle | RhythmPhase::Complete => None,
        }
    }

    pub fn view(&self) -> MinigameView {
        MinigameView::Rhythm {
            phase: self.phase.label(),
            phase_remaining_seconds: self.phase.remaining(),
            completed: self.completed,
            required: self.required,
            last_direction: self.last_direction,
            failure: matches!(self.phase, RhythmPhase::Failed { .. })
                .then_some(self.last_failure)
                .flatten(),
        }
    }

    fn fail(&mut self, reason: RhythmFailure) -> RhythmEvent {
        self.completed = 0;
        self.last_direction = None;
        self.last_failure = Some(reason);
        self.phase = RhythmPhase::Failed {
            remaining: FAILURE_DISPLAY_SECONDS,
        };
        RhythmEvent::Failed {
            reason,
            penalty_seconds: RHYTHM_PENALTY_SECONDS,
        }
    }
}

fn draw_countdown<R: Rng + ?Sized>(rng: &mut R) -> RhythmPhase {
    RhythmPhase::Countdown {
        remaining: rng.gen_range(COUNTDOWN_MIN_SECONDS..COUNTDOWN_MAX_SECONDS),
    }
}
