//! Self-contained timed minigames. Each one is a small state machine
//! advanced by the owning scene with simulated `dt` and key presses.

mod detection;
mod negotiation;
mod rhythm;

use sugar_engine::{Direction, Vec2};

pub use detection::{DetectionEvent, DetectionGame, DetectorConfig, DETECTION_PENALTY_SECONDS};
pub use negotiation::{NegotiationGame, NegotiationStatus, NEGOTIATION_TIME_LIMIT_SECONDS};
pub use rhythm::{RhythmEvent, RhythmFailure, RhythmGame};

#[derive(Debug, Clone, PartialEq)]
pub enum MinigameView {
    Negotiation {
        sequence: Vec<Direction>,
        progress: usize,
        remaining_seconds: f32,
    },
    Rhythm {
        phase: &'static str,
        phase_remaining_seconds: f32,
        completed: u32,
        required: u32,
        last_direction: Option<Direction>,
        failure: Option<RhythmFailure>,
    },
    Detection {
        position: Vec2,
        radius: f32,
        held: bool,
        immune: bool,
    },
}

impl MinigameView {
    pub fn failure(&self) -> Option<RhythmFailure> {
        match self {
            MinigameView::Rhythm { failure, .. } => *failure,
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            MinigameView::Negotiation {
                sequence,
                progress,
                remaining_seconds,
            } => {
                let arrows: String = sequence
                    .iter()
                    .enumerate()
                    .map(|(index, direction)| {
                        if index < *progress {
                            "*"
                        } else {
                            direction.arrow()
                        }
                    })
                    .collect();
                format!("negotiate [{arrows}] {remaining_seconds:.1}s")
            }
            MinigameView::Rhythm {
                phase,
                completed,
                required,
                failure,
                ..
            } => match failure {
                Some(reason) => format!("walk {completed}/{required} {phase} ({reason:?})"),
                None => format!("walk {completed}/{required} {phase}"),
            },
            MinigameView::Detection {
                position,
                held,
                immune,
                ..
            } => format!(
                "detector ({:.0},{:.0}) held={held} immune={immune}",
                position.x, position.y
            ),
        }
    }
}
