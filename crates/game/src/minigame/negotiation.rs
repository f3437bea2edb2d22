use rand::Rng;
use sugar_engine::Direction;

use super::MinigameView;

pub const NEGOTIATION_TIME_LIMIT_SECONDS: f32 = 3.0;
pub const MIN_SEQUENCE_LEN: usize = 3;
pub const MAX_SEQUENCE_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationFailure {
    WrongKey,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStatus {
    InProgress,
    Succeeded,
    Failed(NegotiationFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationGame {
    target: Vec<Direction>,
    progress: usize,
    time_limit: f32,
    elapsed: f32,
    status: NegotiationStatus,
}

impl NegotiationGame {
    pub fn start<R: Rng + ?Sized>(rng: &mut R, time_limit: f32) -> Self {
        let len = rng.gen_range(MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN);
        let target = (0..len)
            .map(|_| Direction::ALL[rng.gen_range(0..Direction::ALL.len())])
            .collect();
        Self::with_sequence(target, time_limit)
    }

    pub fn with_sequence(target: Vec<Direction>, time_limit: f32) -> Self {
        let status = if target.is_empty() {
            NegotiationStatus::Succeeded
        } else {
            NegotiationStatus::InProgress
        };
        Self {
            target,
            progress: 0,
            time_limit,
            elapsed: 0.0,
            status,
        }
    }

    pub fn status(&self) -> NegotiationStatus {
        self.status
    }

    pub fn target(&self) -> &[Direction] {
        &self.target
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn remaining_seconds(&self) -> f32 {
        (self.time_limit - self.elapsed).max(0.0)
    }

    pub fn press(&mut self, direction: Direction) -> NegotiationStatus {
        if self.status != NegotiationStatus::InProgress {
            return self.status;
        }

        if self.target[self.progress] == direction {
            self.progress += 1;
            if self.progress == self.target.len() {
                self.status = NegotiationStatus::Succeeded;
            }
        } else {
            self.status = NegotiationStatus::Failed(NegotiationFailure::WrongKey);
        }
        self.status
    }

    pub fn tick(&mut self, dt: f32) -> NegotiationStatus {
        if self.status != NegotiationStatus::InProgress {
            return self.status;
        }

        self.elapsed += dt;
        if self.elapsed >= self.time_limit {
            self.status = NegotiationStatus::Failed(NegotiationFailure::TimedOut);
        }
        self.status
    }

    pub fn view(&self) -> MinigameView {
        MinigameView::Negotiation {
            sequence: self.target.clone(),
            progress: self.progress,
            remaining_seconds: self.remaining_seconds(),
        }
    }
}
