pub const FAST_FORWARD_SECONDS: f32 = 15.0;

/// Simulated countdown owned by a scene. Penalties and fast-forward move
/// `elapsed` forward; nothing moves it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneClock {
    elapsed: f32,
    duration: Option<f32>,
}

impl SceneClock {
    pub fn new(duration: Option<f32>) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.filter(|seconds| seconds.is_finite()).map(|s| s.max(0.0)),
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn add_penalty(&mut self, seconds: f32) {
        self.elapsed += seconds.max(0.0);
    }

    pub fn fast_forward(&mut self) -> bool {
        if self.duration.is_none() {
            return false;
        }
        self.elapsed += FAST_FORWARD_SECONDS;
        true
    }

    pub fn remaining(&self) -> Option<f32> {
        self.duration
            .map(|duration| (duration - self.elapsed).max(0.0))
    }

    pub fn expired(&self) -> bool {
        self.duration
            .is_some_and(|duration| self.elapsed >= duration)
    }
}
