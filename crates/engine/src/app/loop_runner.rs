use std::error::Error as StdError;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::StartupError;

use super::input::InputSnapshot;
use super::metrics::MetricsAccumulator;
use super::scene::{SceneDirector, SceneError, TickOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep between frames so ticks track wall time.
    Realtime,
    /// One tick per frame, no sleeping. Used for scripted playtests.
    Headless,
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub pacing: Pacing,
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            pacing: Pacing::Realtime,
            max_ticks: None,
        }
    }
}

impl LoopConfig {
    pub fn fixed_dt(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_tps.max(1) as f64)
    }
}

pub enum InputPoll {
    Snapshot(InputSnapshot),
    Exhausted,
}

/// Supplies one snapshot per simulation tick. Discrete presses must be
/// reported for a single tick only.
pub trait InputSource {
    fn snapshot_for_tick(&mut self) -> InputPoll;
}

pub type RenderError = Box<dyn StdError + Send + Sync>;

pub trait Renderer<V> {
    fn present(&mut self, view: &V) -> Result<(), RenderError>;
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("scene transition failed: {0}")]
    Scene(#[from] SceneError),
    #[error("renderer failed to present frame: {0}")]
    Render(#[source] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    QuitRequested,
    SceneQuit,
    InputExhausted,
    TickLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopExit {
    pub ticks: u64,
    pub reason: ExitReason,
}

pub fn run_app<C, V>(
    config: &LoopConfig,
    director: &mut SceneDirector<C, V>,
    input: &mut dyn InputSource,
    renderer: &mut dyn Renderer<V>,
) -> Result<LoopExit, AppError> {
    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = config.fixed_dt();
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let frame_target = target_frame_duration(Some(target_tps));

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        pacing = ?config.pacing,
        max_ticks = ?config.max_ticks,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, last_frame_instant);

    let reason = 'frames: loop {
        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        let step_plan = match config.pacing {
            Pacing::Realtime => {
                let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                accumulator = accumulator.saturating_add(clamped_frame_dt);
                plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame)
            }
            Pacing::Headless => StepPlan {
                ticks_to_run: 1,
                remaining_accumulator: Duration::ZERO,
                dropped_backlog: Duration::ZERO,
            },
        };

        for _ in 0..step_plan.ticks_to_run {
            if tick_limit_reached(config.max_ticks, metrics_accumulator.total_ticks()) {
                break 'frames ExitReason::TickLimit;
            }
            let snapshot = match input.snapshot_for_tick() {
                InputPoll::Snapshot(snapshot) => snapshot,
                InputPoll::Exhausted => break 'frames ExitReason::InputExhausted,
            };
            if snapshot.quit_requested() {
                info!(reason = "input", "shutdown_requested");
                break 'frames ExitReason::QuitRequested;
            }

            let outcome = director.tick(&snapshot, fixed_dt_seconds)?;
            metrics_accumulator.record_tick();
            if outcome == TickOutcome::Quit {
                info!(reason = "scene", "shutdown_requested");
                break 'frames ExitReason::SceneQuit;
            }
        }
        accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame, "sim_clamp_triggered"
            );
        }

        renderer
            .present(&director.view())
            .map_err(AppError::Render)?;
        metrics_accumulator.record_frame(raw_frame_dt);

        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                total_ticks = snapshot.total_ticks,
                scene = %director.active_id(),
                "loop_metrics"
            );
        }

        if config.pacing == Pacing::Realtime {
            let elapsed = Instant::now().saturating_duration_since(now);
            let sleep = compute_cap_sleep(elapsed, frame_target);
            if sleep > Duration::ZERO {
                thread::sleep(sleep);
            }
        }
    };

    director.shutdown();
    let ticks = metrics_accumulator.total_ticks();
    info!(reason = ?reason, ticks, "shutdown");
    Ok(LoopExit { ticks, reason })
}

fn tick_limit_reached(max_ticks: Option<u64>, ticks_run: u64) -> bool {
    max_ticks.is_some_and(|limit| ticks_run >= limit)
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn target_frame_duration(max_fps: Option<u32>) -> Option<Duration> {
    max_fps
        .filter(|fps| *fps > 0)
        .map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}
