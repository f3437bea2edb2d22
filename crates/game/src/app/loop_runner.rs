use std::process::ExitCode;

use sugar_engine::run_app;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(mut app: AppWiring) -> ExitCode {
    match run_app(
        &app.config,
        &mut app.director,
        app.input.as_mut(),
        &mut app.renderer,
    ) {
        Ok(exit) => {
            let context = app.director.context();
            let profile = context.profile();
            info!(
                ticks = exit.ticks,
                reason = ?exit.reason,
                frames = app.renderer.frames(),
                money = profile.money(),
                goal_reached = profile.goal_reached(),
                save_failures = context.save_failures(),
                "run_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "run_failed");
            ExitCode::FAILURE
        }
    }
}
