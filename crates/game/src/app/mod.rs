mod bootstrap;
mod frame_log;
mod loop_runner;
mod script;

use std::process::ExitCode;

use tracing::error;

pub(crate) fn main_entry() -> ExitCode {
    match bootstrap::build_app() {
        Ok(app) => loop_runner::run(app),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
