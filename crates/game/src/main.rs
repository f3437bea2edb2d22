mod app;
mod economy;
mod minigame;
mod scenes;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::main_entry()
}
