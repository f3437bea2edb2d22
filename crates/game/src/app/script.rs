use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use sugar_engine::{ActionSlot, Direction, InputPoll, InputSnapshot, InputSource, KeyPress};
use thiserror::Error;
use tracing::{info, warn};

const KEY_NAMES: &str =
    "up|down|left|right|1|2|3|4|interact|inventory|escape|confirm|plus|minus|fastforward";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScriptCommand {
    Hold {
        directions: Vec<Direction>,
        seconds: f32,
    },
    Press(KeyPress),
    Wait {
        seconds: f32,
    },
    Quit,
}

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read playtest script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("script line {line}: {reason}. usage: {usage}")]
    Parse {
        line: usize,
        reason: String,
        usage: &'static str,
    },
}

pub(crate) fn parse_script_commands(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        if let Some(command) = parse_script_line(raw_line, index + 1)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Parses one line; blank lines and `#` comments yield `None`.
pub(crate) fn parse_script_line(
    raw_line: &str,
    line: usize,
) -> Result<Option<ScriptCommand>, ScriptError> {
    let trimmed = raw_line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let error = |reason: String, usage: &'static str| ScriptError::Parse {
        line,
        reason,
        usage,
    };

    let command = match tokens[0].to_ascii_lowercase().as_str() {
        "hold" => {
            const USAGE: &str = "hold <dir[,dir...]> <seconds>";
            let [_, dirs, seconds] = tokens.as_slice() else {
                return Err(error("expected 2 arguments".to_string(), USAGE));
            };
            let directions = dirs
                .split(',')
                .map(|name| {
                    parse_direction(name)
                        .ok_or_else(|| error(format!("unknown direction '{name}'"), USAGE))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let seconds = parse_seconds(seconds).map_err(|reason| error(reason, USAGE))?;
            ScriptCommand::Hold {
                directions,
                seconds,
            }
        }
        "press" => {
            const USAGE: &str = "press <key>";
            let [_, key] = tokens.as_slice() else {
                return Err(error("expected 1 argument".to_string(), USAGE));
            };
            let key = parse_key(key)
                .ok_or_else(|| error(format!("unknown key '{key}', expected {KEY_NAMES}"), USAGE))?;
            ScriptCommand::Press(key)
        }
        "wait" => {
            const USAGE: &str = "wait <seconds>";
            let [_, seconds] = tokens.as_slice() else {
                return Err(error("expected 1 argument".to_string(), USAGE));
            };
            let seconds = parse_seconds(seconds).map_err(|reason| error(reason, USAGE))?;
            ScriptCommand::Wait { seconds }
        }
        "quit" => {
            if tokens.len() != 1 {
                return Err(error("expected no arguments".to_string(), "quit"));
            }
            ScriptCommand::Quit
        }
        other => {
            return Err(error(
                format!("unknown command '{other}'"),
                "hold | press | wait | quit",
            ))
        }
    };
    Ok(Some(command))
}

fn parse_direction(name: &str) -> Option<Direction> {
    match name.to_ascii_lowercase().as_str() {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

fn parse_key(name: &str) -> Option<KeyPress> {
    if let Some(direction) = parse_direction(name) {
        return Some(KeyPress::Direction(direction));
    }
    let key = match name.to_ascii_lowercase().as_str() {
        "interact" => KeyPress::Interact,
        "inventory" => KeyPress::Inventory,
        "escape" => KeyPress::Escape,
        "confirm" => KeyPress::Confirm,
        "plus" => KeyPress::QuantityUp,
        "minus" => KeyPress::QuantityDown,
        "fastforward" => KeyPress::FastForward,
        digit => {
            let number = digit.parse::<u8>().ok()?;
            KeyPress::Action(ActionSlot::from_number(number)?)
        }
    };
    Some(key)
}

fn parse_seconds(raw: &str) -> Result<f32, String> {
    match raw.parse::<f32>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(format!("invalid seconds '{raw}'")),
    }
}

enum CommandFeed {
    Queued(VecDeque<ScriptCommand>),
    Lines {
        reader: Box<dyn BufRead>,
        line: usize,
    },
}

impl CommandFeed {
    fn next_command(&mut self) -> Option<ScriptCommand> {
        match self {
            CommandFeed::Queued(commands) => commands.pop_front(),
            CommandFeed::Lines { reader, line } => loop {
                let mut buffer = String::new();
                match reader.read_line(&mut buffer) {
                    Ok(0) => return None,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(error = %error, "script_read_failed");
                        return None;
                    }
                }
                *line += 1;
                match parse_script_line(&buffer, *line) {
                    Ok(Some(command)) => return Some(command),
                    Ok(None) => {}
                    Err(error) => warn!(error = %error, "script_line_rejected"),
                }
            },
        }
    }
}

struct HeldStep {
    held: Vec<Direction>,
    ticks_left: u32,
}

/// Turns playtest commands into per-tick snapshots. Presses last exactly
/// one tick; holds and waits span `seconds / fixed_dt` ticks.
pub(crate) struct ScriptInput {
    feed: CommandFeed,
    fixed_dt_seconds: f32,
    current: Option<HeldStep>,
}

impl ScriptInput {
    pub(crate) fn from_commands(commands: Vec<ScriptCommand>, fixed_dt_seconds: f32) -> Self {
        Self {
            feed: CommandFeed::Queued(commands.into()),
            fixed_dt_seconds,
            current: None,
        }
    }

    pub(crate) fn from_path(path: &Path, fixed_dt_seconds: f32) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let commands = parse_script_commands(&text)?;
        info!(path = %path.display(), commands = commands.len(), "script_loaded");
        Ok(Self::from_commands(commands, fixed_dt_seconds))
    }

    pub(crate) fn from_stdin(fixed_dt_seconds: f32) -> Self {
        Self {
            feed: CommandFeed::Lines {
                reader: Box::new(io::BufReader::new(io::stdin())),
                line: 0,
            },
            fixed_dt_seconds,
            current: None,
        }
    }

    fn ticks_for(&self, seconds: f32) -> u32 {
        (seconds / self.fixed_dt_seconds.max(f32::EPSILON)).round() as u32
    }
}

impl InputSource for ScriptInput {
    fn snapshot_for_tick(&mut self) -> InputPoll {
        loop {
            if let Some(step) = self.current.as_mut() {
                if step.ticks_left > 0 {
                    step.ticks_left -= 1;
                    let snapshot = step
                        .held
                        .iter()
                        .fold(InputSnapshot::empty(), |snapshot, direction| {
                            snapshot.with_held(*direction, true)
                        });
                    return InputPoll::Snapshot(snapshot);
                }
                self.current = None;
            }

            let Some(command) = self.feed.next_command() else {
                return InputPoll::Exhausted;
            };
            match command {
                ScriptCommand::Press(key) => {
                    return InputPoll::Snapshot(InputSnapshot::empty().with_pressed(key));
                }
                ScriptCommand::Quit => {
                    return InputPoll::Snapshot(InputSnapshot::empty().with_quit_requested(true));
                }
                ScriptCommand::Hold {
                    directions,
                    seconds,
                } => {
                    self.current = Some(HeldStep {
                        held: directions,
                        ticks_left: self.ticks_for(seconds),
                    });
                }
                ScriptCommand::Wait { seconds } => {
                    self.current = Some(HeldStep {
                        held: Vec::new(),
                        ticks_left: self.ticks_for(seconds),
                    });
                }
            }
        }
    }
}
