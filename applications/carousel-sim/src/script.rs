//! Session scripts
//!
//! One step per line:
//!
//! ```text
//! # comments start with '#'
//! gesture
//! next
//! prev
//! jump 2
//! toggle 1
//! stop
//! menu open
//! menu select 0
//! menu close
//! track 3
//! resize 1280 720
//! wait 10s        # also 500ms, or bare milliseconds
//! ```

use carousel_playback::CarouselCommand;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Script parse errors (line numbers are 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand { line: usize, word: String },

    #[error("line {line}: '{command}' expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: invalid duration '{value}'")]
    InvalidDuration { line: usize, value: String },

    #[error("line {line}: unexpected '{rest}'")]
    TrailingInput { line: usize, rest: String },
}

/// One script step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Apply a carousel command
    Command(CarouselCommand),
    /// Let virtual time pass
    Wait(Duration),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Command(command) => write!(f, "{}", command),
            Step::Wait(duration) => write!(f, "wait {}ms", duration.as_millis()),
        }
    }
}

/// A parsed script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<(usize, Step)>,
}

impl Script {
    /// Parse script text
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (number, raw) in text.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or_default();
            let words: Vec<&str> = content.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            let line = number + 1;
            steps.push((line, parse_line(line, &words)?));
        }
        Ok(Self { steps })
    }

    /// Steps in order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(|(_, step)| step)
    }

    /// Steps with their source line numbers
    pub fn numbered(&self) -> &[(usize, Step)] {
        &self.steps
    }

    /// Total virtual time spent in `wait` steps
    pub fn total_wait(&self) -> Duration {
        self.steps()
            .filter_map(|step| match step {
                Step::Wait(duration) => Some(*duration),
                Step::Command(_) => None,
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_line(line: usize, words: &[&str]) -> Result<Step, ScriptError> {
    let (step, used) = match words {
        ["gesture", ..] => (Step::Command(CarouselCommand::Gesture), 1),
        ["next", ..] => (Step::Command(CarouselCommand::Next), 1),
        ["prev" | "previous", ..] => (Step::Command(CarouselCommand::Previous), 1),
        ["stop", ..] => (Step::Command(CarouselCommand::StopAll), 1),
        ["jump", rest @ ..] => {
            let index = index_arg(line, "jump", rest)?;
            (Step::Command(CarouselCommand::JumpTo { index }), 2)
        }
        ["toggle", rest @ ..] => {
            let slide = index_arg(line, "toggle", rest)?;
            (Step::Command(CarouselCommand::Toggle { slide }), 2)
        }
        ["track", rest @ ..] => {
            let index = index_arg(line, "track", rest)?;
            (Step::Command(CarouselCommand::SelectTrack { index }), 2)
        }
        ["menu", "open", ..] => (Step::Command(CarouselCommand::OpenMenu), 2),
        ["menu", "close", ..] => (Step::Command(CarouselCommand::CloseMenu), 2),
        ["menu", "select", rest @ ..] => {
            let index = index_arg(line, "menu select", rest)?;
            (Step::Command(CarouselCommand::SelectMenuItem { index }), 3)
        }
        ["menu", ..] => {
            return Err(ScriptError::MissingArgument {
                line,
                command: "menu",
                expected: "open, close or select N",
            })
        }
        ["resize", width, height, ..] => {
            let width = number(line, width)?;
            let height = number(line, height)?;
            (Step::Command(CarouselCommand::Resize { width, height }), 3)
        }
        ["resize", ..] => {
            return Err(ScriptError::MissingArgument {
                line,
                command: "resize",
                expected: "a width and a height",
            })
        }
        ["wait", value, ..] => (Step::Wait(duration(line, value)?), 2),
        ["wait"] => {
            return Err(ScriptError::MissingArgument {
                line,
                command: "wait",
                expected: "a duration",
            })
        }
        [word, ..] => {
            return Err(ScriptError::UnknownCommand {
                line,
                word: (*word).to_string(),
            })
        }
        [] => {
            return Err(ScriptError::UnknownCommand {
                line,
                word: String::new(),
            })
        }
    };

    if words.len() > used {
        return Err(ScriptError::TrailingInput {
            line,
            rest: words[used..].join(" "),
        });
    }

    Ok(step)
}

fn index_arg(line: usize, command: &'static str, rest: &[&str]) -> Result<usize, ScriptError> {
    let value = rest.first().ok_or(ScriptError::MissingArgument {
        line,
        command,
        expected: "a slide index",
    })?;
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: (*value).to_string(),
    })
}

fn number(line: usize, value: &str) -> Result<f64, ScriptError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ScriptError::InvalidNumber {
            line,
            value: value.to_string(),
        })
}

/// `500ms`, `10s`, `2m` or bare milliseconds
fn duration(line: usize, value: &str) -> Result<Duration, ScriptError> {
    let invalid = || ScriptError::InvalidDuration {
        line,
        value: value.to_string(),
    };

    let (digits, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1_000)
    } else if let Some(m) = value.strip_suffix('m') {
        (m, 60_000)
    } else {
        (value, 1)
    };

    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    amount
        .checked_mul(scale)
        .map(Duration::from_millis)
        .ok_or_else(invalid)
}
