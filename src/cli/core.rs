//! Shell-wide types: modes, loop control, command errors and argument parsing.

use std::io;

use chrono::NaiveDate;
use gestor_core::CoreError;

use crate::errors::{CliError, GestorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("No user logged in. Use `login <employee>` first.")]
    NotLoggedIn,
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] GestorError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Core(GestorError::from(err))
    }
}

impl From<gestor_config::ConfigError> for CommandError {
    fn from(err: gestor_config::ConfigError) -> Self {
        CommandError::Core(GestorError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", text))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Accepts `1234.56`, `1234,56`, `1.234,56` and `1.500`. Dots followed by
/// groups of exactly three digits are pt-BR thousands separators, so `1.500`
/// is fifteen hundred while `1.5` and `1234.567` stay decimal. Anything else
/// yields `None`.
pub(crate) fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim().trim_start_matches("R$").trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else if is_grouped_thousands(trimmed) {
        trimmed.replace('.', "")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok()
}

fn is_grouped_thousands(value: &str) -> bool {
    let all_digits = |group: &str| group.bytes().all(|byte| byte.is_ascii_digit());
    let mut groups = value.split('.');
    let Some(head) = groups.next() else {
        return false;
    };
    let tail: Vec<&str> = groups.collect();
    (1..=3).contains(&head.len())
        && !head.starts_with('0')
        && all_digits(head)
        && !tail.is_empty()
        && tail.iter().all(|group| group.len() == 3 && all_digits(group))
}

pub(crate) fn parse_count(input: &str, label: &str) -> Result<usize, CommandError> {
    match input.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "{} must be a positive number",
            label
        ))),
    }
}

/// Splits `--flag value` pairs out of `args`, returning positionals and flags in order.
pub(crate) fn split_flags<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(String, &'a str)>), CommandError> {
    let mut positionals = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.strip_prefix("--") {
            Some(name) if known.contains(&name) => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("missing value for `--{}`", name))
                })?;
                flags.push((name.to_string(), *value));
            }
            Some(name) => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{}`",
                    name
                )))
            }
            None => positionals.push(*arg),
        }
    }
    Ok((positionals, flags))
}
