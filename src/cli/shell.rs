use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt,
    io::{self, BufRead},
};

use colored::Colorize;
use gestor_config::Config;
use gestor_core::ReportKind;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::debug;

use crate::cli::core::{CliMode, LoopControl};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::shell_context::ShellContext;
use crate::errors::CliError;

/// Set to run the shell non-interactively over stdin.
pub const SCRIPT_ENV: &str = "GESTOR_CLI_SCRIPT";
/// Set together with [`SCRIPT_ENV`] to echo each command after the session prompt.
pub const ECHO_ENV: &str = "GESTOR_CLI_ECHO";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, std::env::var_os(ECHO_ENV).is_some()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(Vocabulary::from_context(context))));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        // Imports and new records change the ids worth completing.
        if let Some(helper) = editor.helper_mut() {
            helper.vocabulary = Vocabulary::from_context(context);
        }
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                match parse_command_line(line) {
                    Ok(tokens) => {
                        if execute(context, line, &tokens)? == LoopControl::Exit {
                            break;
                        }
                    }
                    Err(err) => cli_io::print_warning(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Runs one command per stdin line. Parse errors name the offending line and
/// the script carries on with the next one.
fn run_script(context: &mut ShellContext, echo: bool) -> Result<(), CliError> {
    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let Some(command) = script_command(&line) else {
            continue;
        };
        if echo {
            cli_io::print_info(format!("{}{}", context.prompt(), command));
        }
        let number = index + 1;
        debug!(line = number, command, "script command");
        match parse_command_line(command) {
            Ok(tokens) => {
                if execute(context, command, &tokens)? == LoopControl::Exit {
                    break;
                }
            }
            Err(err) => cli_io::print_warning(format!("line {}: {}", number, err)),
        }
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Blank lines and `#` comments carry no command.
fn script_command(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    (!trimmed.is_empty() && !trimmed.starts_with('#')).then_some(trimmed)
}

/// Dispatches one parsed line. Command failures are reported and the loop
/// continues; only output failures end the shell.
fn execute(
    context: &mut ShellContext,
    line: &str,
    tokens: &[String],
) -> Result<LoopControl, CliError> {
    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        Ok(LoopControl::Continue) => Ok(LoopControl::Continue),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

/// Words offered by tab completion, keyed by the lowercase words typed before
/// them (`""` for the command itself, `"config set"` for setting keys).
#[derive(Debug, Clone, Default)]
struct Vocabulary {
    words: BTreeMap<String, Vec<String>>,
    usages: BTreeMap<String, &'static str>,
}

impl Vocabulary {
    fn from_context(context: &ShellContext) -> Self {
        let mut vocabulary = Self::default();
        for entry in context.registry.list() {
            vocabulary.insert("", [entry.name]);
            vocabulary.insert(entry.name, entry.subcommands.iter().copied());
            vocabulary.usages.insert(entry.name.to_string(), entry.usage);
        }
        vocabulary.insert("help", context.registry.names());

        let data = context.store.data();
        let company_ids: Vec<&str> = data.companies.iter().map(|c| c.id.as_str()).collect();
        vocabulary.insert("company", company_ids.iter().copied());
        for kind in ReportKind::ALL {
            vocabulary.insert("report", [kind.keyword()]);
            vocabulary.insert(&format!("report {}", kind.keyword()), company_ids.iter().copied());
        }
        vocabulary.insert("login", data.employees.iter().map(|e| e.id.as_str()));
        vocabulary.insert("transaction add", ["revenue", "expense"]);
        vocabulary.insert("config set", Config::SETTABLE_KEYS);
        vocabulary
    }

    fn insert<'a>(&mut self, path: &str, words: impl IntoIterator<Item = &'a str>) {
        let slot = self.words.entry(path.to_ascii_lowercase()).or_default();
        slot.extend(words.into_iter().map(str::to_string));
        slot.sort();
        slot.dedup();
    }

    fn candidates(&self, path: &str, needle: &str) -> Vec<String> {
        self.words
            .get(path)
            .map(|words| {
                words
                    .iter()
                    .filter(|word| word.to_ascii_lowercase().starts_with(needle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remainder of the usage line once the command name has been typed.
    fn usage_hint(&self, command: &str) -> Option<String> {
        let usage = self.usages.get(command)?;
        let rest = usage.strip_prefix(command).unwrap_or(usage).trim_start();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

struct CommandHelper {
    vocabulary: Vocabulary,
}

impl CommandHelper {
    fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let path = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        let needle = prefix[start..].to_ascii_lowercase();

        let candidates = self
            .vocabulary
            .candidates(&path, &needle)
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let command = line.strip_suffix(' ')?.trim_start();
        if command.is_empty() || command.contains(char::is_whitespace) {
            return None;
        }
        self.vocabulary.usage_hint(&command.to_ascii_lowercase())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if output::current_preferences().color {
            Cow::Owned(hint.dimmed().to_string())
        } else {
            Cow::Borrowed(hint)
        }
    }
}

impl Validator for CommandHelper {
    /// Keeps the line open while a quoted description is unterminated.
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        if has_open_quote(ctx.input()) {
            return Ok(ValidationResult::Invalid(Some(
                "  (aspas não fechadas)".to_string(),
            )));
        }
        Ok(ValidationResult::Valid(None))
    }
}

fn has_open_quote(input: &str) -> bool {
    split(input).is_err()
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|_| ParseError {
        message: format!("unbalanced quotes in `{}`", input),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
