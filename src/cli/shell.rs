use std::{
    collections::BTreeMap,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;

/// Environment variable that switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "BUDGET_MANAGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            let mut source = Prompt::new(context.completion_table())?;
            output::info("Type `help` to list commands.");
            drive(&mut context, &mut source)
        }
        CliMode::Script => drive(&mut context, &mut Script::new(io::stdin().lock())),
    }
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// Where the shell reads its commands from.
trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct Prompt {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl Prompt {
    fn new(table: BTreeMap<String, Vec<String>>) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper { table }));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for Prompt {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads commands line by line without prompting.
struct Script<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> Script<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for Script<R> {
    fn next_line(&mut self, _prompt: &str) -> Result<Input, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::Closed),
        }
    }
}

/// Runs commands until the source closes or a command ends the shell.
/// Blank lines and `#` comments are skipped.
fn drive(context: &mut ShellContext, source: &mut impl LineSource) -> Result<(), CliError> {
    while context.running {
        let line = match source.next_line(&context.prompt())? {
            Input::Line(line) => line,
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Input::Closed => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match context.process_line(trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

/// Completes command names, then the action names of grouped commands.
struct CommandHelper {
    table: BTreeMap<String, Vec<String>>,
}

impl CommandHelper {
    fn candidates(&self, before: &str, needle: &str) -> Vec<String> {
        let words: Vec<&str> = before.split_whitespace().collect();
        let options: Vec<&String> = match words.as_slice() {
            [] => self.table.keys().collect(),
            [command] => self
                .table
                .get(&command.to_ascii_lowercase())
                .map(|actions| actions.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        options
            .into_iter()
            .filter(|option| option.starts_with(needle))
            .cloned()
            .collect()
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
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .candidates(&prefix[..start], &needle)
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
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}
