//! Command table.
//!
//! A command either takes its arguments directly (`retire 65`) or routes the
//! first argument to a named action (`income add Salary 5000`). Actions carry
//! their aliases and argument counts, so handlers receive only the arguments
//! that follow the action word, already counted.

use std::collections::{BTreeMap, HashMap};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Any,
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => count == expected,
            Arity::Any => true,
        }
    }
}

pub struct Action {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub args: &'static str,
    pub arity: Arity,
    pub handler: CommandHandler,
}

impl Action {
    pub const fn new(
        name: &'static str,
        args: &'static str,
        arity: Arity,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            args,
            arity,
            handler,
        }
    }

    pub const fn aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.contains(&word)
    }

    fn usage(&self, command: &str) -> String {
        if self.args.is_empty() {
            format!("{} {}", command, self.name)
        } else {
            format!("{} {} {}", command, self.name, self.args)
        }
    }
}

enum Route {
    Direct {
        usage: &'static str,
        handler: CommandHandler,
    },
    Actions {
        bare: Option<CommandHandler>,
        actions: Vec<Action>,
    },
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    route: Route,
}

impl CommandEntry {
    pub fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            route: Route::Direct { usage, handler },
        }
    }

    pub fn group(name: &'static str, description: &'static str, actions: Vec<Action>) -> Self {
        Self {
            name,
            description,
            route: Route::Actions {
                bare: None,
                actions,
            },
        }
    }

    /// Runs `handler` when the command is given without an action.
    pub fn when_bare(mut self, handler: CommandHandler) -> Self {
        if let Route::Actions { bare, .. } = &mut self.route {
            *bare = Some(handler);
        }
        self
    }

    pub fn usage_lines(&self) -> Vec<String> {
        match &self.route {
            Route::Direct { usage, .. } => usage.lines().map(|line| line.to_string()).collect(),
            Route::Actions { bare, actions } => bare
                .map(|_| self.name.to_string())
                .into_iter()
                .chain(actions.iter().map(|action| action.usage(self.name)))
                .collect(),
        }
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        match &self.route {
            Route::Direct { .. } => Vec::new(),
            Route::Actions { actions, .. } => actions.iter().map(|action| action.name).collect(),
        }
    }

    /// Picks the handler for `args` and the arguments it should receive.
    pub fn resolve<'a, 'b>(
        &self,
        args: &'a [&'b str],
    ) -> Result<(CommandHandler, &'a [&'b str]), CommandError> {
        let (bare, actions) = match &self.route {
            Route::Direct { handler, .. } => return Ok((*handler, args)),
            Route::Actions { bare, actions } => (bare, actions),
        };
        let Some((word, rest)) = args.split_first() else {
            return bare
                .map(|handler| (handler, args))
                .ok_or_else(|| CommandError::usage(&self.usage_lines().join("\n       ")));
        };
        let word = word.to_lowercase();
        let Some(action) = actions.iter().find(|action| action.matches(&word)) else {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` has no action `{}`; expected one of: {}",
                self.name,
                word,
                self.action_names().join(", ")
            )));
        };
        if !action.arity.accepts(rest.len()) {
            return Err(CommandError::usage(&action.usage(self.name)));
        }
        Ok((action.handler, rest))
    }
}

/// Commands keyed by name, listed in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later entry with the same name replaces the earlier one in place.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.index.get(entry.name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Command names mapped to their action names, for tab completion.
    pub fn completion_table(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|entry| {
                let actions = entry
                    .action_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (entry.name.to_string(), actions)
            })
            .collect()
    }
}
