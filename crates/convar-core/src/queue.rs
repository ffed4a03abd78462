//! Deferred command text
//!
//! Text is stored verbatim with the context it was issued in and only
//! tokenized when drained by [`CommandQueue::execute`]. Draining takes one
//! statement at a time and puts the rest of the entry back at the front, so
//! commands can freely queue, insert or `wait` while they run.

use crate::commands::CommandArgs;
use crate::context::CommandContext;
use crate::errors::{CommandError, Result};
use crate::log_console;
use crate::tokenizer::{split_first_statement, tokenize};
use convar_core_types::schema::{EVENT_DEFERRED, EVENT_UNKNOWN_COMMAND};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

#[derive(Clone)]
struct QueueEntry {
    context: CommandContext,
    text: String,
    from_alias: bool,
}

/// Ordered pending command text
#[derive(Default)]
pub struct CommandQueue {
    entries: RefCell<VecDeque<QueueEntry>>,
    wait: Cell<bool>,
    executing: Cell<bool>,
}

/// Clears the executing flag even if a command panics
struct ExecutingGuard<'a>(&'a Cell<bool>);

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

enum StatementOutcome {
    Continue,
    StopTick,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether `execute` is currently draining
    pub fn is_executing(&self) -> bool {
        self.executing.get()
    }

    /// Append text issued in `context`
    pub fn queue_commands(&self, context: &CommandContext, text: impl Into<String>) {
        self.entries.borrow_mut().push_back(QueueEntry {
            context: context.clone(),
            text: text.into(),
            from_alias: false,
        });
    }

    /// Insert text at `index`, 0 being the front
    ///
    /// # Errors
    ///
    /// Returns `CommandError::QueueIndexOutOfRange` when `index` is past the end.
    pub fn insert_commands(
        &self,
        context: &CommandContext,
        text: impl Into<String>,
        index: usize,
    ) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        if index > entries.len() {
            return Err(CommandError::QueueIndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        entries.insert(
            index,
            QueueEntry {
                context: context.clone(),
                text: text.into(),
                from_alias: false,
            },
        );
        Ok(())
    }

    /// Stop draining after the current statement
    pub fn request_wait(&self) {
        self.wait.set(true);
    }

    /// Drop every entry issued in `context`
    pub fn remove_context(&self, context: &CommandContext) {
        self.entries
            .borrow_mut()
            .retain(|entry| !entry.context.same_context(context));
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Pending text in order, for diagnostics
    pub fn pending_text(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }

    /// Run queued statements until the queue empties or a `wait` is requested
    pub fn execute(&self) {
        if self.executing.get() {
            tracing::warn!(
                component = module_path!(),
                op = "execute",
                "Recursive execute() call ignored"
            );
            return;
        }
        self.executing.set(true);
        let _guard = ExecutingGuard(&self.executing);
        self.wait.set(false);

        loop {
            let Some(entry) = self.entries.borrow_mut().pop_front() else {
                break;
            };
            if entry.context.is_destroyed() {
                continue;
            }

            let (statement, rest) = split_first_statement(&entry.text);
            if let Some(rest) = rest.filter(|rest| !rest.trim().is_empty()) {
                self.entries.borrow_mut().push_front(QueueEntry {
                    context: entry.context.clone(),
                    text: rest.to_string(),
                    from_alias: entry.from_alias,
                });
            }

            let outcome = self.execute_statement(&entry.context, statement, entry.from_alias);
            if matches!(outcome, StatementOutcome::StopTick) {
                break;
            }
            if self.wait.replace(false) {
                break;
            }
        }
    }

    fn push_alias_expansion(&self, context: &CommandContext, text: String) {
        self.entries.borrow_mut().push_front(QueueEntry {
            context: context.clone(),
            text,
            from_alias: true,
        });
    }

    fn execute_statement(
        &self,
        context: &CommandContext,
        statement: &str,
        from_alias: bool,
    ) -> StatementOutcome {
        let Some(parsed) = tokenize(statement) else {
            return StatementOutcome::Continue;
        };

        if let Some(alias_text) = context.alias(&parsed.name) {
            self.push_alias_expansion(context, alias_text);
            if from_alias {
                tracing::debug!(
                    component = module_path!(),
                    op = "execute",
                    event = EVENT_DEFERRED,
                    context = context.name(),
                    alias = parsed.name.as_str(),
                    "Nested alias deferred to next execution"
                );
                return StatementOutcome::StopTick;
            }
            return StatementOutcome::Continue;
        }

        match context.find_command_base(&parsed.name) {
            Some(command) => {
                let args = CommandArgs::new(
                    context,
                    parsed.name,
                    parsed.arguments,
                    parsed.args_text,
                );
                command.on_command(&args);
            }
            None => {
                log_console!(
                    "execute",
                    EVENT_UNKNOWN_COMMAND,
                    context = context.name();
                    "Unknown command \"{}\"",
                    parsed.name
                );
            }
        }
        StatementOutcome::Continue
    }
}
