//! Command and variable object model
//!
//! Everything addressable by name in a [`CommandContext`] implements
//! [`BaseCommand`]. Two concrete kinds exist:
//!
//! - [`Command`]: an ordered list of executors, optionally preceded by a
//!   typed proxy delegate whose arguments are parsed through type proxies
//! - [`Variable<T>`]: typed state with virtual (owned) or proxy
//!   (getter/setter) storage, change handlers and filters
//!
//! Commands are created from info builders ([`CommandInfo`],
//! [`VirtualVariableInfo`], [`ProxyVariableInfo`]) registered with a context.

pub mod change_event;
pub mod command;
pub mod info;
pub mod proxy_command;
pub mod variable;

use crate::context::CommandContext;
use convar_core_types::CommandFlags;
use std::any::Any;
use std::rc::Rc;

pub use change_event::ChangeEvent;
pub use command::{Command, CommandExecutor};
pub use info::{CommandInfo, ProxyVariableInfo, VirtualVariableInfo};
pub use proxy_command::ProxyDelegate;
pub use variable::{ChangeHandler, ChangeHandlerId, Variable};

/// Type name reported for plain and proxy commands
pub const COMMAND_TYPE_NAME: &str = "command";

/// Behavior shared by all commands and variables
pub trait BaseCommand: 'static {
    fn name(&self) -> &str;

    fn flags(&self) -> CommandFlags;

    /// Opaque flags for the embedding application
    fn user_flags(&self) -> u32;

    fn help_info(&self) -> &str;

    fn tag(&self) -> Option<&Rc<dyn Any>>;

    /// Kind name used in type mismatch reports, e.g. `variable<f32>`
    fn type_name(&self) -> String;

    /// Run the command with console arguments
    fn on_command(&self, args: &CommandArgs);

    /// Append a human readable description of the command
    fn write_command_info(&self, out: &mut String);

    fn as_any(&self) -> &dyn Any;

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;

    /// Untyped variable access, `None` for commands
    fn as_variable(&self) -> Option<&dyn DynVariable> {
        None
    }
}

/// Untyped view of a [`Variable<T>`]
pub trait DynVariable {
    /// Name of the value type, e.g. `f32`
    fn value_type_name(&self) -> &'static str;

    /// Whether console writes are rejected
    fn is_read_only(&self) -> bool;

    fn value_string(&self) -> String;

    fn initial_value_string(&self) -> String;

    /// Parse and assign, logging the change or the parse failure
    fn set_value_string(&self, text: &str);

    fn revert_to_initial_value(&self);
}

/// Read the typed value out of an untyped command handle
///
/// Returns `None` when the command is not a `Variable<T>`.
pub fn value_as<T: Clone + 'static>(command: &dyn BaseCommand) -> Option<T> {
    command
        .as_any()
        .downcast_ref::<Variable<T>>()
        .map(Variable::value)
}

/// Whether two handles refer to the same command instance
pub fn same_command(a: &Rc<dyn BaseCommand>, b: &Rc<dyn BaseCommand>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Properties every command carries
pub(crate) struct CommandCore {
    pub name: String,
    pub flags: CommandFlags,
    pub user_flags: u32,
    pub help_info: String,
    pub tag: Option<Rc<dyn Any>>,
}

/// Arguments of one console statement
#[derive(Clone)]
pub struct CommandArgs {
    name: String,
    arguments: Vec<String>,
    args_text: String,
    context: CommandContext,
}

impl CommandArgs {
    pub fn new(
        context: &CommandContext,
        name: impl Into<String>,
        arguments: Vec<String>,
        args_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            args_text: args_text.into(),
            context: context.clone(),
        }
    }

    /// Parse a single statement such as `sv_gravity 600`
    ///
    /// Returns `None` for blank statements and comments.
    pub fn parse(context: &CommandContext, statement: &str) -> Option<Self> {
        crate::tokenizer::tokenize(statement).map(|parsed| Self {
            name: parsed.name,
            arguments: parsed.arguments,
            args_text: parsed.args_text,
            context: context.clone(),
        })
    }

    /// Name of the command being invoked
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Argument text as typed, quotes included
    pub fn args_text(&self) -> &str {
        &self.args_text
    }

    /// Context the statement was issued in
    pub fn context(&self) -> &CommandContext {
        &self.context
    }
}

impl std::fmt::Debug for CommandArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandArgs")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("context", &self.context.name())
            .finish()
    }
}
