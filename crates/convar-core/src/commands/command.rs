//! Plain and proxy-bound commands

use super::{BaseCommand, CommandArgs, CommandCore, COMMAND_TYPE_NAME};
use crate::errors::Result;
use crate::format::FormatProvider;
use crate::type_proxies::TypeProxyRegistry;
use convar_core_types::CommandFlags;
use std::any::Any;
use std::rc::Rc;

/// Callback run when a command is invoked
pub type CommandExecutor = Rc<dyn Fn(&CommandArgs)>;

/// A command made of executors run in registration order
///
/// A proxy command additionally holds a bound delegate which runs before the
/// executors. The delegate is skipped, with a log line, when the arguments do
/// not match its signature; the executors still run.
pub struct Command {
    core: CommandCore,
    proxy: Option<BoundProxy>,
    executors: Vec<CommandExecutor>,
}

/// Deferred proxy binding, run when the command is registered
pub(crate) type BoundProxyBinder =
    Box<dyn FnOnce(&TypeProxyRegistry, Rc<FormatProvider>) -> Result<BoundProxy>>;

pub(crate) struct BoundProxy {
    pub signature: String,
    pub executor: CommandExecutor,
}

impl Command {
    pub(crate) fn new(
        core: CommandCore,
        proxy: Option<BoundProxy>,
        executors: Vec<CommandExecutor>,
    ) -> Self {
        Self {
            core,
            proxy,
            executors,
        }
    }

    /// Whether a typed delegate is bound to this command
    pub fn is_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Parameter types of the bound delegate, e.g. `(f32, String)`
    pub fn proxy_signature(&self) -> Option<&str> {
        self.proxy.as_ref().map(|p| p.signature.as_str())
    }

    pub fn executor_count(&self) -> usize {
        self.executors.len()
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.core.name)
            .field("flags", &self.core.flags)
            .finish()
    }
}

impl BaseCommand for Command {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn flags(&self) -> CommandFlags {
        self.core.flags
    }

    fn user_flags(&self) -> u32 {
        self.core.user_flags
    }

    fn help_info(&self) -> &str {
        &self.core.help_info
    }

    fn tag(&self) -> Option<&Rc<dyn Any>> {
        self.core.tag.as_ref()
    }

    fn type_name(&self) -> String {
        COMMAND_TYPE_NAME.to_string()
    }

    fn on_command(&self, args: &CommandArgs) {
        if let Some(proxy) = &self.proxy {
            (proxy.executor)(args);
        }
        for executor in &self.executors {
            executor(args);
        }
    }

    fn write_command_info(&self, out: &mut String) {
        out.push('"');
        out.push_str(&self.core.name);
        out.push('"');
        match self.proxy_signature() {
            Some(signature) => {
                out.push_str(" (proxy command ");
                out.push_str(signature);
                out.push(')');
            }
            None => out.push_str(" (command)"),
        }
        if !self.core.flags.is_empty() {
            out.push_str(" flags: ");
            out.push_str(&self.core.flags.names().join(", "));
        }
        if !self.core.help_info.is_empty() {
            out.push_str("\n  ");
            out.push_str(&self.core.help_info);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
