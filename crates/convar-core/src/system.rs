//! The command system: owner of contexts, type proxies and the queue

use crate::commands::{same_command, BaseCommand, CommandArgs, CommandInfo};
use crate::config::{
    CommandSystemConfig, DEFAULT_PROTECTED_CHANGE_STRING, DEFAULT_SHARED_CONTEXT_NAME,
};
use crate::context::{validate_context_name, CommandContext, ContextParts};
use crate::errors::{CommandError, Result};
use crate::format::FormatProvider;
use crate::queue::CommandQueue;
use crate::type_proxies::{TypeProxy, TypeProxyRegistry};
use crate::{log_op_end, log_op_error, log_op_start};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::any::Any;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

/// Name of the built-in command that defers the rest of the queue
pub const WAIT_COMMAND: &str = "wait";

pub(crate) struct SystemState {
    pub(crate) provider: Rc<FormatProvider>,
    pub(crate) protected_change_string: String,
    pub(crate) exec_dir: PathBuf,
    pub(crate) type_proxies: RefCell<TypeProxyRegistry>,
    pub(crate) queue: CommandQueue,
    pub(crate) contexts: RefCell<Vec<CommandContext>>,
    pub(crate) shared_context: CommandContext,
}

/// Registry of contexts, commands and pending command text
///
/// The system owns the root shared context, whose commands every other
/// context sees. The `wait` command is always registered there.
///
/// ```
/// use convar_core::{CommandSystem, FormatProvider, VirtualVariableInfo};
///
/// let system = CommandSystem::new(FormatProvider::default());
/// let server = system.create_context_sharing("Server", &[]).unwrap();
/// let gravity = server
///     .register_variable(VirtualVariableInfo::new("sv_gravity", 800.0f32))
///     .unwrap();
///
/// server.queue_commands("sv_gravity 600").unwrap();
/// system.execute();
/// assert_eq!(gravity.value(), 600.0);
/// ```
pub struct CommandSystem {
    state: Rc<SystemState>,
}

impl CommandSystem {
    /// Create a system with default names and the given formatting
    pub fn new(provider: FormatProvider) -> Self {
        Self::build(
            provider,
            DEFAULT_SHARED_CONTEXT_NAME.to_string(),
            DEFAULT_PROTECTED_CHANGE_STRING.to_string(),
            PathBuf::from("."),
        )
    }

    /// Create a system from configuration
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidContextName` when the configured shared
    /// context name is empty or contains whitespace, and
    /// `CommandError::Config` when the decimal and group separators are equal.
    pub fn with_config(config: &CommandSystemConfig) -> Result<Self> {
        validate_context_name(&config.shared_context_name)?;
        config
            .format
            .validate()
            .map_err(|message| CommandError::Config { message })?;
        Ok(Self::build(
            config.format.clone(),
            config.shared_context_name.clone(),
            config.protected_change_string.clone(),
            config.exec_dir.clone(),
        ))
    }

    fn build(
        provider: FormatProvider,
        shared_context_name: String,
        protected_change_string: String,
        exec_dir: PathBuf,
    ) -> Self {
        let state = Rc::new_cyclic(|weak| {
            let shared_context = CommandContext::from_parts(ContextParts {
                name: shared_context_name,
                tag: None,
                protected_change_string: protected_change_string.clone(),
                commands: IndexMap::new(),
                shared_contexts: Vec::new(),
                system: weak.clone(),
            });
            SystemState {
                provider: Rc::new(provider),
                protected_change_string,
                exec_dir,
                type_proxies: RefCell::new(TypeProxyRegistry::with_builtins()),
                queue: CommandQueue::new(),
                contexts: RefCell::new(vec![shared_context.clone()]),
                shared_context,
            }
        });

        let wait = CommandInfo::new(WAIT_COMMAND, |args: &CommandArgs| {
            args.context().request_wait();
        })
        .with_help_info("Delay execution of remaining commands until the next execution");
        state
            .shared_context
            .insert_unchecked(Rc::new(wait.into_plain_command()));

        Self { state }
    }

    // ===== Type proxies =====

    /// Register the proxy for `T`
    ///
    /// # Errors
    ///
    /// Returns `CommandError::DuplicateTypeProxy` if `T` already has one.
    pub fn add_type_proxy<T: 'static>(&self, proxy: impl TypeProxy<T>) -> Result<()> {
        self.state.type_proxies.borrow_mut().add::<T>(Rc::new(proxy))
    }

    /// Look up the proxy for `T`
    ///
    /// # Errors
    ///
    /// Returns `CommandError::MissingTypeProxy` if none is registered.
    pub fn get_type_proxy<T: 'static>(&self) -> Result<Rc<dyn TypeProxy<T>>> {
        self.state.type_proxies.borrow().get::<T>()
    }

    pub fn format_provider(&self) -> &FormatProvider {
        &self.state.provider
    }

    /// Default text contexts show instead of protected values
    pub fn protected_change_string(&self) -> &str {
        &self.state.protected_change_string
    }

    /// Directory `exec` resolves script names against
    pub fn exec_dir(&self) -> &Path {
        &self.state.exec_dir
    }

    // ===== Contexts =====

    /// The root context shared by every other context
    pub fn shared_context(&self) -> CommandContext {
        self.state.shared_context.clone()
    }

    /// Live contexts, root first, in creation order
    pub fn contexts(&self) -> Vec<CommandContext> {
        self.state.contexts.borrow().clone()
    }

    pub fn find_context(&self, name: &str) -> Option<CommandContext> {
        self.state
            .contexts
            .borrow()
            .iter()
            .find(|context| context.name() == name)
            .cloned()
    }

    /// Create a context sharing the root context and `shared`
    ///
    /// The new context starts with every command of the root and of the
    /// shared contexts, and receives their later registrations.
    /// `protected_change_string` defaults to the system's.
    ///
    /// # Errors
    ///
    /// - `InvalidContextName` / `DuplicateContextName` for a bad name
    /// - `DuplicateSharedContext` if `shared` lists a context twice
    /// - `ForeignContext` / `ContextDestroyed` for unusable shared contexts
    /// - `SharedCommandConflict` if two sources hold different commands
    ///   under one name
    pub fn create_context(
        &self,
        name: &str,
        tag: Option<Rc<dyn Any>>,
        protected_change_string: Option<&str>,
        shared: &[CommandContext],
    ) -> Result<CommandContext> {
        log_op_start!("create_context", context = name, shared = shared.len());
        let start = Instant::now();

        let context = self
            .create_context_impl(name, tag, protected_change_string, shared)
            .map_err(|e| {
                log_op_error!(
                    "create_context",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    context = name
                );
                e
            })?;

        log_op_end!(
            "create_context",
            duration_ms = start.elapsed().as_millis() as u64,
            context = name,
            command_count = context.command_count()
        );
        Ok(context)
    }

    /// Create a context with no tag and the default protected string
    ///
    /// # Errors
    ///
    /// As [`CommandSystem::create_context`].
    pub fn create_context_sharing(
        &self,
        name: &str,
        shared: &[CommandContext],
    ) -> Result<CommandContext> {
        self.create_context(name, None, None, shared)
    }

    fn create_context_impl(
        &self,
        name: &str,
        tag: Option<Rc<dyn Any>>,
        protected_change_string: Option<&str>,
        shared: &[CommandContext],
    ) -> Result<CommandContext> {
        validate_context_name(name)?;
        if self.find_context(name).is_some() {
            return Err(CommandError::DuplicateContextName {
                name: name.to_string(),
            });
        }

        let root = self.shared_context();
        let mut sources = vec![root.clone()];
        for candidate in shared {
            if candidate.is_destroyed() {
                return Err(CommandError::ContextDestroyed {
                    context: candidate.name().to_string(),
                });
            }
            if !candidate.belongs_to(&self.state) {
                return Err(CommandError::ForeignContext {
                    context: candidate.name().to_string(),
                });
            }
            if candidate.same_context(&root) {
                continue;
            }
            if sources.iter().any(|source| source.same_context(candidate)) {
                return Err(CommandError::DuplicateSharedContext {
                    context: name.to_string(),
                    shared: candidate.name().to_string(),
                });
            }
            sources.push(candidate.clone());
        }

        let mut commands: IndexMap<String, Rc<dyn BaseCommand>> = IndexMap::new();
        for source in &sources {
            for command in source.commands() {
                match commands.entry(command.name().to_string()) {
                    Entry::Occupied(existing) => {
                        if !same_command(existing.get(), &command) {
                            return Err(CommandError::SharedCommandConflict {
                                context: name.to_string(),
                                command: command.name().to_string(),
                            });
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(command);
                    }
                }
            }
        }

        let context = CommandContext::from_parts(ContextParts {
            name: name.to_string(),
            tag,
            protected_change_string: protected_change_string
                .unwrap_or(&self.state.protected_change_string)
                .to_string(),
            commands,
            shared_contexts: sources.clone(),
            system: Rc::downgrade(&self.state),
        });

        for source in &sources {
            source.attach_sharer(&context);
        }
        self.state.contexts.borrow_mut().push(context.clone());
        Ok(context)
    }

    /// Destroy a context
    ///
    /// On success the context is removed from the system, its pending
    /// queue entries are dropped, its maps are cleared and every context it
    /// shared from stops mirroring into it.
    ///
    /// # Errors
    ///
    /// - `ContextInUse` while other contexts share it; it stays intact
    /// - `CannotDestroySharedContext` for the root context
    /// - `ForeignContext` / `ContextDestroyed` for unusable handles
    pub fn destroy_context(&self, context: &CommandContext) -> Result<()> {
        destroy_context(&self.state, context)
    }

    // ===== Queue =====

    /// Run queued commands until the queue empties or `wait` is executed
    pub fn execute(&self) {
        self.state.queue.execute();
    }

    /// Number of pending queue entries
    pub fn pending_commands(&self) -> usize {
        self.state.queue.len()
    }

    /// Pending entry texts, front first
    pub fn pending_text(&self) -> Vec<String> {
        self.state.queue.pending_text()
    }
}

impl Default for CommandSystem {
    fn default() -> Self {
        Self::new(FormatProvider::default())
    }
}

pub(crate) fn destroy_context(state: &Rc<SystemState>, context: &CommandContext) -> Result<()> {
    log_op_start!("destroy_context", context = context.name());
    let start = Instant::now();

    destroy_context_impl(state, context).map_err(|e| {
        log_op_error!(
            "destroy_context",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            context = context.name()
        );
        e
    })?;

    log_op_end!(
        "destroy_context",
        duration_ms = start.elapsed().as_millis() as u64,
        context = context.name()
    );
    Ok(())
}

fn destroy_context_impl(state: &Rc<SystemState>, context: &CommandContext) -> Result<()> {
    if !context.belongs_to(state) {
        return Err(CommandError::ForeignContext {
            context: context.name().to_string(),
        });
    }
    if context.is_destroyed() {
        return Err(CommandError::ContextDestroyed {
            context: context.name().to_string(),
        });
    }
    if context.same_context(&state.shared_context) {
        return Err(CommandError::CannotDestroySharedContext {
            context: context.name().to_string(),
        });
    }
    let shared_count = context.shared_count();
    if shared_count > 0 {
        return Err(CommandError::ContextInUse {
            context: context.name().to_string(),
            shared_count,
        });
    }

    state
        .contexts
        .borrow_mut()
        .retain(|live| !live.same_context(context));
    context.tear_down();
    state.queue.remove_context(context);
    Ok(())
}
