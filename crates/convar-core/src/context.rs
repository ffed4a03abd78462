//! Command contexts
//!
//! A context is a namespace of commands and aliases. Every context shares
//! the system's root context, and may share further contexts given at
//! creation. Sharing copies the sources' commands once and then mirrors every
//! later registration in a source into the sharer (transitively, never back).
//! A context cannot be destroyed while another context shares it.

use crate::commands::{
    same_command, BaseCommand, ChangeEvent, ChangeHandler, Command, CommandInfo,
    ProxyVariableInfo, Variable, VirtualVariableInfo, COMMAND_TYPE_NAME,
};
use crate::commands::command::BoundProxy;
use crate::commands::info::VariableSettings;
use crate::commands::variable::Storage;
use crate::commands::CommandCore;
use crate::errors::{CommandError, Result};
use crate::filters::VariableFilter;
use crate::system::SystemState;
use convar_core_types::schema::EVENT_COMMAND_ADDED;
use indexmap::IndexMap;
use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Handle to a context; clones refer to the same context
#[derive(Clone)]
pub struct CommandContext {
    inner: Rc<ContextInner>,
}

pub(crate) struct ContextInner {
    name: String,
    tag: Option<Rc<dyn Any>>,
    protected_change_string: String,
    commands: RefCell<IndexMap<String, Rc<dyn BaseCommand>>>,
    aliases: RefCell<IndexMap<String, String>>,
    /// Contexts this one shares from, root first
    shared_contexts: RefCell<Vec<CommandContext>>,
    /// Number of live contexts sharing this one
    shared_count: Cell<usize>,
    /// Contexts receiving this context's registrations
    mirror_targets: RefCell<Vec<Weak<ContextInner>>>,
    system: Weak<SystemState>,
    destroyed: Cell<bool>,
}

pub(crate) struct ContextParts {
    pub name: String,
    pub tag: Option<Rc<dyn Any>>,
    pub protected_change_string: String,
    pub commands: IndexMap<String, Rc<dyn BaseCommand>>,
    pub shared_contexts: Vec<CommandContext>,
    pub system: Weak<SystemState>,
}

/// Check a context name: non-empty, no whitespace
pub(crate) fn validate_context_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(CommandError::InvalidContextName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Check a command name: non-empty, no whitespace, `;` or `"`
pub fn validate_command_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else if name.contains(';') {
        "name must not contain ';'"
    } else if name.contains('"') {
        "name must not contain '\"'"
    } else {
        return Ok(());
    };
    Err(CommandError::InvalidCommandName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

fn variable_type_name<T>() -> String {
    format!("variable<{}>", type_name::<T>())
}

fn filter_handler<T: Clone + 'static>(filter: impl VariableFilter<T>) -> ChangeHandler<T> {
    Rc::new(move |event: &mut ChangeEvent<'_, T>| {
        if !filter.filter(event) {
            event.veto();
        }
    })
}

impl CommandContext {
    pub(crate) fn from_parts(parts: ContextParts) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                name: parts.name,
                tag: parts.tag,
                protected_change_string: parts.protected_change_string,
                commands: RefCell::new(parts.commands),
                aliases: RefCell::new(IndexMap::new()),
                shared_contexts: RefCell::new(parts.shared_contexts),
                shared_count: Cell::new(0),
                mirror_targets: RefCell::new(Vec::new()),
                system: parts.system,
                destroyed: Cell::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn tag(&self) -> Option<&Rc<dyn Any>> {
        self.inner.tag.as_ref()
    }

    /// Text shown instead of protected variable values in change logs
    pub fn protected_change_string(&self) -> &str {
        &self.inner.protected_change_string
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Number of live contexts sharing this one
    pub fn shared_count(&self) -> usize {
        self.inner.shared_count.get()
    }

    /// Contexts this one shares from, root first
    pub fn shared_contexts(&self) -> Vec<CommandContext> {
        self.inner.shared_contexts.borrow().clone()
    }

    /// Whether both handles refer to the same context
    pub fn same_context(&self, other: &CommandContext) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn belongs_to(&self, state: &Rc<SystemState>) -> bool {
        std::ptr::eq(self.inner.system.as_ptr(), Rc::as_ptr(state))
    }

    pub(crate) fn system_state(&self) -> Result<Rc<SystemState>> {
        self.inner
            .system
            .upgrade()
            .ok_or_else(|| CommandError::SystemUnavailable {
                context: self.inner.name.clone(),
            })
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(CommandError::ContextDestroyed {
                context: self.inner.name.clone(),
            });
        }
        Ok(())
    }

    // ===== Lookup =====

    /// All commands in registration order
    pub fn commands(&self) -> Vec<Rc<dyn BaseCommand>> {
        self.inner.commands.borrow().values().cloned().collect()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.inner.commands.borrow().keys().cloned().collect()
    }

    pub fn command_count(&self) -> usize {
        self.inner.commands.borrow().len()
    }

    pub fn contains_command(&self, name: &str) -> bool {
        self.inner.commands.borrow().contains_key(name)
    }

    /// Look up a command of any kind
    pub fn find_command_base(&self, name: &str) -> Option<Rc<dyn BaseCommand>> {
        self.inner.commands.borrow().get(name).cloned()
    }

    /// Look up a command of a specific kind
    ///
    /// Returns `None` when the name is unknown or registered as another kind.
    pub fn find_command<C: BaseCommand>(&self, name: &str) -> Option<Rc<C>> {
        self.find_command_base(name)?.into_any_rc().downcast::<C>().ok()
    }

    pub fn find_variable<T: Clone + 'static>(&self, name: &str) -> Option<Rc<Variable<T>>> {
        self.find_command::<Variable<T>>(name)
    }

    /// Case-insensitive search over names and optionally help text
    ///
    /// `*` matches every command; a blank keyword matches none.
    pub fn find_commands(&self, keyword: &str, search_help: bool) -> Vec<Rc<dyn BaseCommand>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }
        let needle = keyword.to_lowercase();
        self.commands()
            .into_iter()
            .filter(|command| {
                keyword == "*"
                    || command.name().to_lowercase().contains(&needle)
                    || (search_help && command.help_info().to_lowercase().contains(&needle))
            })
            .collect()
    }

    // ===== Aliases =====

    /// Aliases in definition order
    pub fn aliases(&self) -> Vec<(String, String)> {
        self.inner
            .aliases
            .borrow()
            .iter()
            .map(|(name, text)| (name.clone(), text.clone()))
            .collect()
    }

    pub fn alias(&self, name: &str) -> Option<String> {
        self.inner.aliases.borrow().get(name).cloned()
    }

    /// Define an alias, or remove it when `text` is blank
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidAliasName` when the name is blank or
    /// contains whitespace, and `CommandError::ContextDestroyed` for a
    /// destroyed context.
    pub fn set_alias(&self, name: &str, text: &str) -> Result<()> {
        self.ensure_live()?;
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(CommandError::InvalidAliasName {
                name: name.to_string(),
            });
        }

        let mut aliases = self.inner.aliases.borrow_mut();
        if text.trim().is_empty() {
            aliases.shift_remove(name);
        } else {
            aliases.insert(name.to_string(), text.to_string());
        }
        Ok(())
    }

    // ===== Registration =====

    /// Register a plain or proxy command
    ///
    /// Registering a name that already holds a command returns the existing
    /// command unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidCommandName` for empty names or names with separators
    /// - `CommandTypeMismatch` if the name holds a variable
    /// - `MissingTypeProxy` if a proxy delegate parameter has no proxy
    /// - `SharedCommandConflict` if a sharing context holds another command
    ///   under the name
    pub fn register_command(&self, info: CommandInfo) -> Result<Rc<Command>> {
        let CommandInfo {
            core,
            executors,
            proxy,
        } = info;
        let name = core.name.clone();

        self.register_with(&name, || COMMAND_TYPE_NAME.to_string(), move |system| {
            let proxy: Option<BoundProxy> = match proxy {
                Some(bind) => {
                    let registry = system.type_proxies.borrow();
                    Some(bind(&*registry, system.provider.clone())?)
                }
                None => None,
            };
            Ok(Command::new(core, proxy, executors))
        })
    }

    /// Register a variable owning its value
    ///
    /// # Errors
    ///
    /// As [`CommandContext::register_command`], plus `InvalidFilter` when a
    /// configured filter could not be built.
    pub fn register_variable<T: Clone + 'static>(
        &self,
        info: VirtualVariableInfo<T>,
    ) -> Result<Rc<Variable<T>>> {
        let (core, storage, settings) = info.into_parts();
        self.register_variable_parts(core, storage, settings)
    }

    /// Register a variable backed by getter/setter accessors
    ///
    /// The initial value is read through the getter now.
    ///
    /// # Errors
    ///
    /// As [`CommandContext::register_variable`].
    pub fn register_proxy_variable<T: Clone + 'static>(
        &self,
        info: ProxyVariableInfo<T>,
    ) -> Result<Rc<Variable<T>>> {
        let (core, storage, settings) = info.into_parts();
        self.register_variable_parts(core, storage, settings)
    }

    fn register_variable_parts<T: Clone + 'static>(
        &self,
        core: CommandCore,
        storage: Storage<T>,
        settings: VariableSettings<T>,
    ) -> Result<Rc<Variable<T>>> {
        let name = core.name.clone();
        let protected_change_string = self.inner.protected_change_string.clone();

        self.register_with(&name, variable_type_name::<T>, move |system| {
            let proxy = match settings.type_proxy {
                Some(proxy) => proxy,
                None => system.type_proxies.borrow().get::<T>()?,
            };

            let mut handlers = Vec::with_capacity(settings.handlers.len() + 1);
            if let Some(filters) = settings.filters {
                let aggregate = filters.build()?;
                if !aggregate.is_empty() {
                    handlers.push(filter_handler(aggregate));
                }
            }
            handlers.extend(settings.handlers);

            Ok(Variable::new(
                core,
                storage,
                proxy,
                system.provider.clone(),
                protected_change_string,
                handlers,
            ))
        })
    }

    fn register_with<C, R, B>(&self, name: &str, requested: R, build: B) -> Result<Rc<C>>
    where
        C: BaseCommand,
        R: FnOnce() -> String,
        B: FnOnce(&SystemState) -> Result<C>,
    {
        self.ensure_live()?;
        validate_command_name(name)?;

        if let Some(existing) = self.find_command_base(name) {
            let existing_type = existing.type_name();
            return existing
                .into_any_rc()
                .downcast::<C>()
                .map_err(|_| CommandError::CommandTypeMismatch {
                    name: name.to_string(),
                    existing: existing_type,
                    requested: requested(),
                });
        }

        let system = self.system_state()?;
        let command = Rc::new(build(&system)?);
        self.add_command(command.clone())?;
        Ok(command)
    }

    /// Insert into this context and every context mirroring it
    ///
    /// Nothing is inserted if any target holds a different command under
    /// the same name.
    fn add_command(&self, command: Rc<dyn BaseCommand>) -> Result<()> {
        let name = command.name().to_string();
        let mut targets = vec![self.clone()];
        targets.extend(self.collect_mirror_targets());

        for target in &targets {
            if let Some(existing) = target.inner.commands.borrow().get(&name) {
                if !same_command(existing, &command) {
                    return Err(CommandError::SharedCommandConflict {
                        context: target.name().to_string(),
                        command: name,
                    });
                }
            }
        }

        for target in &targets {
            target
                .inner
                .commands
                .borrow_mut()
                .entry(name.clone())
                .or_insert_with(|| command.clone());
        }

        tracing::debug!(
            component = module_path!(),
            op = "add_command",
            event = EVENT_COMMAND_ADDED,
            context = self.name(),
            command = name.as_str(),
            kind = command.type_name().as_str(),
            mirrored = targets.len() - 1,
        );
        Ok(())
    }

    /// Live contexts reached through mirror links, each once
    fn collect_mirror_targets(&self) -> Vec<CommandContext> {
        let mut found: Vec<CommandContext> = Vec::new();
        let mut pending = vec![self.clone()];

        while let Some(current) = pending.pop() {
            for weak in current.inner.mirror_targets.borrow().iter() {
                let Some(inner) = weak.upgrade() else {
                    continue;
                };
                let target = CommandContext { inner };
                if target.is_destroyed()
                    || target.same_context(self)
                    || found.iter().any(|known| known.same_context(&target))
                {
                    continue;
                }
                found.push(target.clone());
                pending.push(target);
            }
        }
        found
    }

    // ===== Sharing =====

    pub(crate) fn attach_sharer(&self, sharer: &CommandContext) {
        self.inner
            .mirror_targets
            .borrow_mut()
            .push(Rc::downgrade(&sharer.inner));
        self.inner.shared_count.set(self.inner.shared_count.get() + 1);
    }

    pub(crate) fn detach_sharer(&self, sharer: &CommandContext) {
        self.inner.mirror_targets.borrow_mut().retain(|weak| {
            weak.upgrade()
                .is_some_and(|inner| !Rc::ptr_eq(&inner, &sharer.inner))
        });
        self.inner
            .shared_count
            .set(self.inner.shared_count.get().saturating_sub(1));
    }

    /// Mark destroyed and release everything the context holds
    pub(crate) fn tear_down(&self) {
        self.inner.destroyed.set(true);
        let sources = std::mem::take(&mut *self.inner.shared_contexts.borrow_mut());
        for source in &sources {
            source.detach_sharer(self);
        }
        self.inner.mirror_targets.borrow_mut().clear();
        self.inner.commands.borrow_mut().clear();
        self.inner.aliases.borrow_mut().clear();
    }

    /// Insert a command without validation or mirroring
    pub(crate) fn insert_unchecked(&self, command: Rc<dyn BaseCommand>) {
        self.inner
            .commands
            .borrow_mut()
            .insert(command.name().to_string(), command);
    }

    // ===== Queue =====

    /// Append command text to the system queue
    ///
    /// # Errors
    ///
    /// Returns `ContextDestroyed` for a destroyed context and
    /// `SystemUnavailable` once the system is gone.
    pub fn queue_commands(&self, text: &str) -> Result<()> {
        self.ensure_live()?;
        self.system_state()?.queue.queue_commands(self, text);
        Ok(())
    }

    /// Insert command text into the system queue at `index`
    ///
    /// # Errors
    ///
    /// As [`CommandContext::queue_commands`], plus `QueueIndexOutOfRange`.
    pub fn insert_commands(&self, text: &str, index: usize) -> Result<()> {
        self.ensure_live()?;
        self.system_state()?.queue.insert_commands(self, text, index)
    }

    /// Stop the current `execute` after the running statement
    pub fn request_wait(&self) {
        if let Ok(system) = self.system_state() {
            system.queue.request_wait();
        }
    }

    /// Destroy this context
    ///
    /// # Errors
    ///
    /// See [`crate::CommandSystem::destroy_context`].
    pub fn dispose(&self) -> Result<()> {
        let system = self.system_state()?;
        crate::system::destroy_context(&system, self)
    }
}

impl PartialEq for CommandContext {
    fn eq(&self, other: &Self) -> bool {
        self.same_context(other)
    }
}

impl Eq for CommandContext {}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("name", &self.inner.name)
            .field("commands", &self.command_count())
            .field("shared_count", &self.shared_count())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
