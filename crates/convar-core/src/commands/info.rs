//! Registration builders for commands and variables
//!
//! Infos are plain values: nothing is validated until the info is passed to
//! a context's `register_*` method.

use super::command::{BoundProxyBinder, Command, CommandExecutor};
use super::proxy_command::{bind_proxy, ProxyDelegate};
use super::variable::{ChangeHandler, Getter, Setter, Storage};
use super::{ChangeEvent, CommandArgs, CommandCore};
use crate::filters::VariableFilters;
use crate::format::FormatProvider;
use crate::type_proxies::{TypeProxy, TypeProxyRegistry};
use convar_core_types::CommandFlags;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Builder methods shared by every info type
macro_rules! common_info_builders {
    ($info:ident $(<$param:ident>)?) => {
        impl$(<$param: Clone + 'static>)? $info$(<$param>)? {
            pub fn name(&self) -> &str {
                &self.core.name
            }

            pub fn with_help_info(mut self, help_info: impl Into<String>) -> Self {
                self.core.help_info = help_info.into();
                self
            }

            /// Add flags to the ones already set
            pub fn with_flags(mut self, flags: CommandFlags) -> Self {
                self.core.flags |= flags;
                self
            }

            pub fn with_user_flags(mut self, user_flags: u32) -> Self {
                self.core.user_flags = user_flags;
                self
            }

            pub fn with_tag(mut self, tag: Rc<dyn Any>) -> Self {
                self.core.tag = Some(tag);
                self
            }
        }
    };
}

fn core_for(name: String) -> CommandCore {
    CommandCore {
        name,
        flags: CommandFlags::empty(),
        user_flags: 0,
        help_info: String::new(),
        tag: None,
    }
}

/// Describes a command to register
///
/// ```
/// use convar_core::commands::CommandInfo;
///
/// let info = CommandInfo::new("quit", |_args| {})
///     .with_help_info("Exit the game");
/// # let _ = info;
/// ```
pub struct CommandInfo {
    pub(crate) core: CommandCore,
    pub(crate) executors: Vec<CommandExecutor>,
    pub(crate) proxy: Option<BoundProxyBinder>,
}

impl CommandInfo {
    /// A plain command with one executor
    pub fn new<F>(name: impl Into<String>, executor: F) -> Self
    where
        F: Fn(&CommandArgs) + 'static,
    {
        Self {
            core: core_for(name.into()),
            executors: vec![Rc::new(executor)],
            proxy: None,
        }
    }

    /// A command bound to a typed delegate
    ///
    /// Console arguments are converted with the type proxies of the
    /// delegate's parameters, which must be registered when the command is.
    ///
    /// ```
    /// use convar_core::commands::CommandInfo;
    ///
    /// let info = CommandInfo::proxy("teleport", |x: f32, y: f32, z: f32| {
    ///     let _ = (x, y, z);
    /// });
    /// # let _ = info;
    /// ```
    pub fn proxy<F, Args>(name: impl Into<String>, delegate: F) -> Self
    where
        F: ProxyDelegate<Args>,
        Args: 'static,
    {
        Self {
            core: core_for(name.into()),
            executors: Vec::new(),
            proxy: Some(Box::new(
                move |registry: &TypeProxyRegistry, provider: Rc<FormatProvider>| {
                    bind_proxy::<F, Args>(delegate, registry, provider)
                },
            )),
        }
    }

    /// Add an executor, run after the existing ones
    pub fn with_callback<F>(mut self, executor: F) -> Self
    where
        F: Fn(&CommandArgs) + 'static,
    {
        self.executors.push(Rc::new(executor));
        self
    }

    /// Build the command ignoring any proxy delegate
    pub(crate) fn into_plain_command(self) -> Command {
        Command::new(self.core, None, self.executors)
    }
}

common_info_builders!(CommandInfo);

/// Settings shared by virtual and proxy variable infos
pub(crate) struct VariableSettings<T: Clone + 'static> {
    pub handlers: Vec<ChangeHandler<T>>,
    pub filters: Option<VariableFilters<T>>,
    pub type_proxy: Option<Rc<dyn TypeProxy<T>>>,
}

impl<T: Clone + 'static> Default for VariableSettings<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            filters: None,
            type_proxy: None,
        }
    }
}

/// Builder methods for variable infos
macro_rules! variable_info_builders {
    ($info:ident) => {
        impl<T: Clone + 'static> $info<T> {
            /// Add a change handler, run after filters and earlier handlers
            pub fn with_change_handler<F>(mut self, handler: F) -> Self
            where
                F: Fn(&mut ChangeEvent<'_, T>) + 'static,
            {
                self.settings.handlers.push(Rc::new(handler));
                self
            }

            /// Use `proxy` instead of the system's proxy for `T`
            pub fn with_type_proxy(mut self, proxy: Rc<dyn TypeProxy<T>>) -> Self {
                self.settings.type_proxy = Some(proxy);
                self
            }

            /// Add filters, appended after any configured earlier
            pub fn configure_filters<F>(mut self, configure: F) -> Self
            where
                F: FnOnce(VariableFilters<T>) -> VariableFilters<T>,
            {
                let filters = self.settings.filters.take().unwrap_or_default();
                self.settings.filters = Some(configure(filters));
                self
            }
        }
    };
}

/// Describes a variable whose value is owned by the variable
///
/// ```
/// use convar_core::commands::VirtualVariableInfo;
///
/// let info = VirtualVariableInfo::new("sv_gravity", 800.0f32)
///     .with_help_info("World gravity");
/// # let _ = info;
/// ```
pub struct VirtualVariableInfo<T: Clone + 'static> {
    pub(crate) core: CommandCore,
    pub(crate) value: T,
    pub(crate) read_only: bool,
    pub(crate) settings: VariableSettings<T>,
}

impl<T: Clone + 'static> VirtualVariableInfo<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            core: core_for(name.into()),
            value,
            read_only: false,
            settings: VariableSettings::default(),
        }
    }

    /// Reject console writes; programmatic writes still succeed
    pub fn make_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub(crate) fn into_parts(self) -> (CommandCore, Storage<T>, VariableSettings<T>) {
        let storage = Storage::Virtual {
            value: RefCell::new(self.value),
            read_only: self.read_only,
        };
        (self.core, storage, self.settings)
    }
}

common_info_builders!(VirtualVariableInfo<T>);
variable_info_builders!(VirtualVariableInfo);

/// Describes a variable whose value lives in another object
///
/// The getter is read on every access. Without a setter the variable is
/// read-only for every writer.
///
/// ```
/// use convar_core::commands::ProxyVariableInfo;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// struct Player { health: i32 }
///
/// let player = Rc::new(RefCell::new(Player { health: 100 }));
/// let info = ProxyVariableInfo::bind(
///     "health",
///     &player,
///     |p| p.health,
///     |p, value| p.health = value,
/// );
/// # let _ = info;
/// ```
pub struct ProxyVariableInfo<T: Clone + 'static> {
    pub(crate) core: CommandCore,
    pub(crate) getter: Getter<T>,
    pub(crate) setter: Option<Setter<T>>,
    pub(crate) settings: VariableSettings<T>,
}

impl<T: Clone + 'static> ProxyVariableInfo<T> {
    /// A variable read and written through closures
    pub fn new<G, S>(name: impl Into<String>, getter: G, setter: S) -> Self
    where
        G: Fn() -> T + 'static,
        S: Fn(T) + 'static,
    {
        Self {
            core: core_for(name.into()),
            getter: Box::new(getter),
            setter: Some(Box::new(setter)),
            settings: VariableSettings::default(),
        }
    }

    /// A variable that can only be read
    pub fn read_only<G>(name: impl Into<String>, getter: G) -> Self
    where
        G: Fn() -> T + 'static,
    {
        Self {
            core: core_for(name.into()),
            getter: Box::new(getter),
            setter: None,
            settings: VariableSettings::default(),
        }
    }

    /// A variable bound to a member of a shared object
    pub fn bind<O, G, S>(name: impl Into<String>, target: &Rc<RefCell<O>>, get: G, set: S) -> Self
    where
        O: 'static,
        G: Fn(&O) -> T + 'static,
        S: Fn(&mut O, T) + 'static,
    {
        let read_target = Rc::clone(target);
        let write_target = Rc::clone(target);
        Self::new(
            name,
            move || get(&*read_target.borrow()),
            move |value| set(&mut *write_target.borrow_mut(), value),
        )
    }

    /// A read-only variable bound to a member of a shared object
    pub fn bind_read_only<O, G>(name: impl Into<String>, target: &Rc<RefCell<O>>, get: G) -> Self
    where
        O: 'static,
        G: Fn(&O) -> T + 'static,
    {
        let read_target = Rc::clone(target);
        Self::read_only(name, move || get(&*read_target.borrow()))
    }

    pub(crate) fn into_parts(self) -> (CommandCore, Storage<T>, VariableSettings<T>) {
        let storage = Storage::Proxy {
            getter: self.getter,
            setter: self.setter,
        };
        (self.core, storage, self.settings)
    }
}

common_info_builders!(ProxyVariableInfo<T>);
variable_info_builders!(ProxyVariableInfo);
