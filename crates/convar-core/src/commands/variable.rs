//! Typed console variables

use super::change_event::ChangeEvent;
use super::{BaseCommand, CommandArgs, CommandCore, DynVariable};
use crate::format::FormatProvider;
use crate::log_console;
use crate::type_proxies::TypeProxy;
use convar_core_types::schema::{
    EVENT_PARSE_FAILED, EVENT_READ_ONLY, EVENT_USAGE, EVENT_VALUE_CHANGED, EVENT_VALUE_QUERY,
};
use convar_core_types::{CommandFlags, Redacted};
use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Callback notified of every assignment to a variable
pub type ChangeHandler<T> = Rc<dyn Fn(&mut ChangeEvent<'_, T>)>;

/// Handle returned by [`Variable::on_change`], used to remove the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeHandlerId(u64);

pub(crate) type Getter<T> = Box<dyn Fn() -> T>;
pub(crate) type Setter<T> = Box<dyn Fn(T)>;

pub(crate) enum Storage<T> {
    /// Value owned by the variable
    Virtual { value: RefCell<T>, read_only: bool },
    /// Value owned elsewhere, reached through accessors
    Proxy {
        getter: Getter<T>,
        setter: Option<Setter<T>>,
    },
}

/// A named value of type `T` settable from the console
///
/// Assignment protocol:
/// 1. a proxy variable without a setter rejects every write
/// 2. the new value is written, then change handlers run in registration
///    order (filters first); the first veto stops the chain
/// 3. a veto restores the old value silently
/// 4. otherwise a changed value is logged unless the variable is
///    `UNLOGGED` or the write was silent; `PROTECTED` values are masked
pub struct Variable<T: Clone + 'static> {
    core: CommandCore,
    storage: Storage<T>,
    initial_value: T,
    proxy: Rc<dyn TypeProxy<T>>,
    provider: Rc<FormatProvider>,
    protected_change_string: String,
    handlers: RefCell<Vec<(ChangeHandlerId, ChangeHandler<T>)>>,
    next_handler_id: Cell<u64>,
}

impl<T: Clone + 'static> Variable<T> {
    pub(crate) fn new(
        core: CommandCore,
        storage: Storage<T>,
        proxy: Rc<dyn TypeProxy<T>>,
        provider: Rc<FormatProvider>,
        protected_change_string: String,
        handlers: Vec<ChangeHandler<T>>,
    ) -> Self {
        let initial_value = read_storage(&storage);
        let handlers = handlers
            .into_iter()
            .enumerate()
            .map(|(index, handler)| (ChangeHandlerId(index as u64), handler))
            .collect::<Vec<_>>();
        let next_handler_id = Cell::new(handlers.len() as u64);
        Self {
            core,
            storage,
            initial_value,
            proxy,
            provider,
            protected_change_string,
            handlers: RefCell::new(handlers),
            next_handler_id,
        }
    }

    /// Current value, read through the getter for proxy variables
    pub fn value(&self) -> T {
        read_storage(&self.storage)
    }

    /// Value captured at registration
    pub fn initial_value(&self) -> &T {
        &self.initial_value
    }

    /// Assign a value and log the change
    pub fn set_value(&self, value: T) {
        self.assign(value, true);
    }

    /// Assign a value without logging the change
    pub fn set_value_silent(&self, value: T) {
        self.assign(value, false);
    }

    pub fn value_string(&self) -> String {
        self.proxy.format(&self.value(), &self.provider)
    }

    pub fn initial_value_string(&self) -> String {
        self.proxy.format(&self.initial_value, &self.provider)
    }

    /// Parse `text` with the type proxy and assign it
    ///
    /// A parse failure is logged and leaves the variable untouched.
    pub fn set_value_string(&self, text: &str) {
        match self.proxy.try_parse(text, &self.provider) {
            Some(value) => self.set_value(value),
            None => {
                log_console!(
                    "set_value",
                    EVENT_PARSE_FAILED,
                    command = self.name();
                    "Could not parse value \"{}\" to type {}",
                    text,
                    type_name::<T>()
                );
            }
        }
    }

    /// Restore the registration value without running handlers or logging
    pub fn revert_to_initial_value(&self) {
        self.write_raw(self.initial_value.clone());
    }

    /// Append a change handler, run after all earlier handlers
    pub fn on_change<F>(&self, handler: F) -> ChangeHandlerId
    where
        F: Fn(&mut ChangeEvent<'_, T>) + 'static,
    {
        let id = ChangeHandlerId(self.next_handler_id.get());
        self.next_handler_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler, returning whether it was registered
    pub fn remove_change_handler(&self, id: ChangeHandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Whether console input is rejected
    pub fn is_read_only(&self) -> bool {
        self.core.flags.contains(CommandFlags::READ_ONLY)
            || match &self.storage {
                Storage::Virtual { read_only, .. } => *read_only,
                Storage::Proxy { setter, .. } => setter.is_none(),
            }
    }

    /// Whether any write, programmatic or console, can succeed
    pub fn is_writable(&self) -> bool {
        !matches!(&self.storage, Storage::Proxy { setter: None, .. })
    }

    /// Whether the value lives in an external object
    pub fn is_proxy(&self) -> bool {
        matches!(&self.storage, Storage::Proxy { .. })
    }

    pub fn type_proxy(&self) -> &Rc<dyn TypeProxy<T>> {
        &self.proxy
    }

    pub(crate) fn write_raw(&self, value: T) {
        match &self.storage {
            Storage::Virtual { value: cell, .. } => *cell.borrow_mut() = value,
            Storage::Proxy {
                setter: Some(setter),
                ..
            } => setter(value),
            Storage::Proxy { setter: None, .. } => {}
        }
    }

    pub(crate) fn values_equal(&self, a: &T, b: &T) -> bool {
        self.proxy.equals(a, b)
    }

    fn log_read_only(&self) {
        log_console!(
            "set_value",
            EVENT_READ_ONLY,
            command = self.name();
            "\"{}\" is read only",
            self.name()
        );
    }

    fn assign(&self, value: T, log_change: bool) {
        if !self.is_writable() {
            self.log_read_only();
            return;
        }

        let old_value = self.value();
        self.write_raw(value);

        // Handlers may add or remove handlers while running
        let handlers: Vec<ChangeHandler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        let mut event = ChangeEvent::new(self, old_value);
        for handler in handlers {
            handler(&mut event);
            if event.is_vetoed() {
                break;
            }
        }

        if event.is_vetoed() {
            self.write_raw(event.into_old_value());
            return;
        }

        if log_change && !self.core.flags.contains(CommandFlags::UNLOGGED) && event.is_different()
        {
            let shown = self.value_string();
            let mask = self
                .core
                .flags
                .contains(CommandFlags::PROTECTED)
                .then_some(self.protected_change_string.as_str());
            log_console!(
                "set_value",
                EVENT_VALUE_CHANGED,
                command = self.name();
                "\"{}\" changed to \"{}\"",
                self.name(),
                Redacted::new(&shown, mask)
            );
        }
    }
}

fn read_storage<T: Clone>(storage: &Storage<T>) -> T {
    match storage {
        Storage::Virtual { value, .. } => value.borrow().clone(),
        Storage::Proxy { getter, .. } => getter(),
    }
}

impl<T: Clone + 'static> std::fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.core.name)
            .field("flags", &self.core.flags)
            .finish()
    }
}

impl<T: Clone + 'static> BaseCommand for Variable<T> {
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
        format!("variable<{}>", type_name::<T>())
    }

    fn on_command(&self, args: &CommandArgs) {
        match args.arguments() {
            [] => {
                log_console!(
                    "query",
                    EVENT_VALUE_QUERY,
                    command = self.name();
                    "\"{}\" is \"{}\"",
                    self.name(),
                    self.value_string()
                );
            }
            [text] => {
                if self.is_read_only() {
                    self.log_read_only();
                } else {
                    self.set_value_string(text);
                }
            }
            _ => {
                log_console!(
                    "set_value",
                    EVENT_USAGE,
                    command = self.name();
                    "Variables can only be set with syntax \"name value\""
                );
            }
        }
    }

    fn write_command_info(&self, out: &mut String) {
        out.push_str(&format!(
            "\"{}\" is \"{}\" ({}, default \"{}\")",
            self.core.name,
            self.value_string(),
            self.type_name(),
            self.initial_value_string()
        ));
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

    fn as_variable(&self) -> Option<&dyn DynVariable> {
        Some(self)
    }
}

impl<T: Clone + 'static> DynVariable for Variable<T> {
    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn is_read_only(&self) -> bool {
        Variable::is_read_only(self)
    }

    fn value_string(&self) -> String {
        Variable::value_string(self)
    }

    fn initial_value_string(&self) -> String {
        Variable::initial_value_string(self)
    }

    fn set_value_string(&self, text: &str) {
        Variable::set_value_string(self, text);
    }

    fn revert_to_initial_value(&self) {
        Variable::revert_to_initial_value(self);
    }
}
