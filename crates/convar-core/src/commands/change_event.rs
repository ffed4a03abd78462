//! Change notifications for variables

use super::variable::Variable;

/// A pending change to a variable, handed to filters and change handlers
///
/// The new value has already been written when handlers run. Reading
/// [`ChangeEvent::value`] returns the variable's current value and
/// [`ChangeEvent::set_value`] rewrites it without re-running the handler
/// chain. Calling [`ChangeEvent::veto`] stops the chain and restores
/// [`ChangeEvent::old_value`].
pub struct ChangeEvent<'a, T: Clone + 'static> {
    variable: &'a Variable<T>,
    old_value: T,
    vetoed: bool,
}

impl<'a, T: Clone + 'static> ChangeEvent<'a, T> {
    pub(crate) fn new(variable: &'a Variable<T>, old_value: T) -> Self {
        Self {
            variable,
            old_value,
            vetoed: false,
        }
    }

    pub fn variable(&self) -> &'a Variable<T> {
        self.variable
    }

    pub fn old_value(&self) -> &T {
        &self.old_value
    }

    pub fn value(&self) -> T {
        self.variable.value()
    }

    /// Replace the pending value
    pub fn set_value(&mut self, value: T) {
        self.variable.write_raw(value);
    }

    /// Whether the current value differs from the old one
    pub fn is_different(&self) -> bool {
        !self.variable.values_equal(&self.old_value, &self.variable.value())
    }

    /// Reject the change
    pub fn veto(&mut self) {
        self.vetoed = true;
    }

    pub fn is_vetoed(&self) -> bool {
        self.vetoed
    }

    pub(crate) fn into_old_value(self) -> T {
        self.old_value
    }
}
