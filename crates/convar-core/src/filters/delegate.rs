use super::VariableFilter;
use crate::commands::ChangeEvent;

/// Filter backed by a closure
pub struct DelegateFilter<F> {
    filter: F,
}

impl<F> DelegateFilter<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }
}

impl<T, F> VariableFilter<T> for DelegateFilter<F>
where
    T: Clone + 'static,
    F: Fn(&mut ChangeEvent<'_, T>) -> bool + 'static,
{
    fn filter(&self, event: &mut ChangeEvent<'_, T>) -> bool {
        (self.filter)(event)
    }
}
