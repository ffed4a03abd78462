use super::VariableFilter;
use crate::commands::ChangeEvent;

/// Runs filters in order, stopping at the first rejection
pub struct FilterAggregate<T: Clone + 'static> {
    filters: Vec<Box<dyn VariableFilter<T>>>,
}

impl<T: Clone + 'static> FilterAggregate<T> {
    pub fn new(filters: Vec<Box<dyn VariableFilter<T>>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T: Clone + 'static> VariableFilter<T> for FilterAggregate<T> {
    fn filter(&self, event: &mut ChangeEvent<'_, T>) -> bool {
        self.filters.iter().all(|filter| filter.filter(event))
    }
}
