use super::VariableFilter;
use crate::commands::ChangeEvent;

/// Accepts values of one sign, treating zero as positive
#[derive(Debug, Clone, Copy)]
pub struct NumberSignFilter {
    positive: bool,
}

impl NumberSignFilter {
    pub fn new(positive: bool) -> Self {
        Self { positive }
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl<T: Clone + PartialOrd + Default + 'static> VariableFilter<T> for NumberSignFilter {
    fn filter(&self, event: &mut ChangeEvent<'_, T>) -> bool {
        (event.value() < T::default()) ^ self.positive
    }
}
