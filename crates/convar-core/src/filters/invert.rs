use super::VariableFilter;
use crate::commands::ChangeEvent;

/// Accepts exactly what the wrapped filter rejects
///
/// Rewrites made by the wrapped filter are kept.
pub struct InvertFilter<F> {
    inner: F,
}

impl<F> InvertFilter<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<T: Clone + 'static, F: VariableFilter<T>> VariableFilter<T> for InvertFilter<F> {
    fn filter(&self, event: &mut ChangeEvent<'_, T>) -> bool {
        !self.inner.filter(event)
    }
}
