//! Variable filters
//!
//! Filters validate or rewrite a pending variable value. They are collected
//! with [`VariableFilters`] while building a variable and combined into a
//! [`FilterAggregate`] that runs as the variable's first change handler, so a
//! rejection vetoes the change before any user handler sees it.
//!
//! ```
//! use convar_core::commands::VirtualVariableInfo;
//!
//! let info = VirtualVariableInfo::new("fps_max", 100u32)
//!     .configure_filters(|f| f.with_min_max(Some(0), Some(1000), false));
//! # let _ = info;
//! ```

pub mod aggregate;
pub mod delegate;
pub mod invert;
pub mod min_max;
pub mod number_sign;
pub mod string_filters;
pub mod unprintable;

use crate::commands::ChangeEvent;
use crate::errors::CommandError;

pub use aggregate::FilterAggregate;
pub use delegate::DelegateFilter;
pub use invert::InvertFilter;
pub use min_max::MinMaxFilter;
pub use number_sign::NumberSignFilter;
pub use string_filters::{RegexFilter, StringListFilter, StripWhitespaceFilter};
pub use unprintable::UnprintableCharactersFilter;

/// Validates or rewrites a pending value
pub trait VariableFilter<T: Clone + 'static>: 'static {
    /// Return `false` to reject the change
    fn filter(&self, event: &mut ChangeEvent<'_, T>) -> bool;
}

/// Ordered filter list under construction
///
/// Construction errors (bad bounds, bad patterns) are kept until the
/// variable is registered, where they are returned as
/// `CommandError::InvalidFilter`.
pub struct VariableFilters<T: Clone + 'static> {
    filters: Vec<Box<dyn VariableFilter<T>>>,
    error: Option<CommandError>,
}

impl<T: Clone + 'static> Default for VariableFilters<T> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            error: None,
        }
    }
}

impl<T: Clone + 'static> VariableFilters<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter
    pub fn with_filter(mut self, filter: impl VariableFilter<T>) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Append a filter whose construction may have failed
    pub fn with_result<F: VariableFilter<T>>(mut self, filter: Result<F, CommandError>) -> Self {
        match filter {
            Ok(filter) => self.filters.push(Box::new(filter)),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Append a closure filter
    pub fn with_delegate<F>(self, filter: F) -> Self
    where
        F: Fn(&mut ChangeEvent<'_, T>) -> bool + 'static,
    {
        self.with_filter(DelegateFilter::new(filter))
    }

    /// Append the negation of `filter`
    pub fn with_invert(self, filter: impl VariableFilter<T>) -> Self {
        self.with_filter(InvertFilter::new(filter))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Combine into an aggregate, surfacing the first construction error
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while adding filters.
    pub fn build(self) -> Result<FilterAggregate<T>, CommandError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(FilterAggregate::new(self.filters)),
        }
    }
}

impl<T: Clone + PartialOrd + 'static> VariableFilters<T> {
    /// Clamp into `[min, max]`, or reject out-of-range values when `deny_out_of_range`
    pub fn with_min_max(self, min: Option<T>, max: Option<T>, deny_out_of_range: bool) -> Self {
        self.with_result(MinMaxFilter::new(min, max, deny_out_of_range))
    }
}

impl<T: Clone + PartialOrd + Default + 'static> VariableFilters<T> {
    /// Accept only positive (`true`) or only negative (`false`) values
    ///
    /// Zero counts as positive.
    pub fn with_number_sign(self, positive: bool) -> Self {
        self.with_filter(NumberSignFilter::new(positive))
    }
}

impl VariableFilters<String> {
    /// Strip control characters, falling back to `fallback` if nothing remains
    pub fn with_printable_characters(self, fallback: impl Into<String>) -> Self {
        self.with_filter(UnprintableCharactersFilter::new(fallback))
    }

    /// Accept only values matching `pattern`
    pub fn with_regex(self, pattern: &str) -> Self {
        self.with_result(RegexFilter::new(pattern))
    }

    /// Accept only values matching an already compiled pattern
    pub fn with_compiled_regex(self, regex: regex::Regex) -> Self {
        self.with_filter(RegexFilter::from_regex(regex))
    }

    /// Accept only one of `values`, compared case-sensitively
    pub fn with_string_list<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(StringListFilter::new(values))
    }

    /// Trim leading and trailing whitespace
    pub fn with_whitespace_stripped(self) -> Self {
        self.with_filter(StripWhitespaceFilter)
    }
}
