//! Filters for string variables

use super::VariableFilter;
use crate::commands::ChangeEvent;
use crate::errors::CommandError;
use regex::Regex;

/// Accepts values the pattern matches
#[derive(Debug, Clone)]
pub struct RegexFilter {
    regex: Regex,
}

impl RegexFilter {
    /// # Errors
    ///
    /// Returns `CommandError::InvalidFilter` when `pattern` does not compile.
    pub fn new(pattern: &str) -> Result<Self, CommandError> {
        Regex::new(pattern)
            .map(Self::from_regex)
            .map_err(|err| CommandError::InvalidFilter {
                reason: format!("invalid pattern \"{}\": {}", pattern, err),
            })
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }
}

impl VariableFilter<String> for RegexFilter {
    fn filter(&self, event: &mut ChangeEvent<'_, String>) -> bool {
        self.regex.is_match(&event.value())
    }
}

/// Accepts only listed values
#[derive(Debug, Clone)]
pub struct StringListFilter {
    values: Vec<String>,
}

impl StringListFilter {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl VariableFilter<String> for StringListFilter {
    fn filter(&self, event: &mut ChangeEvent<'_, String>) -> bool {
        let value = event.value();
        self.values.iter().any(|allowed| *allowed == value)
    }
}

/// Trims surrounding whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct StripWhitespaceFilter;

impl VariableFilter<String> for StripWhitespaceFilter {
    fn filter(&self, event: &mut ChangeEvent<'_, String>) -> bool {
        let value = event.value();
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            event.set_value(trimmed.to_string());
        }
        true
    }
}
