use super::VariableFilter;
use crate::commands::ChangeEvent;

/// Removes control characters other than whitespace
///
/// Never rejects. When nothing printable remains the fallback is used.
#[derive(Debug, Clone, Default)]
pub struct UnprintableCharactersFilter {
    fallback: String,
}

impl UnprintableCharactersFilter {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl VariableFilter<String> for UnprintableCharactersFilter {
    fn filter(&self, event: &mut ChangeEvent<'_, String>) -> bool {
        let value = event.value();
        let printable: String = value
            .chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect();

        if printable.is_empty() {
            event.set_value(self.fallback.clone());
        } else if printable != value {
            event.set_value(printable);
        }
        true
    }
}
