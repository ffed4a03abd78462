//! Range clamping

use super::VariableFilter;
use crate::commands::ChangeEvent;
use crate::errors::CommandError;
use std::cmp::Ordering;

/// Keeps values inside an optional lower and upper bound
///
/// Out-of-range values are clamped to the nearest bound, or rejected when
/// `deny_out_of_range` is set. Values that do not compare with a bound
/// (NaN) are rejected.
#[derive(Debug, Clone)]
pub struct MinMaxFilter<T> {
    min: Option<T>,
    max: Option<T>,
    deny_out_of_range: bool,
}

impl<T: Clone + PartialOrd> MinMaxFilter<T> {
    /// # Errors
    ///
    /// Returns `CommandError::InvalidFilter` when neither bound is given or
    /// when `min` is not below `max`.
    pub fn new(min: Option<T>, max: Option<T>, deny_out_of_range: bool) -> Result<Self, CommandError> {
        match (&min, &max) {
            (None, None) => Err(CommandError::InvalidFilter {
                reason: "min/max filter needs at least one bound".to_string(),
            }),
            (Some(low), Some(high)) if low.partial_cmp(high) != Some(Ordering::Less) => {
                Err(CommandError::InvalidFilter {
                    reason: "min/max filter minimum must be less than its maximum".to_string(),
                })
            }
            _ => Ok(Self {
                min,
                max,
                deny_out_of_range,
            }),
        }
    }

    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }
}

impl<T: Clone + PartialOrd + 'static> VariableFilter<T> for MinMaxFilter<T> {
    fn filter(&self, event: &mut ChangeEvent<'_, T>) -> bool {
        let value = event.value();
        let mut low = self.min.clone().unwrap_or_else(|| value.clone());
        let mut high = self.max.clone().unwrap_or_else(|| value.clone());

        // A single bound may sit on the wrong side of the incoming value
        if high < low {
            std::mem::swap(&mut low, &mut high);
        }

        match (value.partial_cmp(&low), value.partial_cmp(&high)) {
            (None, _) | (_, None) => false,
            (Some(Ordering::Less), _) => {
                if self.deny_out_of_range {
                    return false;
                }
                event.set_value(low);
                true
            }
            (_, Some(Ordering::Greater)) => {
                if self.deny_out_of_range {
                    return false;
                }
                event.set_value(high);
                true
            }
            _ => true,
        }
    }
}
