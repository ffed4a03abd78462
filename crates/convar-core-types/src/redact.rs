//! Redaction wrapper for protected values
//!
//! `Redacted` ensures that the value of a protected variable never reaches a
//! log line: when a mask is set, both `Display` and `Debug` print the mask.

use std::fmt;

/// Display wrapper that prints either a value or its mask
///
/// # Example
///
/// ```
/// use convar_core_types::Redacted;
///
/// let shown = Redacted::new("hunter2", Some("***PROTECTED***"));
/// assert_eq!(shown.to_string(), "***PROTECTED***");
///
/// let plain = Redacted::new("60", None);
/// assert_eq!(plain.to_string(), "60");
/// ```
#[derive(Clone, Copy)]
pub struct Redacted<'a> {
    value: &'a str,
    mask: Option<&'a str>,
}

impl<'a> Redacted<'a> {
    /// Wrap a value, masking it when `mask` is present
    pub fn new(value: &'a str, mask: Option<&'a str>) -> Self {
        Self { value, mask }
    }

    /// Whether the value is hidden
    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &'a str {
        self.value
    }
}

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mask.unwrap_or(self.value))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.mask.unwrap_or(self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_display() {
        let shown = Redacted::new("secret", Some("***"));
        assert_eq!(format!("{}", shown), "***");
        assert!(!format!("{:?}", shown).contains("secret"));
        assert!(shown.is_masked());
    }

    #[test]
    fn test_unmasked_display() {
        let shown = Redacted::new("800", None);
        assert_eq!(format!("{}", shown), "800");
        assert_eq!(format!("{:?}", shown), "\"800\"");
    }

    #[test]
    fn test_empty_mask_is_allowed() {
        let shown = Redacted::new("secret", Some(""));
        assert_eq!(shown.to_string(), "");
        assert_eq!(shown.expose(), "secret");
    }
}
