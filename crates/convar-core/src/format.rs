//! Number and date formatting rules shared by every type proxy

use serde::Deserialize;

/// Fixed formatting description handed to type proxies
///
/// Plays the role of a culture: the decimal separator and optional group
/// separator used when parsing number text, and the `chrono` format used for
/// naive date/times.
///
/// When loaded from TOML, a missing `group_separator` is derived from the
/// decimal separator (`.` for a `,` decimal, `,` otherwise) and an empty one
/// disables grouping. The two separators may never be equal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FormatProviderFile")]
pub struct FormatProvider {
    pub decimal_separator: char,
    pub group_separator: Option<char>,
    pub date_time_format: String,
}

impl Default for FormatProvider {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: Some(','),
            date_time_format: "%Y-%m-%dT%H:%M:%S%.f".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct FormatProviderFile {
    decimal_separator: char,
    group_separator: Option<String>,
    date_time_format: String,
}

impl Default for FormatProviderFile {
    fn default() -> Self {
        let defaults = FormatProvider::default();
        Self {
            decimal_separator: defaults.decimal_separator,
            group_separator: None,
            date_time_format: defaults.date_time_format,
        }
    }
}

impl TryFrom<FormatProviderFile> for FormatProvider {
    type Error = String;

    fn try_from(file: FormatProviderFile) -> Result<Self, Self::Error> {
        let group_separator = match file.group_separator {
            None => Some(default_group_separator(file.decimal_separator)),
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => None,
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(format!(
                            "group_separator must be a single character, got \"{text}\""
                        ))
                    }
                }
            }
        };

        let provider = Self {
            decimal_separator: file.decimal_separator,
            group_separator,
            date_time_format: file.date_time_format,
        };
        provider.validate()?;
        Ok(provider)
    }
}

fn default_group_separator(decimal_separator: char) -> char {
    if decimal_separator == ',' {
        '.'
    } else {
        ','
    }
}

impl FormatProvider {
    /// Check that the separators can be told apart
    ///
    /// # Errors
    ///
    /// Returns a message when the decimal and group separators are equal.
    pub fn validate(&self) -> Result<(), String> {
        if self.group_separator == Some(self.decimal_separator) {
            return Err(format!(
                "decimal_separator and group_separator are both '{}'",
                self.decimal_separator
            ));
        }
        Ok(())
    }

    /// Rewrite culture-specific number text into the form `str::parse` accepts
    ///
    /// Group separators are dropped and the decimal separator becomes `.`.
    /// The decimal separator is never dropped, even when it is also the group
    /// separator.
    pub fn normalize_number(&self, text: &str) -> String {
        text.trim()
            .chars()
            .filter_map(|c| {
                if c == self.decimal_separator {
                    Some('.')
                } else if Some(c) == self.group_separator {
                    None
                } else {
                    Some(c)
                }
            })
            .collect()
    }

    /// Render number text produced by `to_string` with this decimal separator
    pub fn localize_number(&self, text: String) -> String {
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}
