//! Type proxies: string conversion and equality for variable value types
//!
//! Every value type that crosses the console boundary has exactly one proxy
//! registered with the command system. Commands and variables resolve their
//! proxies at registration, so a missing proxy is reported up front rather
//! than when the console first touches the value.

pub mod primitive;
pub mod registry;

use crate::format::FormatProvider;

pub use primitive::{
    BoolTypeProxy, CharTypeProxy, DateTimeOffsetTypeProxy, DecimalTypeProxy, FloatTypeProxy,
    IntegerTypeProxy, NaiveDateTimeTypeProxy, StringTypeProxy,
};
pub use registry::TypeProxyRegistry;

/// Converts values of `T` to and from console text
pub trait TypeProxy<T>: 'static {
    /// Parse `text`, returning `None` when it is not a valid `T`
    fn try_parse(&self, text: &str, provider: &FormatProvider) -> Option<T>;

    /// Format `value` for display
    fn format(&self, value: &T, provider: &FormatProvider) -> String;

    /// Equality used for change detection
    fn equals(&self, a: &T, b: &T) -> bool;
}
