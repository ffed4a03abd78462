//! Canonical event names for structured logging
//!
//! Field keys (`op`, `event`, `duration_ms`, `err_code`, ...) are written as
//! literal `tracing` field names in the logging macros; the values of the
//! `event` field come from here.

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Console event names
pub const EVENT_VALUE_CHANGED: &str = "value_changed";
pub const EVENT_VALUE_QUERY: &str = "value_query";
pub const EVENT_PARSE_FAILED: &str = "parse_failed";
pub const EVENT_READ_ONLY: &str = "read_only";
pub const EVENT_USAGE: &str = "usage";
pub const EVENT_UNKNOWN_COMMAND: &str = "unknown_command";
pub const EVENT_OUTPUT: &str = "output";
pub const EVENT_COMMAND_ADDED: &str = "command_added";
pub const EVENT_DEFERRED: &str = "deferred";
pub const EVENT_EXEC_FAILED: &str = "exec_failed";
