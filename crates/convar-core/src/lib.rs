//! Convar Core - console commands and variables
//!
//! This crate provides a runtime registry of named, typed commands and
//! variables addressable by string, including:
//! - Type proxies converting console text to and from typed values
//! - Variable filters validating or rewriting assignments
//! - Plain commands, typed proxy commands, virtual and proxy variables
//! - Command contexts with sharing and mirrored registration
//! - A command queue with `wait`, aliases and deferred execution
//! - Common console commands (`echo`, `alias`, `exec`, `find`, `help`)
//!
//! Configuration mistakes are returned as [`CommandError`]; problems with
//! console input are logged through `tracing` and change nothing.

pub mod builtins;
pub mod commands;
pub mod config;
pub mod context;
pub mod errors;
pub mod filters;
pub mod format;
pub mod logging_facility;
pub mod queue;
pub mod system;
pub mod tokenizer;
pub mod type_proxies;

// Re-export commonly used types
pub use builtins::{register_common_commands, CommonCommandOptions};
pub use commands::{
    value_as, BaseCommand, ChangeEvent, ChangeHandlerId, Command, CommandArgs, CommandInfo,
    DynVariable, ProxyVariableInfo, Variable, VirtualVariableInfo,
};
pub use config::CommandSystemConfig;
pub use context::CommandContext;
pub use convar_core_types::{CommandFlags, Redacted};
pub use errors::{CommandError, ExError, ExErrorKind, Result};
pub use filters::{VariableFilter, VariableFilters};
pub use format::FormatProvider;
pub use rust_decimal::Decimal;
pub use system::CommandSystem;
pub use type_proxies::{TypeProxy, TypeProxyRegistry};
