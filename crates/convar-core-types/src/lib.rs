//! Core types shared across convar facilities
//!
//! This crate provides foundational types used by the command system,
//! its logging facility and the console host:
//!
//! - **Command flags**: the `CommandFlags` bitset carried by every command
//! - **Redaction**: `Redacted` display wrapper for protected values
//! - **Schema constants**: Canonical field keys and event names

pub mod flags;
pub mod redact;
pub mod schema;

pub use flags::CommandFlags;
pub use redact::Redacted;
