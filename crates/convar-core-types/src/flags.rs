//! Command flags
//!
//! Flags are fixed at registration time and describe how the command system
//! treats a command or variable. Callers that need their own markers use the
//! separate `user_flags` word on each command instead.

use bitflags::bitflags;

bitflags! {
    /// Behavioural flags carried by every command and variable
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandFlags: u32 {
        /// Value is replaced by the context's protected string in change logs
        const PROTECTED = 1 << 0;
        /// Value changes are never logged
        const UNLOGGED = 1 << 1;
        /// Console input may not change the value
        const READ_ONLY = 1 << 2;
    }
}

impl CommandFlags {
    /// Lower-case names of the set flags, in declaration order
    pub fn names(&self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }
}
