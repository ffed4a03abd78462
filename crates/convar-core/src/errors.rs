use thiserror::Error;

/// Result type alias using CommandError
pub type Result<T> = std::result::Result<T, CommandError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all
/// configuration errors raised by the command system. Each kind maps to a
/// stable error code that can be used for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registration
    InvalidName,
    TypeMismatch,
    SharedConflict,
    InvalidFilter,

    // Type proxies
    DuplicateTypeProxy,
    MissingTypeProxy,

    // Context lifecycle
    DuplicateContext,
    DuplicateShare,
    ForeignContext,
    ContextDestroyed,
    ContextInUse,
    ProtectedContext,

    // Queue
    IndexOutOfRange,

    // Integration/IO
    Config,
    Io,

    // Internal
    SystemUnavailable,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::SharedConflict => "ERR_SHARED_CONFLICT",
            ExErrorKind::InvalidFilter => "ERR_INVALID_FILTER",
            ExErrorKind::DuplicateTypeProxy => "ERR_DUPLICATE_TYPE_PROXY",
            ExErrorKind::MissingTypeProxy => "ERR_MISSING_TYPE_PROXY",
            ExErrorKind::DuplicateContext => "ERR_DUPLICATE_CONTEXT",
            ExErrorKind::DuplicateShare => "ERR_DUPLICATE_SHARE",
            ExErrorKind::ForeignContext => "ERR_FOREIGN_CONTEXT",
            ExErrorKind::ContextDestroyed => "ERR_CONTEXT_DESTROYED",
            ExErrorKind::ContextInUse => "ERR_CONTEXT_IN_USE",
            ExErrorKind::ProtectedContext => "ERR_PROTECTED_CONTEXT",
            ExErrorKind::IndexOutOfRange => "ERR_INDEX_OUT_OF_RANGE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::SystemUnavailable => "ERR_SYSTEM_UNAVAILABLE",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    context: Option<String>,
    command: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            context: None,
            command: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the command context involved
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add the name of the command involved
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the command context name, if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Get the command name, if any
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(context) = &self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Configuration errors raised by the command system
///
/// These represent programmer mistakes (bad names, conflicting registrations,
/// illegal teardown order) and are returned synchronously at the call site.
/// Problems caused by console input are never reported through this type;
/// they are logged instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    // ===== Type Proxy Errors =====
    /// A proxy for the type is already registered
    #[error("A type proxy for type {type_name} already exists")]
    DuplicateTypeProxy { type_name: &'static str },

    /// No proxy is registered for the type
    #[error("No type proxy for type {type_name}")]
    MissingTypeProxy { type_name: &'static str },

    // ===== Context Errors =====
    /// Context name is empty or contains whitespace
    #[error("Invalid context name \"{name}\": {reason}")]
    InvalidContextName { name: String, reason: String },

    /// A live context with this name already exists
    #[error("A context named \"{name}\" already exists")]
    DuplicateContextName { name: String },

    /// The same context was listed twice in a share list
    #[error("Context \"{shared}\" is listed more than once for context \"{context}\"")]
    DuplicateSharedContext { context: String, shared: String },

    /// The context belongs to a different command system
    #[error("Context \"{context}\" does not belong to this command system")]
    ForeignContext { context: String },

    /// The context was already destroyed
    #[error("Context \"{context}\" has been destroyed")]
    ContextDestroyed { context: String },

    /// The context is still shared by other contexts
    #[error("Cannot destroy context \"{context}\": it is shared by {shared_count} other context(s)")]
    ContextInUse { context: String, shared_count: usize },

    /// The root shared context cannot be destroyed by callers
    #[error("Cannot destroy the shared context \"{context}\"")]
    CannotDestroySharedContext { context: String },

    // ===== Registration Errors =====
    /// Command name is empty or contains separators
    #[error("Invalid command name \"{name}\": {reason}")]
    InvalidCommandName { name: String, reason: String },

    /// A command with the same name but a different kind exists
    #[error("A command \"{name}\" with a type \"{existing}\" different from \"{requested}\" has already been registered")]
    CommandTypeMismatch {
        name: String,
        existing: String,
        requested: String,
    },

    /// A sharing context already holds a different command with this name
    #[error("A different command named \"{command}\" already exists in context \"{context}\"")]
    SharedCommandConflict { context: String, command: String },

    /// Alias name is empty or contains whitespace
    #[error("Invalid alias name \"{name}\"")]
    InvalidAliasName { name: String },

    /// Filter construction failed
    #[error("Invalid filter: {reason}")]
    InvalidFilter { reason: String },

    // ===== Queue Errors =====
    /// Insert position is past the end of the queue
    #[error("Cannot insert commands at index {index}: queue holds {len} entries")]
    QueueIndexOutOfRange { index: usize, len: usize },

    // ===== Generic Errors =====
    /// The owning command system has been dropped
    #[error("The command system owning context \"{context}\" no longer exists")]
    SystemUnavailable { context: String },

    /// Configuration file could not be parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File could not be read
    #[error("I/O error: {message}")]
    Io { message: String },
}

/// Conversion from CommandError to ExError
impl From<CommandError> for ExError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::DuplicateTypeProxy { type_name } => {
                ExError::new(ExErrorKind::DuplicateTypeProxy)
                    .with_op("add_type_proxy")
                    .with_message(format!("Type proxy for {} already exists", type_name))
            }

            CommandError::MissingTypeProxy { type_name } => {
                ExError::new(ExErrorKind::MissingTypeProxy)
                    .with_op("get_type_proxy")
                    .with_message(format!("No type proxy for {}", type_name))
            }

            CommandError::InvalidContextName { name, reason } => {
                ExError::new(ExErrorKind::InvalidName)
                    .with_context(name)
                    .with_message(reason)
            }

            CommandError::DuplicateContextName { name } => {
                ExError::new(ExErrorKind::DuplicateContext)
                    .with_context(name)
                    .with_message("Context name already in use")
            }

            CommandError::DuplicateSharedContext { context, shared } => {
                ExError::new(ExErrorKind::DuplicateShare)
                    .with_context(context)
                    .with_message(format!("Context {} listed more than once", shared))
            }

            CommandError::ForeignContext { context } => ExError::new(ExErrorKind::ForeignContext)
                .with_context(context)
                .with_message("Context belongs to another command system"),

            CommandError::ContextDestroyed { context } => {
                ExError::new(ExErrorKind::ContextDestroyed)
                    .with_context(context)
                    .with_message("Context has been destroyed")
            }

            CommandError::ContextInUse {
                context,
                shared_count,
            } => ExError::new(ExErrorKind::ContextInUse)
                .with_op("destroy_context")
                .with_context(context)
                .with_message(format!("Shared by {} context(s)", shared_count)),

            CommandError::CannotDestroySharedContext { context } => {
                ExError::new(ExErrorKind::ProtectedContext)
                    .with_op("destroy_context")
                    .with_context(context)
                    .with_message("The shared context lives as long as the command system")
            }

            CommandError::InvalidCommandName { name, reason } => {
                ExError::new(ExErrorKind::InvalidName)
                    .with_command(name)
                    .with_message(reason)
            }

            CommandError::CommandTypeMismatch {
                name,
                existing,
                requested,
            } => ExError::new(ExErrorKind::TypeMismatch)
                .with_command(name)
                .with_message(format!("Registered as {}, requested {}", existing, requested)),

            CommandError::SharedCommandConflict { context, command } => {
                ExError::new(ExErrorKind::SharedConflict)
                    .with_context(context)
                    .with_command(command)
                    .with_message("A different command with this name is already present")
            }

            CommandError::InvalidAliasName { name } => ExError::new(ExErrorKind::InvalidName)
                .with_op("set_alias")
                .with_command(name)
                .with_message("Alias names must be non-empty and contain no whitespace"),

            CommandError::InvalidFilter { reason } => {
                ExError::new(ExErrorKind::InvalidFilter).with_message(reason)
            }

            CommandError::QueueIndexOutOfRange { index, len } => {
                ExError::new(ExErrorKind::IndexOutOfRange)
                    .with_op("insert_commands")
                    .with_message(format!("Index {} past queue length {}", index, len))
            }

            CommandError::SystemUnavailable { context } => {
                ExError::new(ExErrorKind::SystemUnavailable)
                    .with_context(context)
                    .with_message("Command system has been dropped")
            }

            CommandError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }

            CommandError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

/// Conversion from toml::de::Error to CommandError
impl From<toml::de::Error> for CommandError {
    fn from(err: toml::de::Error) -> Self {
        CommandError::Config {
            message: err.to_string(),
        }
    }
}

/// Conversion from std::io::Error to CommandError
impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Io {
            message: err.to_string(),
        }
    }
}
