//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use convar_core::log_op_start;
/// log_op_start!("create_context");
/// log_op_start!("create_context", context = "client");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = convar_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = convar_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use convar_core::log_op_end;
/// log_op_end!("create_context", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = convar_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = convar_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use convar_core::{log_op_error, errors::CommandError};
/// let err = CommandError::ContextInUse { context: "client".to_string(), shared_count: 1 };
/// log_op_error!("destroy_context", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = convar_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = convar_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}

/// Log a line of console output
///
/// The trailing arguments are the format string and its arguments, so the
/// event message is exactly the text shown on the console.
///
/// # Example
///
/// ```
/// # use convar_core::log_console;
/// # use convar_core_types::schema::EVENT_OUTPUT;
/// log_console!("echo", EVENT_OUTPUT, "hello {}", "world");
/// log_console!("echo", EVENT_OUTPUT, context = "client"; "hello");
/// ```
#[macro_export]
macro_rules! log_console {
    ($op:expr, $event:expr, $($field:ident = $value:expr),+; $($arg:tt)+) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($field = $value,)+
            $($arg)+
        );
    }};
    ($op:expr, $event:expr, $($arg:tt)+) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($arg)+
        );
    }};
}
