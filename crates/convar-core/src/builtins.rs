//! Common console commands
//!
//! `wait` is always present in the root context. The commands here are
//! opt-in and registered per context with [`register_common_commands`].

use crate::commands::{CommandArgs, CommandInfo};
use crate::config::CommandSystemConfig;
use crate::context::CommandContext;
use crate::errors::Result;
use crate::log_console;
use crate::system::CommandSystem;
use convar_core_types::schema::{
    EVENT_EXEC_FAILED, EVENT_OUTPUT, EVENT_UNKNOWN_COMMAND, EVENT_USAGE,
};
use std::path::{Path, PathBuf};

/// Settings for the common commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonCommandOptions {
    /// Directory `exec` resolves file names against
    pub exec_dir: PathBuf,
}

impl Default for CommonCommandOptions {
    fn default() -> Self {
        Self {
            exec_dir: PathBuf::from("."),
        }
    }
}

impl CommonCommandOptions {
    pub fn from_config(config: &CommandSystemConfig) -> Self {
        Self {
            exec_dir: config.exec_dir.clone(),
        }
    }

    pub fn for_system(system: &CommandSystem) -> Self {
        Self {
            exec_dir: system.exec_dir().to_path_buf(),
        }
    }
}

/// Register `echo`, `alias`, `exec`, `find` and `help` in `context`
///
/// # Errors
///
/// Fails like [`CommandContext::register_command`], e.g. when one of the
/// names already holds a variable.
pub fn register_common_commands(
    context: &CommandContext,
    options: CommonCommandOptions,
) -> Result<()> {
    context.register_command(
        CommandInfo::new("echo", echo).with_help_info("Print the arguments to the console"),
    )?;

    context.register_command(
        CommandInfo::new("alias", alias)
            .with_help_info("List aliases, show one, or set one with \"alias name text\""),
    )?;

    let exec_dir = options.exec_dir;
    context.register_command(
        CommandInfo::new("exec", move |args: &CommandArgs| exec(args, &exec_dir))
            .with_help_info("Execute a script file"),
    )?;

    context.register_command(
        CommandInfo::new("find", find).with_help_info("Find commands by name or help text"),
    )?;

    context.register_command(
        CommandInfo::new("help", help).with_help_info("Show information about a command"),
    )?;

    Ok(())
}

fn echo(args: &CommandArgs) {
    log_console!("echo", EVENT_OUTPUT, "{}", args.arguments().join(" "));
}

fn alias(args: &CommandArgs) {
    let context = args.context();
    match args.arguments() {
        [] => {
            let aliases = context.aliases();
            if aliases.is_empty() {
                log_console!("alias", EVENT_OUTPUT, "No aliases defined");
            }
            for (name, text) in aliases {
                log_console!("alias", EVENT_OUTPUT, "\"{}\" : \"{}\"", name, text);
            }
        }
        [name] => match context.alias(name) {
            Some(text) => log_console!("alias", EVENT_OUTPUT, "\"{}\" is \"{}\"", name, text),
            None => log_console!("alias", EVENT_OUTPUT, "No alias named \"{}\"", name),
        },
        [name, rest @ ..] => {
            if let Err(err) = context.set_alias(name, &rest.join(" ")) {
                log_console!("alias", EVENT_USAGE, "{}", err);
            }
        }
    }
}

fn exec(args: &CommandArgs, exec_dir: &Path) {
    let [file] = args.arguments() else {
        log_console!("exec", EVENT_USAGE, "exec <filename>: execute a script file");
        return;
    };

    let path = exec_dir.join(file);
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            tracing::debug!(
                component = module_path!(),
                op = "exec",
                context = args.context().name(),
                path = %path.display(),
                "Executing script"
            );
            if let Err(err) = args.context().insert_commands(&text, 0) {
                log_console!("exec", EVENT_EXEC_FAILED, "Couldn't exec {}: {}", file, err);
            }
        }
        Err(err) => {
            log_console!("exec", EVENT_EXEC_FAILED, "Couldn't exec {}: {}", file, err);
        }
    }
}

fn find(args: &CommandArgs) {
    let [keyword] = args.arguments() else {
        log_console!("find", EVENT_USAGE, "find <keyword>: find commands by name or help text");
        return;
    };

    let matches = args.context().find_commands(keyword, true);
    if matches.is_empty() {
        log_console!("find", EVENT_OUTPUT, "No commands matching \"{}\"", keyword);
    }
    for command in matches {
        if command.help_info().is_empty() {
            log_console!("find", EVENT_OUTPUT, "{}", command.name());
        } else {
            log_console!("find", EVENT_OUTPUT, "{}: {}", command.name(), command.help_info());
        }
    }
}

fn help(args: &CommandArgs) {
    let [name] = args.arguments() else {
        log_console!("help", EVENT_USAGE, "help <command>: show information about a command");
        return;
    };

    match args.context().find_command_base(name) {
        Some(command) => {
            let mut info = String::new();
            command.write_command_info(&mut info);
            log_console!("help", EVENT_OUTPUT, "{}", info);
        }
        None => log_console!("help", EVENT_UNKNOWN_COMMAND, "Unknown command \"{}\"", name),
    }
}
