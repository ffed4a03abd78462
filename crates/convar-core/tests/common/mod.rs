use convar_core::logging_facility::{init_test_capture, TestCapture};
use convar_core::{
    register_common_commands, CommandContext, CommandSystem, CommonCommandOptions,
    FormatProvider,
};

/// Create a command system with default formatting
#[allow(dead_code)]
pub fn new_system() -> CommandSystem {
    CommandSystem::new(FormatProvider::default())
}

/// Create a context holding the common console commands
#[allow(dead_code)]
pub fn console_context(system: &CommandSystem, name: &str) -> CommandContext {
    let context = system.create_context_sharing(name, &[]).unwrap();
    register_common_commands(&context, CommonCommandOptions::default()).unwrap();
    context
}

/// Queue `text` in `context` and run one execution pass
#[allow(dead_code)]
pub fn run(system: &CommandSystem, context: &CommandContext, text: &str) {
    context.queue_commands(text).unwrap();
    system.execute();
}

/// Install the capture layer
///
/// Tests in one binary share the captured events, so assertions must use
/// names unique to the test.
#[allow(dead_code)]
pub fn capture() -> TestCapture {
    init_test_capture()
}

/// Captured messages containing `needle`
#[allow(dead_code)]
pub fn messages_containing(capture: &TestCapture, needle: &str) -> Vec<String> {
    capture
        .messages()
        .into_iter()
        .filter(|message| message.contains(needle))
        .collect()
}
