#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{capture, console_context, messages_containing, new_system, run};
use convar_core::{CommandArgs, CommandError, CommandInfo};
use std::cell::RefCell;
use std::rc::Rc;

/// Positions of each needle among captured messages, in emission order
fn order_of(capture: &convar_core::logging_facility::TestCapture, needles: &[&str]) -> Vec<String> {
    capture
        .messages()
        .into_iter()
        .filter(|message| needles.contains(&message.as_str()))
        .collect()
}

#[test]
fn test_wait_defers_rest_to_next_execute() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");

    console.queue_commands("wait; echo q1_alpha; echo q1_beta").unwrap();
    system.execute();

    assert!(messages_containing(&capture, "q1_").is_empty());
    assert_eq!(system.pending_commands(), 1);

    system.execute();
    assert_eq!(
        order_of(&capture, &["q1_alpha", "q1_beta"]),
        vec!["q1_alpha", "q1_beta"]
    );
    assert_eq!(system.pending_commands(), 0);
}

#[test]
fn test_statements_run_in_queue_order() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");

    console.queue_commands("echo q2_one\necho q2_two").unwrap();
    console.queue_commands("echo q2_three // trailing note").unwrap();
    system.execute();

    assert_eq!(
        order_of(&capture, &["q2_one", "q2_two", "q2_three"]),
        vec!["q2_one", "q2_two", "q2_three"]
    );
}

#[test]
fn test_insert_at_front_runs_first() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");

    console.queue_commands("echo q3_queued").unwrap();
    console.insert_commands("echo q3_inserted", 0).unwrap();
    system.execute();

    assert_eq!(
        order_of(&capture, &["q3_queued", "q3_inserted"]),
        vec!["q3_inserted", "q3_queued"]
    );
}

#[test]
fn test_insert_past_end_is_rejected() {
    let system = new_system();
    let console = console_context(&system, "Console");
    console.queue_commands("echo q4").unwrap();

    let err = console.insert_commands("echo q4_late", 5).unwrap_err();

    assert_eq!(err, CommandError::QueueIndexOutOfRange { index: 5, len: 1 });
    assert_eq!(system.pending_commands(), 1);
}

#[test]
fn test_unknown_command_is_logged() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");

    run(&system, &console, "q5_no_such_command 1 2");

    assert!(capture.has_message("Unknown command \"q5_no_such_command\""));
}

#[test]
fn test_alias_expands_in_place() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");
    console.set_alias("q6_greet", "echo q6_hello; echo q6_world").unwrap();

    run(&system, &console, "q6_greet; echo q6_after");

    assert_eq!(
        order_of(&capture, &["q6_hello", "q6_world", "q6_after"]),
        vec!["q6_hello", "q6_world", "q6_after"]
    );
}

#[test]
fn test_nested_alias_is_deferred_one_execute() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");
    console.set_alias("q7_inner", "echo q7_inner_ran").unwrap();
    console.set_alias("q7_outer", "q7_inner").unwrap();

    run(&system, &console, "q7_outer");
    assert!(messages_containing(&capture, "q7_inner_ran").is_empty());
    assert_eq!(system.pending_text(), vec!["echo q7_inner_ran".to_string()]);

    system.execute();
    assert_eq!(messages_containing(&capture, "q7_inner_ran").len(), 1);
}

#[test]
fn test_self_referencing_alias_advances_once_per_execute() {
    let system = new_system();
    let console = console_context(&system, "Console");
    console.set_alias("q8_loop", "q8_loop").unwrap();

    run(&system, &console, "q8_loop");
    system.execute();
    system.execute();

    assert_eq!(system.pending_text(), vec!["q8_loop".to_string()]);
}

#[test]
fn test_recursive_execute_is_ignored() {
    let capture = capture();
    let system = Rc::new(new_system());
    let console = console_context(&system, "Console");
    let inner = Rc::downgrade(&system);
    console
        .register_command(CommandInfo::new("q9_reenter", move |_: &CommandArgs| {
            if let Some(system) = inner.upgrade() {
                system.execute();
            }
        }))
        .unwrap();

    run(&system, &console, "q9_reenter; echo q9_done");

    assert!(capture.has_message("Recursive execute() call ignored"));
    assert_eq!(messages_containing(&capture, "q9_done").len(), 1);
}

#[test]
fn test_command_can_queue_more_commands() {
    let capture = capture();
    let system = new_system();
    let console = console_context(&system, "Console");
    console
        .register_command(CommandInfo::new("q10_spawn", |args: &CommandArgs| {
            args.context().queue_commands("echo q10_spawned").unwrap();
        }))
        .unwrap();

    run(&system, &console, "q10_spawn");

    assert_eq!(messages_containing(&capture, "q10_spawned").len(), 1);
}

#[test]
fn test_request_wait_from_command() {
    let system = new_system();
    let console = console_context(&system, "Console");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = seen.clone();
    console
        .register_command(CommandInfo::new("q11_pause", move |args: &CommandArgs| {
            record.borrow_mut().push(args.args_text().to_string());
            args.context().request_wait();
        }))
        .unwrap();

    run(&system, &console, "q11_pause a; q11_pause b");
    assert_eq!(*seen.borrow(), vec!["a".to_string()]);

    system.execute();
    assert_eq!(*seen.borrow(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_destroyed_context_entries_are_dropped() {
    let capture = capture();
    let system = new_system();
    let doomed = console_context(&system, "Doomed");
    let console = console_context(&system, "Console");

    doomed.queue_commands("echo q12_doomed").unwrap();
    console.queue_commands("echo q12_kept").unwrap();
    system.destroy_context(&doomed).unwrap();
    system.execute();

    assert!(messages_containing(&capture, "q12_doomed").is_empty());
    assert_eq!(messages_containing(&capture, "q12_kept").len(), 1);
    assert!(matches!(
        doomed.queue_commands("echo again"),
        Err(CommandError::ContextDestroyed { .. })
    ));
}

#[test]
fn test_commands_resolve_in_issuing_context() {
    let capture = capture();
    let system = new_system();
    let client = console_context(&system, "Client");
    let server = console_context(&system, "Server");
    server
        .register_command(CommandInfo::new("q13_kick", |_: &CommandArgs| {
            tracing::info!("q13_kicked");
        }))
        .unwrap();

    run(&system, &client, "q13_kick");
    assert!(capture.has_message("Unknown command \"q13_kick\""));

    run(&system, &server, "q13_kick");
    assert!(capture.has_message("q13_kicked"));
}
