#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{capture, messages_containing, new_system, run};
use convar_core::{
    BaseCommand, CommandArgs, CommandFlags, DynVariable, ProxyVariableInfo, VirtualVariableInfo,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn test_set_value_logs_change() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let fps = context
        .register_variable(VirtualVariableInfo::new("fps_max_vc1", 100u32))
        .unwrap();

    fps.set_value(60);

    assert_eq!(fps.value(), 60);
    assert!(capture.has_message("\"fps_max_vc1\" changed to \"60\""));
}

#[test]
fn test_unchanged_value_is_not_logged() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(VirtualVariableInfo::new("same_value_vc2", 5i32))
        .unwrap();

    var.set_value(5);

    assert!(messages_containing(&capture, "same_value_vc2").is_empty());
}

#[test]
fn test_silent_and_unlogged_writes_are_not_logged() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let quiet = context
        .register_variable(
            VirtualVariableInfo::new("quiet_vc3", 1i32).with_flags(CommandFlags::UNLOGGED),
        )
        .unwrap();
    let silent = context
        .register_variable(VirtualVariableInfo::new("silent_vc3", 1i32))
        .unwrap();

    quiet.set_value(2);
    silent.set_value_silent(2);

    assert_eq!(quiet.value(), 2);
    assert_eq!(silent.value(), 2);
    assert!(messages_containing(&capture, "quiet_vc3").is_empty());
    assert!(messages_containing(&capture, "silent_vc3").is_empty());
}

#[test]
fn test_protected_value_is_masked() {
    let capture = capture();
    let system = new_system();
    let context = system
        .create_context("Server", None, Some("<hidden>"), &[])
        .unwrap();
    let password = context
        .register_variable(
            VirtualVariableInfo::new("rcon_password_vc4", String::new())
                .with_flags(CommandFlags::PROTECTED),
        )
        .unwrap();

    password.set_value("hunter2".to_string());

    assert_eq!(password.value(), "hunter2");
    assert!(capture.has_message("\"rcon_password_vc4\" changed to \"<hidden>\""));
    assert!(messages_containing(&capture, "hunter2").is_empty());
}

#[test]
fn test_veto_restores_old_value_without_log() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let later_handler_ran = Rc::new(Cell::new(false));
    let ran = later_handler_ran.clone();
    let var = context
        .register_variable(
            VirtualVariableInfo::new("vetoed_vc5", 10i32)
                .with_change_handler(|event| {
                    if event.value() > 100 {
                        event.veto();
                    }
                })
                .with_change_handler(move |_| ran.set(true)),
        )
        .unwrap();

    var.set_value(500);

    assert_eq!(var.value(), 10);
    assert!(!later_handler_ran.get());
    assert!(messages_containing(&capture, "vetoed_vc5").is_empty());
}

#[test]
fn test_handler_sees_old_and_new_value() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = seen.clone();
    let var = context
        .register_variable(
            VirtualVariableInfo::new("sv_gravity", 800.0f32).with_change_handler(move |event| {
                record
                    .borrow_mut()
                    .push((*event.old_value(), event.value(), event.is_different()));
            }),
        )
        .unwrap();

    var.set_value(600.0);
    var.set_value(600.0);

    assert_eq!(
        *seen.borrow(),
        vec![(800.0, 600.0, true), (600.0, 600.0, false)]
    );
}

#[test]
fn test_handler_rewrite_to_old_value_is_not_logged() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(
            VirtualVariableInfo::new("sticky_vc7", 3i32).with_change_handler(|event| {
                let old = *event.old_value();
                event.set_value(old);
            }),
        )
        .unwrap();

    var.set_value(4);

    assert_eq!(var.value(), 3);
    assert!(messages_containing(&capture, "sticky_vc7").is_empty());
}

#[test]
fn test_unparsable_string_leaves_value() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(VirtualVariableInfo::new("parse_vc8", 7u8))
        .unwrap();

    var.set_value_string("seven");
    var.set_value_string("300");

    assert_eq!(var.value(), 7);
    assert!(capture.has_message("Could not parse value \"seven\" to type u8"));
    assert!(messages_containing(&capture, "\"parse_vc8\" changed").is_empty());
}

#[test]
fn test_revert_restores_registration_value() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(
            VirtualVariableInfo::new("developer", 0i32).configure_filters(|f| f.with_number_sign(true)),
        )
        .unwrap();

    var.set_value(3);
    assert_eq!(var.value(), 3);

    var.revert_to_initial_value();
    assert_eq!(var.value(), 0);
    assert_eq!(var.initial_value_string(), "0");
}

#[test]
fn test_console_query_and_set() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(VirtualVariableInfo::new("sv_friction_vc10", 4.0f32))
        .unwrap();

    run(&system, &context, "sv_friction_vc10");
    run(&system, &context, "sv_friction_vc10 2.5");
    run(&system, &context, "sv_friction_vc10 1 2");

    assert_eq!(var.value(), 2.5);
    assert!(capture.has_message("\"sv_friction_vc10\" is \"4\""));
    assert!(capture.has_message("\"sv_friction_vc10\" changed to \"2.5\""));
    assert!(capture.count_events(|e| {
        e.field("command") == Some("sv_friction_vc10")
            && e.message.as_deref()
                == Some("Variables can only be set with syntax \"name value\"")
    }) == 1);
}

#[test]
fn test_read_only_variable_rejects_console_writes_only() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(VirtualVariableInfo::new("version_vc11", 48i32).make_read_only())
        .unwrap();

    run(&system, &context, "version_vc11 49");
    assert_eq!(var.value(), 48);
    assert!(capture.has_message("\"version_vc11\" is read only"));

    var.set_value(49);
    assert_eq!(var.value(), 49);
}

#[test]
fn test_read_only_flag_blocks_console() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(
            VirtualVariableInfo::new("flagged_vc12", 1i32).with_flags(CommandFlags::READ_ONLY),
        )
        .unwrap();

    run(&system, &context, "flagged_vc12 2");

    assert_eq!(var.value(), 1);
    assert!(var.is_read_only());
}

struct Movement {
    max_speed: f32,
    ticks: u32,
}

#[test]
fn test_proxy_variable_reads_and_writes_target() {
    let system = new_system();
    let context = system.create_context_sharing("Game", &[]).unwrap();
    let movement = Rc::new(RefCell::new(Movement {
        max_speed: 320.0,
        ticks: 0,
    }));

    let var = context
        .register_proxy_variable(ProxyVariableInfo::bind(
            "sv_maxspeed",
            &movement,
            |m| m.max_speed,
            |m, value| m.max_speed = value,
        ))
        .unwrap();

    assert_eq!(*var.initial_value(), 320.0);

    movement.borrow_mut().max_speed = 250.0;
    assert_eq!(var.value(), 250.0);

    run(&system, &context, "sv_maxspeed 400");
    assert_eq!(movement.borrow().max_speed, 400.0);

    var.revert_to_initial_value();
    assert_eq!(movement.borrow().max_speed, 320.0);
}

#[test]
fn test_proxy_variable_without_setter_is_read_only() {
    let capture = capture();
    let system = new_system();
    let context = system.create_context_sharing("Game", &[]).unwrap();
    let movement = Rc::new(RefCell::new(Movement {
        max_speed: 0.0,
        ticks: 12,
    }));

    let var = context
        .register_proxy_variable(ProxyVariableInfo::bind_read_only(
            "ticks_vc14",
            &movement,
            |m| m.ticks,
        ))
        .unwrap();

    var.set_value(99);
    run(&system, &context, "ticks_vc14 100");

    assert_eq!(movement.borrow().ticks, 12);
    assert!(!var.is_writable());
    assert_eq!(
        messages_containing(&capture, "\"ticks_vc14\" is read only").len(),
        2
    );
}

#[test]
fn test_reentrant_set_value_from_handler() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(VirtualVariableInfo::new("even_only", 0i32))
        .unwrap();

    let weak = Rc::downgrade(&var);
    var.on_change(move |event| {
        let value = event.value();
        if value % 2 != 0 {
            if let Some(var) = weak.upgrade() {
                var.set_value(value + 1);
            }
        }
    });

    var.set_value(3);
    assert_eq!(var.value(), 4);
}

#[test]
fn test_untyped_access_through_base_command() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    context
        .register_variable(VirtualVariableInfo::new("hostname", "convar".to_string()))
        .unwrap();

    let command = context.find_command_base("hostname").unwrap();
    let variable: &dyn DynVariable = command.as_variable().unwrap();
    variable.set_value_string("lan party");

    assert_eq!(variable.value_string(), "lan party");
    assert!(variable.value_type_name().ends_with("String"));
    assert_eq!(
        convar_core::value_as::<String>(&*command),
        Some("lan party".to_string())
    );
    assert_eq!(convar_core::value_as::<i32>(&*command), None);
}

#[test]
fn test_on_command_direct_invocation() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let var = context
        .register_variable(VirtualVariableInfo::new("sensitivity", 3.0f64))
        .unwrap();

    let args = CommandArgs::parse(&context, "sensitivity 1,5").unwrap();
    var.on_command(&args);

    // Group separators are dropped, not read as decimals
    assert_eq!(var.value(), 15.0);
}
