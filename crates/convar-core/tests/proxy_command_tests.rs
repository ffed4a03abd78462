#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{capture, messages_containing, new_system, run};
use convar_core::{BaseCommand, CommandArgs, CommandError, CommandInfo};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn test_proxy_command_parses_typed_arguments() {
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let position = Rc::new(Cell::new((0.0f32, 0.0f32, 0.0f32)));
    let target = position.clone();
    let teleport = game
        .register_command(CommandInfo::proxy(
            "teleport",
            move |x: f32, y: f32, z: f32| target.set((x, y, z)),
        ))
        .unwrap();

    run(&system, &game, "teleport 1.5 -2 300");

    assert_eq!(position.get(), (1.5, -2.0, 300.0));
    assert!(teleport.is_proxy());
    assert_eq!(teleport.proxy_signature(), Some("(f32, f32, f32)"));
}

#[test]
fn test_proxy_command_without_parameters() {
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    game.register_command(CommandInfo::proxy("pc_respawn", move || {
        counter.set(counter.get() + 1)
    }))
    .unwrap();

    run(&system, &game, "pc_respawn; pc_respawn now");

    assert_eq!(calls.get(), 1);
}

#[test]
fn test_arity_mismatch_is_logged() {
    let capture = capture();
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    game.register_command(CommandInfo::proxy("pc_give", move |_item: String, _count: u32| {
        counter.set(counter.get() + 1)
    }))
    .unwrap();

    run(&system, &game, "pc_give shotgun");
    run(&system, &game, "pc_give shotgun 1 extra");

    assert_eq!(calls.get(), 0);
    assert!(capture.has_message("Not enough arguments for proxy command pc_give: 2 expected, got 1"));
    assert!(capture.has_message("Too many arguments for proxy command pc_give: 2 expected, got 3"));
}

#[test]
fn test_unparsable_argument_is_logged() {
    let capture = capture();
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    game.register_command(CommandInfo::proxy("pc_kick", move |_slot: u8| {
        counter.set(counter.get() + 1)
    }))
    .unwrap();

    run(&system, &game, "pc_kick everyone");

    assert_eq!(calls.get(), 0);
    assert!(capture.has_message("Proxy command pc_kick: could not convert argument 0 to type u8"));
}

#[test]
fn test_quoted_arguments_reach_string_parameters() {
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let said = Rc::new(RefCell::new(Vec::new()));
    let sink = said.clone();
    game.register_command(CommandInfo::proxy("say_to", move |who: String, text: String| {
        sink.borrow_mut().push(format!("{who}: {text}"))
    }))
    .unwrap();

    run(&system, &game, "say_to bob \"good game; well played\"");

    assert_eq!(*said.borrow(), vec!["bob: good game; well played".to_string()]);
}

#[test]
fn test_callbacks_run_after_delegate_even_when_it_fails() {
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    let from_delegate = order.clone();
    let from_callback = order.clone();
    game.register_command(
        CommandInfo::proxy("pc_volume", move |level: u8| {
            from_delegate.borrow_mut().push(format!("delegate {level}"))
        })
        .with_callback(move |args: &CommandArgs| {
            from_callback
                .borrow_mut()
                .push(format!("callback {}", args.args_text()))
        }),
    )
    .unwrap();

    run(&system, &game, "pc_volume 7");
    run(&system, &game, "pc_volume loud");

    assert_eq!(
        *order.borrow(),
        vec![
            "delegate 7".to_string(),
            "callback 7".to_string(),
            "callback loud".to_string(),
        ]
    );
}

struct Unregistered;

#[test]
fn test_missing_type_proxy_fails_registration() {
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();

    let err = game
        .register_command(CommandInfo::proxy("pc_spawn", |_thing: Unregistered| {}))
        .unwrap_err();

    assert!(matches!(err, CommandError::MissingTypeProxy { .. }));
    assert!(!game.contains_command("pc_spawn"));
}

#[test]
fn test_seven_parameters() {
    let system = new_system();
    let game = system.create_context_sharing("Game", &[]).unwrap();
    let total = Rc::new(Cell::new(0i64));
    let sum = total.clone();
    game.register_command(CommandInfo::proxy(
        "pc_sum7",
        move |a: i64, b: i64, c: i64, d: i64, e: i64, f: i64, g: i64| {
            sum.set(a + b + c + d + e + f + g)
        },
    ))
    .unwrap();

    run(&system, &game, "pc_sum7 1 2 3 4 5 6 7");

    assert_eq!(total.get(), 28);
}

#[test]
fn test_help_shows_proxy_signature() {
    let capture = capture();
    let system = new_system();
    let game = common::console_context(&system, "Game");
    let command = game
        .register_command(
            CommandInfo::proxy("pc_setpos", |_x: f32, _y: f32| {})
                .with_help_info("Move the player"),
        )
        .unwrap();

    let mut info = String::new();
    command.write_command_info(&mut info);
    assert!(info.contains("pc_setpos"));
    assert!(info.contains("(f32, f32)"));
    assert!(info.contains("Move the player"));

    run(&system, &game, "help pc_setpos");
    assert_eq!(messages_containing(&capture, "(f32, f32)").len(), 1);
}
