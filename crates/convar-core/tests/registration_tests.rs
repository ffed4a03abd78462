#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::new_system;
use convar_core::{
    BaseCommand, CommandArgs, CommandError, CommandFlags, CommandInfo, ProxyVariableInfo,
    Variable, VirtualVariableInfo,
};
use std::rc::Rc;

fn noop(_: &CommandArgs) {}

#[test]
fn test_registering_same_name_returns_existing() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();

    let first = context
        .register_variable(VirtualVariableInfo::new("sv_cheats", 0i32))
        .unwrap();
    first.set_value(1);
    let second = context
        .register_variable(VirtualVariableInfo::new("sv_cheats", 5i32))
        .unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(second.value(), 1);

    let quit = context.register_command(CommandInfo::new("quit", noop)).unwrap();
    let again = context.register_command(CommandInfo::new("quit", noop)).unwrap();
    assert!(Rc::ptr_eq(&quit, &again));
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    context
        .register_variable(VirtualVariableInfo::new("sv_cheats", 0i32))
        .unwrap();
    context.register_command(CommandInfo::new("quit", noop)).unwrap();

    let as_float = context
        .register_variable(VirtualVariableInfo::new("sv_cheats", 0.0f32))
        .unwrap_err();
    assert_eq!(
        as_float,
        CommandError::CommandTypeMismatch {
            name: "sv_cheats".to_string(),
            existing: "variable<i32>".to_string(),
            requested: "variable<f32>".to_string(),
        }
    );

    assert!(matches!(
        context.register_command(CommandInfo::new("sv_cheats", noop)),
        Err(CommandError::CommandTypeMismatch { .. })
    ));
    assert!(matches!(
        context.register_variable(VirtualVariableInfo::new("quit", true)),
        Err(CommandError::CommandTypeMismatch { .. })
    ));
}

#[test]
fn test_invalid_command_names() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();

    for name in ["", "two words", "semi;colon", "quo\"te", "tab\tname"] {
        assert!(
            matches!(
                context.register_command(CommandInfo::new(name, noop)),
                Err(CommandError::InvalidCommandName { .. })
            ),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn test_lookup_by_kind() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    context
        .register_variable(VirtualVariableInfo::new("volume", 0.5f32))
        .unwrap();

    assert!(context.find_variable::<f32>("volume").is_some());
    assert!(context.find_variable::<f64>("volume").is_none());
    assert!(context.find_command::<Variable<f32>>("volume").is_some());
    assert!(context.find_command::<convar_core::Command>("volume").is_none());
    assert!(context.find_variable::<f32>("missing").is_none());
}

#[test]
fn test_metadata_is_kept() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let tag: Rc<dyn std::any::Any> = Rc::new("engine-tag");

    let var = context
        .register_variable(
            VirtualVariableInfo::new("rcon_password", String::new())
                .with_help_info("Remote console password")
                .with_flags(CommandFlags::PROTECTED)
                .with_flags(CommandFlags::UNLOGGED)
                .with_user_flags(0b101)
                .with_tag(tag),
        )
        .unwrap();

    assert_eq!(var.name(), "rcon_password");
    assert_eq!(var.help_info(), "Remote console password");
    assert_eq!(
        var.flags(),
        CommandFlags::PROTECTED | CommandFlags::UNLOGGED
    );
    assert_eq!(var.user_flags(), 0b101);
    assert_eq!(
        var.tag().unwrap().downcast_ref::<&'static str>(),
        Some(&"engine-tag")
    );
}

#[test]
fn test_find_commands_by_keyword() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    context
        .register_variable(
            VirtualVariableInfo::new("sv_gravity", 800.0f32).with_help_info("World gravity"),
        )
        .unwrap();
    context
        .register_variable(
            VirtualVariableInfo::new("sv_friction", 4.0f32).with_help_info("Ground friction"),
        )
        .unwrap();
    context
        .register_command(CommandInfo::new("kill", noop).with_help_info("Respawn the player"))
        .unwrap();

    let names = |found: Vec<Rc<dyn BaseCommand>>| {
        found
            .iter()
            .map(|command| command.name().to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(
        names(context.find_commands("SV_", false)),
        vec!["sv_gravity", "sv_friction"]
    );
    assert_eq!(names(context.find_commands("player", false)), Vec::<String>::new());
    assert_eq!(names(context.find_commands("player", true)), vec!["kill"]);
    assert_eq!(context.find_commands("*", false).len(), 4);
    assert!(context.find_commands("  ", true).is_empty());
}

#[test]
fn test_proxy_variable_with_closures() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();
    let store = Rc::new(std::cell::Cell::new(7u16));
    let read = store.clone();
    let write = store.clone();

    let var = context
        .register_proxy_variable(ProxyVariableInfo::new(
            "port",
            move || read.get(),
            move |value| write.set(value),
        ))
        .unwrap();

    var.set_value_string("27015");

    assert_eq!(store.get(), 27015);
    assert!(var.is_proxy());
    assert_eq!(var.type_name(), "variable<u16>");
}

#[test]
fn test_alias_names_are_validated() {
    let system = new_system();
    let context = system.create_context_sharing("Engine", &[]).unwrap();

    assert!(matches!(
        context.set_alias("two words", "echo hi"),
        Err(CommandError::InvalidAliasName { .. })
    ));
    assert!(matches!(
        context.set_alias("", "echo hi"),
        Err(CommandError::InvalidAliasName { .. })
    ));

    context.set_alias("b", "echo b").unwrap();
    context.set_alias("a", "echo a").unwrap();
    context.set_alias("b", "echo bb").unwrap();
    assert_eq!(
        context.aliases(),
        vec![
            ("b".to_string(), "echo bb".to_string()),
            ("a".to_string(), "echo a".to_string()),
        ]
    );

    context.set_alias("b", "   ").unwrap();
    assert_eq!(context.alias("b"), None);
}
