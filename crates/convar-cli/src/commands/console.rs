//! Demo console shared by `run` and `repl`
//!
//! Variables live in an `Engine` context; the `Console` context shares it and
//! adds the common commands, so scripts see both.

use convar_core::{
    register_common_commands, CommandArgs, CommandContext, CommandFlags,
    CommandInfo, CommandSystem, CommandSystemConfig, CommonCommandOptions, ProxyVariableInfo,
    Result, VirtualVariableInfo,
};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// State owned by the host loop and exposed through proxy variables
#[derive(Debug, Default)]
pub struct HostState {
    pub frames: u64,
}

pub struct DemoConsole {
    pub system: CommandSystem,
    pub engine: CommandContext,
    pub console: CommandContext,
    pub host: Rc<RefCell<HostState>>,
    quit: Rc<Cell<bool>>,
}

/// One variable as printed by `--dump-vars`
#[derive(Debug, Serialize)]
pub struct VariableDump {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    pub default: String,
    pub flags: Vec<String>,
}

impl DemoConsole {
    /// # Errors
    ///
    /// Fails when the configuration names an invalid shared context or a
    /// registration is rejected.
    pub fn build(config: &CommandSystemConfig) -> Result<Self> {
        let system = CommandSystem::with_config(config)?;
        let engine = system.create_context_sharing("Engine", &[])?;
        let host = Rc::new(RefCell::new(HostState::default()));
        register_engine_variables(&engine, &host)?;

        let console = system.create_context_sharing("Console", &[engine.clone()])?;
        register_common_commands(&console, CommonCommandOptions::from_config(config))?;

        let quit = Rc::new(Cell::new(false));
        let requested = quit.clone();
        console.register_command(
            CommandInfo::new("quit", move |_: &CommandArgs| requested.set(true))
                .with_help_info("Stop the host loop"),
        )?;

        Ok(Self {
            system,
            engine,
            console,
            host,
            quit,
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.get()
    }

    /// Run one frame: drain the queue and advance the host clock
    pub fn frame(&self) {
        self.system.execute();
        self.host.borrow_mut().frames += 1;
    }

    /// Engine variables with protected values masked
    pub fn dump_variables(&self) -> Vec<VariableDump> {
        let mask = self.engine.protected_change_string().to_string();
        self.engine
            .commands()
            .iter()
            .filter_map(|command| {
                let variable = command.as_variable()?;
                let protected = command.flags().contains(CommandFlags::PROTECTED);
                let shown = |text: String| if protected { mask.clone() } else { text };
                Some(VariableDump {
                    name: command.name().to_string(),
                    type_name: variable.value_type_name().to_string(),
                    value: shown(variable.value_string()),
                    default: shown(variable.initial_value_string()),
                    flags: command.flags().names(),
                })
            })
            .collect()
    }
}

fn register_engine_variables(
    engine: &CommandContext,
    host: &Rc<RefCell<HostState>>,
) -> Result<()> {
    engine.register_variable(
        VirtualVariableInfo::new("fps_max", 100u32)
            .with_help_info("Frame rate limit")
            .configure_filters(|f| f.with_min_max(Some(10), Some(1000), false))
            .with_change_handler(|event| {
                tracing::debug!(
                    component = module_path!(),
                    old = *event.old_value(),
                    new = event.value(),
                    "Frame budget updated"
                );
            }),
    )?;

    engine.register_variable(
        VirtualVariableInfo::new("sv_gravity", 800.0f32).with_help_info("World gravity"),
    )?;

    engine.register_variable(
        VirtualVariableInfo::new("sv_friction", 4.0f32)
            .with_help_info("Ground friction, never negative")
            .configure_filters(|f| f.with_number_sign(true)),
    )?;

    engine.register_variable(
        VirtualVariableInfo::new("name", "player".to_string())
            .with_help_info("Player name")
            .configure_filters(|f| {
                f.with_whitespace_stripped()
                    .with_printable_characters("unnamed")
            }),
    )?;

    engine.register_variable(
        VirtualVariableInfo::new("rcon_password", String::new())
            .with_help_info("Remote console password")
            .with_flags(CommandFlags::PROTECTED),
    )?;

    engine.register_variable(
        VirtualVariableInfo::new("developer", 0i32)
            .with_help_info("Developer mode level")
            .configure_filters(|f| f.with_min_max(Some(0), Some(2), true)),
    )?;

    engine.register_proxy_variable(
        ProxyVariableInfo::bind_read_only("host_frames", host, |state| state.frames)
            .with_help_info("Frames run by the host loop"),
    )?;

    Ok(())
}
