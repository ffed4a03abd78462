//! Run console scripts
//!
//! Usage: convar run <SCRIPT>... [--max-frames N] [--dump-vars]

use super::console::DemoConsole;
use clap::Args;
use convar_core::{log_op_end, log_op_start, CommandSystemConfig};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script files, queued in order
    #[arg(required = true)]
    pub scripts: Vec<PathBuf>,

    /// Stop after this many frames even if commands are still pending
    #[arg(long, default_value_t = 64)]
    pub max_frames: u64,

    /// Print the engine variables as JSON when done
    #[arg(long)]
    pub dump_vars: bool,
}

/// Execute run command
pub fn execute(args: RunArgs, config: &CommandSystemConfig) -> Result<(), Box<dyn std::error::Error>> {
    log_op_start!("run_scripts", scripts = args.scripts.len());
    let start = Instant::now();

    let demo = DemoConsole::build(config)?;
    for script in &args.scripts {
        let text = std::fs::read_to_string(script)
            .map_err(|e| format!("{}: {}", script.display(), e))?;
        demo.console.queue_commands(&text)?;
    }

    while demo.system.pending_commands() > 0
        && !demo.quit_requested()
        && demo.host.borrow().frames < args.max_frames
    {
        demo.frame();
    }

    let pending = demo.system.pending_commands();
    if pending > 0 && !demo.quit_requested() {
        tracing::warn!(
            component = module_path!(),
            op = "run_scripts",
            pending = pending,
            "Frame limit reached with commands pending"
        );
    }

    log_op_end!(
        "run_scripts",
        duration_ms = start.elapsed().as_millis() as u64,
        frames = demo.host.borrow().frames
    );

    if args.dump_vars {
        println!("{}", serde_json::to_string_pretty(&demo.dump_variables())?);
    }

    Ok(())
}
