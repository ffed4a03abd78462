//! Interactive console
//!
//! Each stdin line is queued and run as one frame. Pending `wait`s carry over
//! to the next line. Ends on EOF or `quit`.

use super::console::DemoConsole;
use clap::Args;
use convar_core::CommandSystemConfig;
use std::io::{BufRead, Write};

#[derive(Debug, Args)]
pub struct ReplArgs {
    /// Prompt printed before each line
    #[arg(long, default_value = "] ")]
    pub prompt: String,
}

/// Execute repl command
pub fn execute(args: ReplArgs, config: &CommandSystemConfig) -> Result<(), Box<dyn std::error::Error>> {
    let demo = DemoConsole::build(config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        write!(stdout, "{}", args.prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if !line.trim().is_empty() {
            demo.console.queue_commands(&line)?;
        }
        demo.frame();

        if demo.quit_requested() {
            break;
        }
    }

    Ok(())
}
