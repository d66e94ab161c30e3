//! shade3d - flat-shaded OBJ renderer for the terminal
//!
//! Controls:
//!   - Q/ESC/Ctrl-C: Quit

mod cli;

use std::process::ExitCode;

use clap::Parser;
use shade3d_terminal::{run_headless, run_interactive};
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Err(e) = cli::initialize_tracing(&cli) {
        eprintln!("failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    let config = match cli.scene_config() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.headless {
        run_headless(config, cli.frames)
    } else {
        run_interactive(config)
    };

    match result {
        Ok(stats) => {
            info!(
                frames = stats.frames,
                drawn = stats.drawn,
                culled = stats.culled,
                "shut down"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("shade3d stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
