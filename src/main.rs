//! rkbackup - Chunked flash backup through rkdeveloptool
//!
//! Reads the flash geometry and partition table from a device in Rockchip
//! download mode and copies the whole disk, or each partition, into files
//! that stay below the tool's 2GB single-read limit.
//!
//! # Architecture
//!
//! The parsing, planning and run state machine live in `rkbackup-core` and
//! talk to the device only through its `FlashTool` trait. Backends:
//! - **rkdeveloptool** - spawns the real executable for every request
//! - **dummy** - emulated device for testing without hardware

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use rkbackup_core::CancelToken;

/// Exit status of a run stopped with Ctrl-C
const EXIT_CANCELLED: i32 = 130;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Backup(args) => {
            let cancel = CancelToken::new();
            let handler_token = cancel.clone();
            ctrlc::set_handler(move || {
                log::warn!("Interrupted, stopping after the current read");
                handler_token.cancel();
            })?;

            let mut tool = programmers::open_tool(&cli.tool)?;
            let outcome = commands::backup::run_backup(tool.as_mut(), &args, &cancel)?;
            if !outcome.is_completed() {
                std::process::exit(EXIT_CANCELLED);
            }
            Ok(())
        }
        Commands::Info => {
            let mut tool = programmers::open_tool(&cli.tool)?;
            commands::info::run_info(tool.as_mut())
        }
        Commands::ListTools => {
            commands::list_tools();
            Ok(())
        }
    }
}
