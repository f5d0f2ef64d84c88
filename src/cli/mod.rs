pub mod commands;
pub mod logging;
pub mod types;

use std::path::Path;

use clap::Parser;
use log::error;

use crate::cli::commands::{handle_build_command, handle_clean_command, resolve_arg, BuildArgs};

/// Run the command-line interface and return the process exit code
pub async fn run() -> i32 {
    let cli = types::Cli::parse();

    logging::init_logging(logging::level_for(cli.debug, cli.quiet));

    let source = resolve_arg(cli.source.as_deref().unwrap_or_else(|| Path::new(".")));

    let result = match cli.command {
        Some(types::Commands::Build { config, destination, no_minify, fail_on_error, concurrency }) => {
            let args = BuildArgs { config, destination, no_minify, fail_on_error, concurrency };
            handle_build_command(&source, args).await
        }
        Some(types::Commands::Clean { config }) => handle_clean_command(&source, config).await,
        // Default to build command if none provided
        None => handle_build_command(&source, BuildArgs::default()).await,
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}
