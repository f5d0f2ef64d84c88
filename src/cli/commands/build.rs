use std::path::{Path, PathBuf};

use log::info;

use crate::builder::Pipeline;
use crate::cli::commands::resolve_arg;
use crate::config::{self, FailurePolicy};
use crate::utils::error::Result;

/// Options of the build command
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub config: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub no_minify: bool,
    pub fail_on_error: bool,
    pub concurrency: Option<usize>,
}

/// Handle the build command
pub async fn handle_build_command(source: &Path, args: BuildArgs) -> Result<()> {
    let mut config = config::load_config(source, args.config.map(|p| resolve_arg(&p)))?;

    // Command line options take precedence over the configuration file
    if let Some(destination) = &args.destination {
        config.out_dir = resolve_arg(destination);
    }
    if args.no_minify {
        config.minify = false;
    }
    if args.fail_on_error {
        config.failure_policy = FailurePolicy::FailBuild;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    config::validate_config(&config)?;

    info!("Building site...");
    let report = Pipeline::new(config)?.build().await?;

    if report.is_success() {
        info!("Site built successfully in {:.2?}", report.duration);
    } else {
        info!("Site built with {} failed pages", report.failed());
    }
    Ok(())
}
