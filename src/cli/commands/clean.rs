use std::path::{Path, PathBuf};

use log::info;

use crate::cli::commands::resolve_arg;
use crate::config;
use crate::directory::clean_directory_async;
use crate::utils::error::Result;

/// Handle the clean command
pub async fn handle_clean_command(source: &Path, config_file: Option<PathBuf>) -> Result<()> {
    let config = config::load_config(source, config_file.map(|p| resolve_arg(&p)))?;

    info!("Cleaning site at {}", config.out_dir.display());
    clean_directory_async(&config.out_dir).await?;
    info!("Site cleaned successfully");
    Ok(())
}
