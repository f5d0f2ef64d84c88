use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI parser structure
#[derive(Parser, Debug)]
#[command(name = "pagemill")]
#[command(about = "Static site builder: pages, templates and partials in, HTML out", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Site root (defaults to ./)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub source: Option<PathBuf>,

    /// Enable verbose debugging
    #[arg(short = 'g', long, default_value_t = false, global = true)]
    pub debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, default_value_t = false, global = true, conflicts_with = "debug")]
    pub quiet: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build your site
    #[command(alias = "b")]
    Build {
        /// Custom configuration file
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Output directory (overrides out_dir)
        #[arg(short, long, value_name = "DIR")]
        destination: Option<PathBuf>,

        /// Write HTML without minifying it
        #[arg(long, default_value_t = false)]
        no_minify: bool,

        /// Fail the build if any page fails
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Maximum number of pages processed at once
        #[arg(short = 'j', long, value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Remove the generated site without building
    Clean {
        /// Custom configuration file
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,
    },
}
