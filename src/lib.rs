//! pagemill turns a directory of Markdown, HTML and XML pages plus Liquid
//! templates and partials into a static site.
//!
//! The build is a fixed sequence of phases driven by [`builder::Pipeline`]:
//! load pages, templates and partials concurrently, convert Markdown, group
//! dated pages into collections, then render every page in parallel.

pub mod builder;
pub mod cli;
pub mod config;
pub mod directory;
pub mod front_matter;
pub mod liquid;
pub mod markdown;
pub mod minify;
pub mod utils;

pub use builder::{build_site, BuildReport, Pipeline};
pub use config::{load_config, Config, FailurePolicy};
pub use utils::error::{PagemillError, Result};
