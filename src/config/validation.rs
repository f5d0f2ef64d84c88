use std::path::Path;

use log::warn;

use crate::config::Config;
use crate::markdown::plugin_by_name;
use crate::utils::error::{PagemillError, Result};

/// Validate the configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.concurrency == 0 {
        return Err(PagemillError::Config("concurrency must be at least 1".into()));
    }

    validate_collections(config)?;
    validate_markdown_plugins(config)?;
    validate_out_dir(config)?;

    if !config.pages_dir.is_dir() {
        warn!("Pages directory not found: {}", config.pages_dir.display());
    }

    Ok(())
}

/// Collection names are relative directory paths below the pages root
fn validate_collections(config: &Config) -> Result<()> {
    for name in &config.collections {
        let path = Path::new(name);
        let invalid = name.trim().is_empty()
            || path.is_absolute()
            || path.components().any(|c| !matches!(c, std::path::Component::Normal(_)));
        if invalid {
            return Err(PagemillError::Config(format!("Invalid collection name: '{}'", name)));
        }
    }
    Ok(())
}

fn validate_markdown_plugins(config: &Config) -> Result<()> {
    match config.markdown_plugins.iter().find(|name| plugin_by_name(name).is_none()) {
        Some(name) => Err(PagemillError::Config(format!("Unknown markdown plugin: '{}'", name))),
        None => Ok(()),
    }
}

/// The output directory is emptied before every build, so it must not
/// contain or sit inside any input.
fn validate_out_dir(config: &Config) -> Result<()> {
    let out = &config.out_dir;
    if out == &config.source || config.source.starts_with(out) {
        return Err(PagemillError::Config(format!(
            "Output directory {} must not contain the site root",
            out.display()
        )));
    }

    let inputs = [
        ("pages", &config.pages_dir),
        ("templates", &config.templates_dir),
        ("partials", &config.partials_dir),
        ("public", &config.public_dir),
    ];
    for (name, dir) in inputs {
        if dir.starts_with(out) || out.starts_with(dir) {
            return Err(PagemillError::Config(format!(
                "Output directory {} overlaps the {} directory {}",
                out.display(),
                name,
                dir.display()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::for_site("/site")
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn test_zero_concurrency() {
        let config = Config { concurrency: 0, ..config() };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_collection_names() {
        for name in ["", "../posts", "/posts", "./posts"] {
            let config = Config { collections: vec![name.to_string()], ..config() };
            assert!(validate_config(&config).is_err(), "{:?} accepted", name);
        }
        let config = Config { collections: vec!["posts/recipes".to_string()], ..config() };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_markdown_plugin() {
        let config = Config { markdown_plugins: vec!["emoji".into()], ..config() };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_out_dir_overlap() {
        let root = Config { out_dir: "/site".into(), ..config() };
        assert!(validate_config(&root).is_err());

        let inside_pages = Config { out_dir: "/site/pages/dist".into(), ..config() };
        assert!(validate_config(&inside_pages).is_err());

        let same_as_public = Config { out_dir: "/site/public".into(), ..config() };
        assert!(validate_config(&same_as_public).is_err());
    }
}
