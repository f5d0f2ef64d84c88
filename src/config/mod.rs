mod defaults;
mod loader;
mod types;
mod validation;

pub use loader::{find_default_config_file, load_config, parse_config_file, CONFIG_FILES};
pub use types::{Config, FailurePolicy};
pub use validation::validate_config;
