pub mod page;
pub mod scripts;
pub mod site;

pub use scripts::{BuildScript, ScriptRegistry};
pub use site::{build_site, BuildReport, Pipeline};
