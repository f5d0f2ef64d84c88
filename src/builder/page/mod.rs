mod collector;
mod model;
mod utils;

pub use collector::{collect_pages, is_page_file, load_page, PAGE_EXTENSIONS};
pub use model::Page;
pub use utils::compute_slug;
