mod cleaning;
mod file_operations;

pub use cleaning::{clean_directory, clean_directory_async};
pub use file_operations::{copy_file, copy_public_dir, copy_public_dir_async};
