pub mod file_scanner;

pub use file_scanner::{load_file, scan_folder};
