pub mod config_loader;
pub mod constants;
pub mod truncate;

pub use config_loader::*;
pub use constants::*;
pub use truncate::truncate_chars;
