pub mod config;
pub mod csv;
pub mod format;
pub mod json;

pub use config::{load_vehicle, parse_vehicle, save_vehicle};
pub use format::format_with_prefix;
