//! CLI command handlers.

mod images;
mod search;

pub use images::run_images_command;
pub use search::run_search_command;
