pub mod summary;
pub mod utils;

pub use summary::{outcome_line, print_export_summary};
pub use utils::{plural, truncate};
