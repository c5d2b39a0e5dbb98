//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{print_error, print_info, print_run_summary, print_success, print_warning};
pub use progress::{create_item_bar, create_spinner};
pub use stats::print_batch_stats;
