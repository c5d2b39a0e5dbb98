//! Filesystem module.
//!
//! Provides:
//! - Output directory management
//! - Filename validation

pub mod naming;
pub mod paths;

pub use naming::sanitize_filename;
pub use paths::ensure_output_dir;
