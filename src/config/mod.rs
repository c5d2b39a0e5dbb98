//! Configuration module for the imgdownloader.
//!
//! This module handles:
//! - Loading provider settings from JSON or TOML files
//! - Validating run parameters

pub mod loader;
pub mod validation;

pub use loader::{Config, CONFIG_FILE_STEM};
pub use validation::{
    parse_key_val, validate_failure_limit, validate_tag, validate_timeout, validate_workers,
};
