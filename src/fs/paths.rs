//! Output directory management.

use std::path::Path;

use crate::error::{Error, Result};

/// Ensure the output directory exists, creating it and any parents.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(Error::ConfigValidation {
                field: "out".to_string(),
                message: format!("{} exists and is not a directory", path.display()),
            });
        }
        return Ok(());
    }

    tracing::debug!("Creating output directory {}", path.display());
    std::fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a").join("b");

        ensure_output_dir(&target).unwrap();
        assert!(target.is_dir());

        // Existing directories are accepted as-is
        ensure_output_dir(&target).unwrap();
    }

    #[test]
    fn test_rejects_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(matches!(
            ensure_output_dir(&file),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
