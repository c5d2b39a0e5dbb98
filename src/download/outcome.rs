//! Per-item download outcomes.

use std::fmt;
use std::path::PathBuf;

use crate::error::Error;
use crate::provider::ProviderItem;

/// Result of one download attempt. Exactly one is produced per submitted item.
#[derive(Debug)]
pub enum DownloadOutcome {
    Success { link: String, path: PathBuf },
    Failure { item: ProviderItem, cause: Error },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }

    /// Whether the item was skipped because the batch was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            DownloadOutcome::Failure {
                cause: Error::Cancelled,
                ..
            }
        )
    }

    /// Remote link of the item this outcome belongs to.
    pub fn link(&self) -> &str {
        match self {
            DownloadOutcome::Success { link, .. } => link,
            DownloadOutcome::Failure { item, .. } => &item.link,
        }
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadOutcome::Success { link, path } => {
                write!(f, "Successfully downloaded {} to {}", link, path.display())
            }
            DownloadOutcome::Failure { item, cause } => {
                write!(f, "Failed to download {} as {}: {}", item.link, item.filename, cause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lines() {
        let success = DownloadOutcome::Success {
            link: "http://example.com/1.jpg".into(),
            path: PathBuf::from("out/1.jpg"),
        };
        assert_eq!(
            success.to_string(),
            "Successfully downloaded http://example.com/1.jpg to out/1.jpg"
        );

        let failure = DownloadOutcome::Failure {
            item: ProviderItem::new("2.jpg", "http://example.com/2.jpg"),
            cause: Error::Fetch("HTTP 404".into()),
        };
        assert!(failure.to_string().starts_with("Failed to download http://example.com/2.jpg"));
        assert!(!failure.is_success());
        assert!(!failure.is_cancelled());
        assert_eq!(failure.link(), "http://example.com/2.jpg");
    }

    #[test]
    fn test_cancelled() {
        let outcome = DownloadOutcome::Failure {
            item: ProviderItem::new("3.jpg", "http://example.com/3.jpg"),
            cause: Error::Cancelled,
        };
        assert!(outcome.is_cancelled());
    }
}
