//! Run parameter validation.

use crate::error::{Error, Result};

/// Validate the search tag.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "tag".to_string(),
            message: "Tag is not supplied".to_string(),
        });
    }

    Ok(())
}

/// Validate the download worker count.
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(Error::ConfigValidation {
            field: "workers".to_string(),
            message: "At least one worker is required".to_string(),
        });
    }

    Ok(())
}

/// Validate the per-request timeout in seconds.
pub fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "timeout".to_string(),
            message: "Timeout must be at least one second".to_string(),
        });
    }

    Ok(())
}

/// Validate the failure count that cancels a batch.
pub fn validate_failure_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::ConfigValidation {
            field: "max-failures".to_string(),
            message: "Failure limit must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Parse a `key=value` provider setting.
pub fn parse_key_val(input: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", input))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", input));
    }

    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("sunset").is_ok());
        assert!(validate_tag("").is_err());
        assert!(validate_tag(" \t").is_err());
    }

    #[test]
    fn test_validate_workers() {
        assert!(validate_workers(1).is_ok());
        assert!(validate_workers(0).is_err());
    }

    #[test]
    fn test_validate_timeout() {
        assert!(validate_timeout(30).is_ok());
        assert!(validate_timeout(0).is_err());
    }

    #[test]
    fn test_validate_failure_limit() {
        assert!(validate_failure_limit(1).is_ok());
        assert!(matches!(
            validate_failure_limit(0),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("api_key=abc").unwrap(),
            ("api_key".to_string(), "abc".to_string())
        );
        // Values may themselves contain '='
        assert_eq!(
            parse_key_val("access_token=a=b").unwrap(),
            ("access_token".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=abc").is_err());
    }
}
