//! Environment configuration, read once at cold start.

use gallery_atoms::{GalleryError, Result};
use std::env;

pub const TABLE_NAME_VAR: &str = "DYNAMODB_TABLE";
pub const THUMBNAILS_BUCKET_VAR: &str = "THUMBNAILS_BUCKET";

fn required(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GalleryError::MissingConfig(name)),
    }
}

/// Metadata table name
pub fn table_name() -> Result<String> {
    required(TABLE_NAME_VAR)
}

/// Bucket thumbnails are written to
pub fn thumbnails_bucket() -> Result<String> {
    required(THUMBNAILS_BUCKET_VAR)
}

/// Settings of the upload-triggered analysis function
#[derive(Debug, Clone)]
pub struct ProcessImageConfig {
    pub table_name: String,
    pub thumbnails_bucket: String,
}

impl ProcessImageConfig {
    pub fn from_env() -> Result<Self> {
        Ok(ProcessImageConfig {
            table_name: table_name()?,
            thumbnails_bucket: thumbnails_bucket()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test touches the process environment so nothing races on it
    #[test]
    fn test_required_variables() {
        env::remove_var(TABLE_NAME_VAR);
        assert!(matches!(
            table_name(),
            Err(GalleryError::MissingConfig(TABLE_NAME_VAR))
        ));

        env::set_var(TABLE_NAME_VAR, "  ");
        assert!(table_name().is_err());

        env::set_var(TABLE_NAME_VAR, "gallery-images");
        env::set_var(THUMBNAILS_BUCKET_VAR, "gallery-thumbs");
        let config = ProcessImageConfig::from_env().unwrap();
        assert_eq!(config.table_name, "gallery-images");
        assert_eq!(config.thumbnails_bucket, "gallery-thumbs");

        env::remove_var(THUMBNAILS_BUCKET_VAR);
        assert_eq!(
            ProcessImageConfig::from_env().unwrap_err().to_string(),
            "THUMBNAILS_BUCKET must be set"
        );
    }
}
