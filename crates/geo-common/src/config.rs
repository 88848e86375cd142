//! Configuration for the on-disk cache.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{GeoError, GeoResult};

/// Environment variable overriding the cache root directory.
pub const CACHE_DIR_ENV: &str = "GEO_CACHE_DIR";

/// Directory name used below the system temp dir when nothing is configured.
const DEFAULT_CACHE_DIR_NAME: &str = "geotool-cache";

/// Configuration for the shape cache.
///
/// The cache root is passed explicitly to every cache instance; nothing in
/// the crates reads it from a global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Top-level directory holding every cached artifact.
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join(DEFAULT_CACHE_DIR_NAME),
        }
    }
}

impl CacheConfig {
    /// Configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(CACHE_DIR_ENV) {
            if !val.trim().is_empty() {
                config.root = PathBuf::from(val);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GeoResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(GeoError::Config("cache root must not be empty".to_string()));
        }

        if self.root.exists() && !self.root.is_dir() {
            return Err(GeoError::Config(format!(
                "cache root exists but is not a directory: {}",
                self.root.display()
            )));
        }

        Ok(())
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_under_temp_dir() {
        let config = CacheConfig::default();
        assert!(config.root.starts_with(std::env::temp_dir()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_root_rejected() {
        let config = CacheConfig::new("");
        assert!(matches!(config.validate(), Err(GeoError::Config(_))));
    }

    #[test]
    fn test_file_as_root_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = CacheConfig::new(file.path());
        assert!(config.validate().is_err());
    }
}
