//! Lookup of bundled sample data files.
//!
//! Known file names are resolved against the sample-data directory. Unknown
//! names and files missing on disk resolve to `None`; callers must check for
//! absence.

use std::path::{Path, PathBuf};

/// Environment variable overriding the sample-data directory.
pub const SAMPLE_DATA_ENV: &str = "GEO_SAMPLE_DATA_DIR";

/// Every file name the registry knows, with its location inside the
/// sample-data directory.
const KNOWN_FILES: &[(&str, &str)] = &[
    ("alps_dem.asc", "dem/alps_dem.asc"),
    ("innsbruck_stations.csv", "stations/innsbruck_stations.csv"),
    ("tyrol_outline.geojson", "shapes/tyrol_outline.geojson"),
];

/// Registry of bundled sample files.
#[derive(Debug, Clone)]
pub struct DemoFiles {
    data_dir: PathBuf,
}

impl Default for DemoFiles {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DemoFiles {
    /// Registry reading from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Registry using `GEO_SAMPLE_DATA_DIR`, falling back to the bundled
    /// `sample-data/` directory at the workspace root.
    pub fn from_env() -> Self {
        match std::env::var(SAMPLE_DATA_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir),
            _ => Self::new(bundled_data_dir()),
        }
    }

    /// The directory the registry resolves against.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Names of all known sample files.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        KNOWN_FILES.iter().map(|(name, _)| *name)
    }

    /// Absolute path of a known sample file, `None` if the name is unknown or
    /// the file is not present.
    pub fn get(&self, name: &str) -> Option<PathBuf> {
        let (_, relative) = KNOWN_FILES.iter().find(|(known, _)| *known == name)?;
        let path = self.data_dir.join(relative);
        if !path.is_file() {
            tracing::debug!(name, path = %path.display(), "Known demo file missing on disk");
            return None;
        }
        path.canonicalize().ok()
    }
}

/// Look up a sample file using the default registry.
pub fn get_demo_file(name: &str) -> Option<PathBuf> {
    DemoFiles::from_env().get(name)
}

fn bundled_data_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.join("sample-data"))
        .unwrap_or_else(|| PathBuf::from(manifest_dir).join("sample-data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_file_in_custom_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dem")).unwrap();
        std::fs::write(dir.path().join("dem/alps_dem.asc"), "ncols 1\n").unwrap();

        let registry = DemoFiles::new(dir.path());
        let path = registry.get("alps_dem.asc").unwrap();
        assert!(path.is_absolute());
        assert!(path.exists());
    }

    #[test]
    fn test_known_name_missing_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DemoFiles::new(dir.path());
        assert!(registry.get("alps_dem.asc").is_none());
    }

    #[test]
    fn test_unknown_name() {
        let registry = DemoFiles::new(bundled_data_dir());
        assert!(registry.get("dummy").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_names_listed() {
        let registry = DemoFiles::new(bundled_data_dir());
        assert!(registry.names().any(|n| n == "innsbruck_stations.csv"));
    }
}
