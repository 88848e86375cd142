//! Source formats the cache accepts.

use std::path::Path;

use geo_common::{GeoError, GeoResult};

/// Extension of cached artifacts.
pub const ARTIFACT_EXTENSION: &str = "json";

/// Closed set of source formats with a reader and a cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// ESRI shapefile (`.shp` with its `.shx`/`.dbf` siblings)
    Shapefile,
}

impl SourceFormat {
    /// Look up a format by file extension (case-insensitive, without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "shp" => Some(Self::Shapefile),
            _ => None,
        }
    }

    /// Resolve the format of a source path.
    ///
    /// Fails with `InvalidInput` for missing or unrecognized extensions.
    pub fn from_path(path: &Path) -> GeoResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        Self::from_extension(ext).ok_or_else(|| {
            GeoError::invalid_input(format!(
                "file extension not recognised: '{}' ({})",
                ext,
                path.display()
            ))
        })
    }

    /// Directory below the cache root holding this format's artifacts.
    pub fn cache_namespace(&self) -> &'static str {
        match self {
            Self::Shapefile => "shp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapefile_extensions() {
        assert_eq!(
            SourceFormat::from_path(Path::new("/data/f1.shp")).unwrap(),
            SourceFormat::Shapefile
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("F1.SHP")).unwrap(),
            SourceFormat::Shapefile
        );
    }

    #[test]
    fn test_unknown_extensions_rejected() {
        for name in ["f1.sph", "f1.splash", "f1", "f1.shp.bak", ".shp"] {
            let err = SourceFormat::from_path(Path::new(name)).unwrap_err();
            assert!(err.is_invalid_input(), "{} should be rejected", name);
        }
    }
}
