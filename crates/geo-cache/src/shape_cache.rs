//! On-disk cache for products derived from source files.
//!
//! Artifacts are keyed by the source's absolute path and modification time:
//!
//! ```text
//! <root>/<format>/<absolute source path>/<source mtime ns>.json
//! ```
//!
//! A rewritten source therefore maps to a new artifact path. An artifact is
//! only served while its own mtime is not older than the source's; otherwise
//! the reader runs again and the result replaces every older artifact of that
//! source.

use std::ffi::OsString;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use geo_common::{CacheConfig, GeoError, GeoResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::format::{SourceFormat, ARTIFACT_EXTENSION};
use crate::reader;
use crate::table::ShapeTable;

/// A cached artifact as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    /// Absolute path of the source the payload was derived from
    pub source: PathBuf,
    /// Source modification time (nanoseconds since the epoch) at read time
    pub source_mtime_ns: u64,
    /// When the artifact was written
    pub created_at: DateTime<Utc>,
    pub payload: T,
}

/// Counters for one cache instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Misses caused by a newer source replacing an older artifact
    pub stale: u64,
    pub writes: u64,
    /// Reads with caching disabled
    pub bypassed: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Where the artifact of a source lives and which source state it reflects.
struct ArtifactLocation {
    artifact: PathBuf,
    source: PathBuf,
    source_mtime_ns: u64,
}

/// Freshness-checked cache of reader output.
///
/// Single writer per cache root is assumed. Artifacts are written to a
/// temporary file and renamed into place, so readers never see a partial
/// artifact.
pub struct ShapeCache {
    config: CacheConfig,
    stats: Mutex<CacheStats>,
}

impl ShapeCache {
    /// Create a cache rooted at `config.root`.
    ///
    /// The root directory is created lazily on the first write.
    pub fn new(config: CacheConfig) -> GeoResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: Mutex::new(CacheStats::default()),
        })
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        self.config.root()
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Path of the artifact caching `source` in its current state.
    ///
    /// Paths that already point at an artifact inside the cache root are
    /// returned unchanged. Never creates or deletes anything.
    pub fn cached_path(&self, source: &Path) -> GeoResult<PathBuf> {
        if self.is_artifact_path(source) {
            return Ok(source.to_path_buf());
        }
        Ok(self.locate(source)?.artifact)
    }

    /// True if `artifact` exists and is not older than `source`.
    pub fn is_fresh(&self, artifact: &Path, source: &Path) -> bool {
        match (modified(artifact), modified(source)) {
            (Ok(artifact_mtime), Ok(source_mtime)) => artifact_mtime >= source_mtime,
            _ => false,
        }
    }

    /// Read `source` through `reader`, caching the result when `cached` is set.
    ///
    /// With `cached == false` the cache directory is never touched. Errors
    /// returned by `reader` are passed through unchanged.
    pub fn cached_read<T, E, F>(&self, source: &Path, reader: F, cached: bool) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<GeoError>,
        F: FnOnce(&Path) -> Result<T, E>,
    {
        SourceFormat::from_path(source)?;

        if !cached {
            self.record(|s| s.bypassed += 1);
            return reader(source);
        }

        let location = self.locate(source)?;

        if self.is_fresh(&location.artifact, &location.source) {
            match self.load::<T>(&location) {
                Ok(payload) => {
                    debug!(artifact = %location.artifact.display(), "Cache hit");
                    self.record(|s| s.hits += 1);
                    return Ok(payload);
                }
                Err(e) => {
                    warn!(
                        artifact = %location.artifact.display(),
                        error = %e,
                        "Unreadable cache artifact, reading source again"
                    );
                }
            }
        }

        let stale = self.has_other_artifacts(&location.artifact);
        debug!(
            source = %location.source.display(),
            artifact = %location.artifact.display(),
            stale,
            "Cache miss"
        );
        self.record(|s| {
            s.misses += 1;
            if stale {
                s.stale += 1;
            }
        });

        let payload = reader(source)?;
        self.store(&location, &payload)?;
        self.remove_other_artifacts(&location.artifact);

        Ok(payload)
    }

    /// Read a shapefile, optionally through the cache.
    pub fn read_shapefile(&self, path: &Path, cached: bool) -> GeoResult<ShapeTable> {
        self.cached_read(path, reader::read_shapefile, cached)
    }

    fn is_artifact_path(&self, path: &Path) -> bool {
        path.starts_with(self.config.root())
            && path.extension().and_then(|e| e.to_str()) == Some(ARTIFACT_EXTENSION)
    }

    fn locate(&self, source: &Path) -> GeoResult<ArtifactLocation> {
        let format = SourceFormat::from_path(source)?;
        let absolute = fs::canonicalize(source)?;
        let source_mtime_ns = mtime_nanos(&absolute)?;

        let artifact = self
            .config
            .root()
            .join(format.cache_namespace())
            .join(mirrored_path(&absolute))
            .join(format!("{}.{}", source_mtime_ns, ARTIFACT_EXTENSION));

        Ok(ArtifactLocation {
            artifact,
            source: absolute,
            source_mtime_ns,
        })
    }

    fn load<T: DeserializeOwned>(&self, location: &ArtifactLocation) -> GeoResult<T> {
        let bytes = fs::read(&location.artifact)?;
        let envelope: CacheEnvelope<T> = serde_json::from_slice(&bytes)?;

        if envelope.source_mtime_ns != location.source_mtime_ns {
            return Err(GeoError::Serialization(format!(
                "artifact was written for source mtime {}, source is at {}",
                envelope.source_mtime_ns, location.source_mtime_ns
            )));
        }

        Ok(envelope.payload)
    }

    fn store<T: Serialize>(&self, location: &ArtifactLocation, payload: &T) -> GeoResult<()> {
        let parent = location.artifact.parent().ok_or_else(|| {
            GeoError::invalid_input(format!(
                "artifact path has no parent: {}",
                location.artifact.display()
            ))
        })?;
        fs::create_dir_all(parent)?;

        let envelope = CacheEnvelope {
            source: location.source.clone(),
            source_mtime_ns: location.source_mtime_ns,
            created_at: Utc::now(),
            payload,
        };

        let file_name = location
            .artifact
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artifact");
        let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &envelope)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &location.artifact)?;

        debug!(artifact = %location.artifact.display(), "Wrote cache artifact");
        self.record(|s| s.writes += 1);
        Ok(())
    }

    fn sibling_artifacts(&self, artifact: &Path) -> Vec<PathBuf> {
        let Some(parent) = artifact.parent() else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(parent) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.as_path() != artifact
                    && path.extension().and_then(|e| e.to_str()) == Some(ARTIFACT_EXTENSION)
            })
            .collect()
    }

    fn has_other_artifacts(&self, artifact: &Path) -> bool {
        !self.sibling_artifacts(artifact).is_empty()
    }

    fn remove_other_artifacts(&self, artifact: &Path) {
        for old in self.sibling_artifacts(artifact) {
            match fs::remove_file(&old) {
                Ok(()) => debug!(artifact = %old.display(), "Removed stale cache artifact"),
                Err(e) => warn!(
                    artifact = %old.display(),
                    error = %e,
                    "Failed to remove stale cache artifact"
                ),
            }
        }
    }

    fn record(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut stats);
    }
}

/// Relative path mirroring an absolute source path; the source file name
/// becomes the last directory.
///
/// A Windows prefix (`C:`, `\\?\UNC\server\share`) is kept as a leading
/// directory with every non-alphanumeric character replaced by `_`, so equal
/// paths on different drives stay apart.
fn mirrored_path(absolute: &Path) -> PathBuf {
    absolute
        .components()
        .filter_map(|c| match c {
            Component::Prefix(prefix) => {
                let encoded: String = prefix
                    .as_os_str()
                    .to_string_lossy()
                    .chars()
                    .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
                    .collect();
                Some(OsString::from(encoded))
            }
            Component::Normal(part) => Some(part.to_os_string()),
            Component::RootDir | Component::CurDir | Component::ParentDir => None,
        })
        .collect()
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

fn mtime_nanos(path: &Path) -> GeoResult<u64> {
    let since_epoch = modified(path)?
        .duration_since(UNIX_EPOCH)
        .map_err(|e| GeoError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    Ok(since_epoch.as_nanos() as u64)
}
