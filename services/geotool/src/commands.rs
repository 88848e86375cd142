//! Subcommand implementations.
//!
//! Each command returns a serializable report; `main` prints it as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use geo_cache::{AttributeValue, CacheStats, ShapeCache, ShapeTable};
use geo_common::{BoundingBox, DemoFiles};
use projection::{Grid, GridSize, LocalGridBuilder, PixelOrder, PixelRef};
use serde::Serialize;
use tracing::info;

/// Where a source's cache artifact lives.
#[derive(Debug, Serialize)]
pub struct CachePathReport {
    pub source: PathBuf,
    pub artifact: PathBuf,
    pub fresh: bool,
}

pub fn cache_path(cache: &ShapeCache, source: &Path) -> Result<CachePathReport> {
    let artifact = cache.cached_path(source)?;
    let fresh = cache.is_fresh(&artifact, source);
    Ok(CachePathReport {
        source: source.to_path_buf(),
        artifact,
        fresh,
    })
}

#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub bbox: Option<BoundingBox>,
    pub points: usize,
    pub attributes: BTreeMap<String, AttributeValue>,
}

#[derive(Debug, Serialize)]
pub struct ReadReport {
    pub source: PathBuf,
    pub cached: bool,
    pub records: usize,
    pub total_bounds: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<RecordSummary>,
    pub hits: u64,
    pub misses: u64,
}

/// Read a shapefile, through the cache unless `cached` is false.
pub fn read(
    cache: &ShapeCache,
    source: &Path,
    cached: bool,
    features: bool,
) -> Result<ReadReport> {
    let table: ShapeTable = cache
        .read_shapefile(source, cached)
        .with_context(|| format!("reading {}", source.display()))?;
    let CacheStats { hits, misses, .. } = cache.stats();

    info!(
        source = %source.display(),
        records = table.len(),
        cached,
        "Read shapefile"
    );

    let features = if features {
        table
            .iter()
            .map(|r| RecordSummary {
                bbox: r.bbox,
                points: r.geometry.num_points(),
                attributes: r.attributes.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(ReadReport {
        source: source.to_path_buf(),
        cached,
        records: table.len(),
        total_bounds: table.total_bounds(),
        features,
        hits,
        misses,
    })
}

/// Parameters of the `grid` command.
#[derive(Debug, Clone)]
pub struct GridRequest {
    pub center_ll: (f64, f64),
    pub extent: (f64, f64),
    pub nx: Option<usize>,
    pub ny: Option<usize>,
    pub resolution: Option<f64>,
    pub order: PixelOrder,
    pub center_pixels: bool,
}

#[derive(Debug, Serialize)]
pub struct GridReport {
    pub nx: usize,
    pub ny: usize,
    pub dx: f64,
    pub dy: f64,
    pub order: String,
    pub corner: (f64, f64),
    /// Projected footprint
    pub extent: BoundingBox,
    /// Geographic bounds of the pixel corners
    pub ll_bounds: BoundingBox,
    /// Lon/lat of the first and last pixel centers
    pub first_center_ll: (f64, f64),
    pub last_center_ll: (f64, f64),
}

impl GridReport {
    fn from_grid(grid: &Grid) -> Self {
        let centers = grid.center_grid();
        Self {
            nx: grid.nx(),
            ny: grid.ny(),
            dx: grid.dx(),
            dy: grid.dy(),
            order: grid.order().to_string(),
            corner: grid.corner(),
            extent: grid.extent(),
            ll_bounds: grid.ll_bounds(),
            first_center_ll: centers.ij_to_ll(0.0, 0.0),
            last_center_ll: centers.ij_to_ll((grid.nx() - 1) as f64, (grid.ny() - 1) as f64),
        }
    }
}

pub fn grid(request: &GridRequest) -> Result<GridReport> {
    let size = match (request.nx, request.ny, request.resolution) {
        (None, None, None) => GridSize::Auto,
        (Some(nx), None, None) => GridSize::Nx(nx),
        (None, Some(ny), None) => GridSize::Ny(ny),
        (Some(nx), Some(ny), None) => GridSize::NxNy(nx, ny),
        (None, None, Some(r)) => GridSize::Resolution(r),
        _ => return Err(anyhow!("--resolution cannot be combined with --nx or --ny")),
    };
    let pixel_ref = if request.center_pixels {
        PixelRef::Center
    } else {
        PixelRef::Corner
    };

    let grid = LocalGridBuilder::new(request.center_ll, request.extent)
        .size(size)
        .order(request.order)
        .pixel_ref(pixel_ref)
        .build()?;

    Ok(GridReport::from_grid(&grid))
}

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub data_dir: PathBuf,
    pub files: BTreeMap<String, Option<PathBuf>>,
}

/// Resolve one demo file, or list all of them when `name` is `None`.
pub fn demo(demo_files: &DemoFiles, name: Option<&str>) -> Result<DemoReport> {
    let files = match name {
        Some(name) => {
            let path = demo_files
                .get(name)
                .ok_or_else(|| anyhow!("unknown or missing demo file: {}", name))?;
            BTreeMap::from([(name.to_string(), Some(path))])
        }
        None => demo_files
            .names()
            .map(|n| (n.to_string(), demo_files.get(n)))
            .collect(),
    };

    Ok(DemoReport {
        data_dir: demo_files.data_dir().to_path_buf(),
        files,
    })
}
