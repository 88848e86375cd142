//! geotool: command-line front end for the geotool crates.
//!
//! Resolves cache paths, reads shapefiles through the freshness-checked
//! cache, builds local transverse Mercator grids and locates sample data.
//! Reports are printed to stdout as JSON; logs go to stderr.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use geo_cache::ShapeCache;
use geo_common::{CacheConfig, DemoFiles};
use projection::PixelOrder;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use commands::GridRequest;

#[derive(Parser, Debug)]
#[command(name = "geotool")]
#[command(about = "Shape cache, local grids and sample data")]
struct Args {
    /// Cache root directory
    #[arg(long, env = "GEO_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Log level or filter directive
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cache artifact path of a source file
    CachePath {
        source: PathBuf,
    },

    /// Read a shapefile and summarize it
    Read {
        source: PathBuf,

        /// Bypass the cache
        #[arg(long)]
        no_cache: bool,

        /// Include per-feature bounding boxes and attributes
        #[arg(long)]
        features: bool,
    },

    /// Build a local transverse Mercator grid
    Grid {
        /// Center longitude (degrees)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Center latitude (degrees)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Full width in meters
        #[arg(long)]
        width: f64,

        /// Full height in meters
        #[arg(long)]
        height: f64,

        #[arg(long)]
        nx: Option<usize>,

        #[arg(long)]
        ny: Option<usize>,

        /// Pixel size in meters (excludes --nx/--ny)
        #[arg(long)]
        resolution: Option<f64>,

        /// Row origin, `ll` or `ul`
        #[arg(long, default_value = "ll")]
        order: PixelOrder,

        /// Reference pixel centers instead of corners
        #[arg(long)]
        center: bool,
    },

    /// Locate a bundled sample file, or list them all
    Demo {
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing; RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let config = match &args.cache_dir {
        Some(dir) => CacheConfig::new(dir.clone()),
        None => CacheConfig::from_env(),
    };
    debug!(root = %config.root().display(), "Cache configuration");

    match args.command {
        Command::CachePath { source } => {
            let cache = ShapeCache::new(config)?;
            print_json(&commands::cache_path(&cache, &source)?)
        }
        Command::Read {
            source,
            no_cache,
            features,
        } => {
            let cache = ShapeCache::new(config)?;
            print_json(&commands::read(&cache, &source, !no_cache, features)?)
        }
        Command::Grid {
            lon,
            lat,
            width,
            height,
            nx,
            ny,
            resolution,
            order,
            center,
        } => {
            let request = GridRequest {
                center_ll: (lon, lat),
                extent: (width, height),
                nx,
                ny,
                resolution,
                order,
                center_pixels: center,
            };
            print_json(&commands::grid(&request)?)
        }
        Command::Demo { name } => {
            print_json(&commands::demo(&DemoFiles::from_env(), name.as_deref())?)
        }
    }
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
