//! CLI entry point for pc4_atlas.
//!
//! Provides subcommands for aggregating listings by postal district, printing
//! catalog and district analytics, searching listings and enriching a PC4
//! GeoJSON layer for the map.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pc4_atlas::analyzers::aggregate::district_report;
use pc4_atlas::analyzers::summary::{DEFAULT_MIN_LISTINGS, district_profile, district_summaries};
use pc4_atlas::{
    ListingKind,
    fetch::{load_listings, load_source},
    filter::{ListingFilter, SortBy},
    geo::enrich_feature_collection,
    output::{append_district_rows, print_json, write_json},
    state::DashboardState,
    stats::distinct_categories,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "pc4_atlas")]
#[command(about = "Explore restaurant and farm listings by Amsterdam postal district", long_about = None)]
struct Cli {
    /// Path or URL of the listing JSON (falls back to PC4_ATLAS_SOURCE)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Which dataset the source holds
    #[arg(short, long, global = true, value_enum, default_value = "restaurants")]
    kind: ListingKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate listings per PC4 district
    Districts {
        /// Write the district mapping as JSON to this path
        #[arg(long)]
        json: Option<String>,

        /// Append one CSV row per district to this path
        #[arg(long)]
        csv: Option<String>,

        /// Gzip the JSON output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Summary table of districts with enough listings
    Summary {
        #[arg(short, long, default_value_t = DEFAULT_MIN_LISTINGS)]
        min_listings: usize,
    },
    /// Detailed quality profile of one district
    Profile {
        /// 4-digit postal prefix, e.g. 1012
        pc4: String,

        #[arg(short, long, default_value_t = DEFAULT_MIN_LISTINGS)]
        min_listings: usize,
    },
    /// Catalog-wide statistics
    Stats {
        /// Also list every distinct category
        #[arg(long, default_value_t = false)]
        categories: bool,
    },
    /// Filter and sort listings
    Search {
        /// Case-insensitive match on name, address or category
        #[arg(short, long)]
        query: Option<String>,

        #[arg(long)]
        min_rating: Option<f64>,

        #[arg(long)]
        max_rating: Option<f64>,

        /// Case-insensitive category substring
        #[arg(short, long)]
        category: Option<String>,

        #[arg(long, value_enum, default_value = "rating")]
        sort: SortBy,

        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Merge district statistics into a PC4 GeoJSON FeatureCollection
    Map {
        /// PC4 GeoJSON file or URL
        #[arg(long)]
        geojson: String,

        /// Output path for the enriched GeoJSON
        #[arg(short, long, default_value = "pc4_map.geojson")]
        out: String,

        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_logging()?;

    let cli = Cli::parse();
    let source = resolve_source(cli.source)?;

    let listings = load_listings(&source, cli.kind).await.inspect_err(|e| {
        error!(source = %source, error = %e, "Failed to load listings");
    })?;
    info!(source = %source, kind = %cli.kind, count = listings.len(), "Listings loaded");

    let mut state = DashboardState::new(cli.kind, listings);

    match cli.command {
        Commands::Districts { json, csv, gzip } => {
            let report = district_report(&state.listings);
            if report.skipped > 0 {
                warn!(skipped = report.skipped, "Listings without a recognisable postcode were skipped");
            }
            info!(districts = report.districts.len(), "Districts aggregated");

            if let Some(path) = csv {
                append_district_rows(&path, &report.districts)?;
                info!(path = %path, "District CSV rows appended");
            }

            match json {
                Some(path) => {
                    let written = write_json(&path, &report, gzip)?;
                    info!(path = %written.display(), "District JSON written");
                }
                None => print_json(&report)?,
            }
        }
        Commands::Summary { min_listings } => {
            let rows = district_summaries(&state.listings, min_listings);
            info!(districts = rows.len(), min_listings, "District summary built");
            print_json(&rows)?;
        }
        Commands::Profile { pc4, min_listings } => {
            match district_profile(&state.listings, &pc4, min_listings) {
                Some(profile) => print_json(&profile)?,
                None => bail!("district {pc4} not found or has fewer than {min_listings} listings"),
            }
        }
        Commands::Stats { categories } => {
            print_json(&state.stats())?;
            if categories {
                print_json(&distinct_categories(&state.listings))?;
            }
        }
        Commands::Search {
            query,
            min_rating,
            max_rating,
            category,
            sort,
            limit,
        } => {
            state.filter = ListingFilter {
                search: query,
                min_rating,
                max_rating,
                category,
                sort_by: sort,
                limit,
            };

            let visible = state.visible();
            info!(
                total = state.listings.len(),
                matched = visible.len(),
                filtered = !state.filter.is_empty(),
                "Search complete"
            );

            for listing in &visible {
                info!(
                    name = %listing.name,
                    rating = ?listing.rating,
                    reviews = ?listing.review_count,
                    category = listing.category.as_deref().unwrap_or("-"),
                    address = listing.address.as_deref().unwrap_or("-"),
                    "Listing"
                );
            }
        }
        Commands::Map { geojson, out, gzip } => {
            let bytes = load_source(&geojson).await?;
            let collection: serde_json::Value = serde_json::from_slice(&bytes)
                .with_context(|| format!("{geojson} is not valid JSON"))?;

            let enriched = enrich_feature_collection(collection, &state.districts(), state.kind)?;
            let written = write_json(&out, &enriched, gzip)?;
            info!(path = %written.display(), "Enriched GeoJSON written");
        }
    }

    Ok(())
}

/// Picks the listing source from the CLI flag or `PC4_ATLAS_SOURCE`.
fn resolve_source(flag: Option<String>) -> Result<String> {
    match flag.or_else(|| std::env::var("PC4_ATLAS_SOURCE").ok()) {
        Some(source) if !source.trim().is_empty() => Ok(source),
        _ => bail!("no listing source given; pass --source or set PC4_ATLAS_SOURCE"),
    }
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard must stay alive for the file writer to flush.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/pc4_atlas.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("pc4_atlas.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}
