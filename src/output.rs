//! Output formatting and persistence for district statistics.
//!
//! Supports pretty-printing, JSON files (optionally gzipped) and CSV append.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::DistrictStats;
use csv::WriterBuilder;

/// Flat CSV shape of a [`DistrictStats`] entry.
#[derive(Debug, Serialize)]
struct DistrictRow<'a> {
    pc4: &'a str,
    count: usize,
    average_rating: f64,
    top_categories: String,
}

impl<'a> From<&'a DistrictStats> for DistrictRow<'a> {
    fn from(stats: &'a DistrictStats) -> Self {
        Self {
            pc4: &stats.postal_prefix,
            count: stats.count,
            average_rating: stats.average_rating,
            top_categories: stats.top_categories.join("|"),
        }
    }
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends one CSV row per district to `path`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_district_rows(path: &str, stats: &BTreeMap<String, DistrictStats>) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = stats.len(), "Appending district CSV rows");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {path}"))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on a fresh file
        .from_writer(file);

    for district in stats.values() {
        writer.serialize(DistrictRow::from(district))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `value` as pretty JSON to `path`, or gzip-compressed to `path.gz`.
///
/// Returns the path actually written.
pub fn write_json(path: &str, value: &impl Serialize, gzip: bool) -> Result<PathBuf> {
    let body = serde_json::to_vec_pretty(value)?;

    let target = if gzip {
        PathBuf::from(format!("{path}.gz"))
    } else {
        PathBuf::from(path)
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file =
        File::create(&target).with_context(|| format!("failed to create {}", target.display()))?;

    if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        file.write_all(&encoder.finish()?)?;
    } else {
        file.write_all(&body)?;
    }

    debug!(path = %target.display(), gzip, bytes = body.len(), "JSON written");
    Ok(target)
}
