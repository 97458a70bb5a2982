//! Extract discovery and CSV loading
//!
//! Daily extracts follow the `<CATEGORY>_<YYYY-MM-DD>.csv` naming
//! convention (categories `PS` and `FS`). Discovery turns a directory
//! into a sorted list of descriptors; loading turns one descriptor into
//! a [`DailyBatch`]. Bulk loading tolerates individual bad files: a
//! batch that fails to parse is skipped and reported, never fatal.

use crate::record::{DailyBatch, SalesCategory, SalesRecord};
use crate::{Result, SalesError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One discovered extract file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDescriptor {
    pub path: PathBuf,
    pub category: SalesCategory,
    pub date: NaiveDate,
}

/// Result of a fault-tolerant bulk load
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Batches that loaded cleanly, in manifest order
    pub batches: Vec<DailyBatch>,
    /// Files that were skipped, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Raw CSV row as it appears in an extract. Missing numeric fields
/// coerce to 0 and missing names to the empty string downstream.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    item_code: String,
    #[serde(default)]
    item_name: String,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    taxable_amount: Option<f64>,
    #[serde(default)]
    tax_rate: Option<f64>,
}

impl From<RawRow> for SalesRecord {
    fn from(row: RawRow) -> Self {
        SalesRecord {
            item_code: row.item_code,
            item_name: row.item_name,
            quantity: row.quantity.unwrap_or(0.0),
            taxable_amount: row.taxable_amount.unwrap_or(0.0),
            tax_rate: row.tax_rate.unwrap_or(0.0),
            company: None,
        }
    }
}

/// Parse an extract filename of the form `<CATEGORY>_<YYYY-MM-DD>.csv`
fn parse_extract_name(path: &Path) -> Result<(SalesCategory, NaiveDate)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SalesError::InvalidManifest(path.display().to_string()))?;

    let (category_tag, date_tag) = stem
        .split_once('_')
        .ok_or_else(|| SalesError::InvalidManifest(stem.to_string()))?;

    let category: SalesCategory = category_tag.parse()?;
    let date = NaiveDate::parse_from_str(date_tag, "%Y-%m-%d")?;

    Ok((category, date))
}

/// Scan a directory for extract files, sorted by date then category.
///
/// Files that are not `.csv` or do not follow the naming convention are
/// ignored; the extract directory commonly holds notes and exports too.
pub fn discover_manifest<P: AsRef<Path>>(dir: P) -> Result<Vec<BatchDescriptor>> {
    let mut descriptors = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        match parse_extract_name(&path) {
            Ok((category, date)) => descriptors.push(BatchDescriptor {
                path,
                category,
                date,
            }),
            Err(_) => continue,
        }
    }

    descriptors.sort_by_key(|d| (d.date, d.category.as_str()));
    Ok(descriptors)
}

/// Load one extract file into a batch
pub fn load_batch(descriptor: &BatchDescriptor) -> Result<DailyBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(&descriptor.path)?;

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        records.push(SalesRecord::from(row?));
    }

    Ok(DailyBatch::new(
        descriptor.date,
        descriptor.category,
        records,
    ))
}

/// Discover and load every extract in a directory.
///
/// A file that fails to load degrades the dataset rather than failing
/// the pipeline: it is logged, recorded in the outcome, and skipped.
pub fn load_all<P: AsRef<Path>>(dir: P) -> Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();

    for descriptor in discover_manifest(dir)? {
        match load_batch(&descriptor) {
            Ok(batch) => outcome.batches.push(batch),
            Err(err) => {
                log::warn!(
                    "skipping extract {}: {}",
                    descriptor.path.display(),
                    err
                );
                outcome.skipped.push((descriptor.path, err.to_string()));
            }
        }
    }

    Ok(outcome)
}
