//! Product-to-company catalog and record enrichment
//!
//! The catalog is built once by the caller's startup sequence and passed
//! explicitly into [`enrich_batches`]; there is no hidden global. Its
//! index is keyed on [`ProductKey`], the same normalization the
//! enrichment step applies, so lookups and index entries can never
//! disagree on casing or whitespace.

use crate::record::{DailyBatch, ProductKey};
use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Capability to resolve a product to the company that supplies it
pub trait CompanyLookup {
    /// Resolve a normalized product name to its company, if known
    fn resolve(&self, key: &ProductKey) -> Option<&str>;

    /// Sorted distinct company names known to the catalog
    fn companies(&self) -> Vec<String>;
}

/// In-memory product-to-company index
#[derive(Debug, Clone, Default)]
pub struct CompanyCatalog {
    index: HashMap<ProductKey, String>,
}

impl CompanyCatalog {
    /// Build a catalog from `(company, product names)` listings.
    ///
    /// A product name appearing under two companies keeps the first
    /// listing encountered.
    pub fn from_listings<I>(listings: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut index = HashMap::new();
        for (company, names) in listings {
            for name in names {
                index
                    .entry(ProductKey::new(&name))
                    .or_insert_with(|| company.clone());
            }
        }

        Self { index }
    }

    /// Load a catalog from a directory of per-company name-list files.
    ///
    /// Each `<Company>.txt` file holds one product name per line; the
    /// file stem is the company name. A file that cannot be read is
    /// skipped so one bad listing does not lose the rest of the catalog.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut listings = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(company) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(contents) => {
                    let names: Vec<String> = contents
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect();
                    listings.push((company.to_string(), names));
                }
                Err(err) => {
                    log::warn!("skipping company listing {}: {}", path.display(), err);
                }
            }
        }

        Ok(Self::from_listings(listings))
    }

    /// Number of indexed product names
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl CompanyLookup for CompanyCatalog {
    fn resolve(&self, key: &ProductKey) -> Option<&str> {
        self.index.get(key).map(String::as_str)
    }

    fn companies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.values().cloned().collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Tag every record with its resolved company.
///
/// Records whose product is not in the catalog are left untouched; they
/// surface downstream under the "Unknown" company grouping. This is the
/// one mutating step of the pipeline and must complete before any
/// aggregation, velocity, or forecast function reads the batches.
/// Re-running with the same lookup is a no-op.
pub fn enrich_batches<L: CompanyLookup>(batches: &mut [DailyBatch], lookup: &L) {
    for batch in batches.iter_mut() {
        for record in batch.records.iter_mut() {
            if let Some(company) = lookup.resolve(&record.product_key()) {
                record.company = Some(company.to_string());
            }
        }
    }
}
