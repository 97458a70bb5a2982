//! Core data model for daily sales extracts
//!
//! One extract file becomes one [`DailyBatch`]; each of its line items is
//! a [`SalesRecord`]. There is no numeric product identifier anywhere in
//! the source data, so product identity is the normalized item name,
//! wrapped in [`ProductKey`] to keep raw and normalized strings from
//! being mixed at call sites.

use crate::SalesError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two fixed extract categories a store produces per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesCategory {
    /// Packaged stock extract ("PS")
    Ps,
    /// Fresh stock extract ("FS")
    Fs,
}

impl SalesCategory {
    /// The category tag as it appears in extract filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesCategory::Ps => "PS",
            SalesCategory::Fs => "FS",
        }
    }
}

impl fmt::Display for SalesCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesCategory {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PS" => Ok(SalesCategory::Ps),
            "FS" => Ok(SalesCategory::Fs),
            other => Err(SalesError::UnknownCategory(other.to_string())),
        }
    }
}

/// Normalized product identity: the trimmed, lowercased item name.
///
/// Every grouping map and the company catalog index key on this type, so
/// a raw item name can never be used as a lookup key by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    /// Normalize a raw item name into its identity key
    pub fn new(raw_name: &str) -> Self {
        Self(raw_name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line item from a daily sales extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Tax classification code of the item
    pub item_code: String,
    /// Item name as printed in the extract; the grouping/join key
    pub item_name: String,
    /// Units sold
    pub quantity: f64,
    /// Taxable amount, the revenue proxy
    pub taxable_amount: f64,
    /// Tax rate percentage applied to the line
    pub tax_rate: f64,
    /// Company resolved by enrichment; absent until enrichment runs or
    /// when the catalog has no entry for the item
    pub company: Option<String>,
}

impl SalesRecord {
    /// The normalized identity key for this record's item
    pub fn product_key(&self) -> ProductKey {
        ProductKey::new(&self.item_name)
    }
}

/// One ingested extract file: a date, a category, and its line items.
///
/// The totals are computed once at construction and always equal the sum
/// over `records`; nothing mutates them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBatch {
    /// Extract date
    pub date: NaiveDate,
    /// Extract category
    pub category: SalesCategory,
    /// Line items in extract order
    pub records: Vec<SalesRecord>,
    /// Sum of taxable amounts over `records`
    pub total_amount: f64,
    /// Sum of quantities over `records`
    pub total_quantity: f64,
}

impl DailyBatch {
    /// Build a batch, computing its totals from the records
    pub fn new(date: NaiveDate, category: SalesCategory, records: Vec<SalesRecord>) -> Self {
        let total_amount = records.iter().map(|r| r.taxable_amount).sum();
        let total_quantity = records.iter().map(|r| r.quantity).sum();

        Self {
            date,
            category,
            records,
            total_amount,
            total_quantity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
