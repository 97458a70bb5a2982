//! # Sales Core
//!
//! `sales_core` models the daily sales extracts of a two-category retail
//! operation and provides the analytics that roll them up: company
//! enrichment, product/company/date aggregation, and product velocity
//! classification with period-over-period comparison.
//!
//! The pipeline is a one-shot, in-memory batch computation: load the
//! extracts, enrich the records with the product-to-company catalog, then
//! run any of the aggregation or velocity functions over the same
//! enriched batch set. Enrichment is the only mutating step and must run
//! before the read-only views.
//!
//! ## Usage Example
//!
//! ```
//! use sales_core::catalog::{enrich_batches, CompanyCatalog};
//! use sales_core::utils::generate_test_batches;
//! use sales_core::{aggregate, velocity};
//!
//! let mut batches = generate_test_batches(14, 5, 20.0);
//! let catalog = CompanyCatalog::from_listings(vec![(
//!     "Acme Foods".to_string(),
//!     vec!["PS Item 1".to_string(), "FS Item 2".to_string()],
//! )]);
//!
//! enrich_batches(&mut batches, &catalog);
//!
//! let products = aggregate::aggregate_by_product(&batches);
//! let metrics = velocity::calculate_velocity(&batches);
//! assert_eq!(products.len(), 10);
//! assert_eq!(metrics.len(), 10);
//! ```

use thiserror::Error;

pub mod aggregate;
pub mod catalog;
pub mod loader;
pub mod record;
pub mod utils;
pub mod velocity;

pub use aggregate::{
    aggregate_by_company, aggregate_by_date, aggregate_by_product,
    aggregate_by_product_with_company, total_quantity, total_sales, CompanyAggregate,
    DateAggregate, ProductAggregate,
};
pub use catalog::{enrich_batches, CompanyCatalog, CompanyLookup};
pub use loader::{discover_manifest, load_all, load_batch, BatchDescriptor, LoadOutcome};
pub use record::{DailyBatch, ProductKey, SalesCategory, SalesRecord};
pub use velocity::{
    calculate_velocity, compare_velocity, split_by_period, velocity_distribution, ChangeClass,
    PeriodGranularity, PeriodSplit, Trend, VelocityChange, VelocityClass, VelocityDistribution,
    VelocityMetric,
};

/// Errors that can occur while loading or modelling sales extracts
#[derive(Error, Debug)]
pub enum SalesError {
    #[error("Invalid extract data: {0}")]
    InvalidData(String),

    #[error("Unrecognized sales category: {0}")]
    UnknownCategory(String),

    #[error("Invalid extract filename: {0}")]
    InvalidManifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),
}

/// Result type for sales core operations
pub type Result<T> = std::result::Result<T, SalesError>;
