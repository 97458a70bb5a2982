//! # Sales Scope
//!
//! Workspace facade tying the analytics crates together: load daily
//! sales extracts, enrich them with the product-to-company catalog, and
//! compute every analytical view in one pass.
//!
//! ## Example
//!
//! ```
//! use sales_scope_workspace::AnalyticsSnapshot;
//! use sales_core::catalog::CompanyCatalog;
//! use sales_core::utils::generate_test_batches;
//! use forecast_sales::ForecastConfig;
//!
//! let batches = generate_test_batches(30, 5, 20.0);
//! let catalog = CompanyCatalog::from_listings(vec![(
//!     "Acme Foods".to_string(),
//!     vec!["PS Item 1".to_string()],
//! )]);
//!
//! let snapshot =
//!     AnalyticsSnapshot::compute(batches, &catalog, &ForecastConfig::default()).unwrap();
//! assert_eq!(snapshot.velocity.len(), 10);
//! assert!(snapshot.total_sales > 0.0);
//! ```

use forecast_sales::{
    backtest_all, generate_forecast_summary, ForecastConfig, ForecastSummary, ProductBacktest,
};
use sales_core::aggregate::{
    aggregate_by_company, aggregate_by_date, aggregate_by_product,
    aggregate_by_product_with_company, total_quantity, total_sales, CompanyAggregate,
    DateAggregate, ProductAggregate,
};
use sales_core::catalog::{enrich_batches, CompanyLookup};
use sales_core::record::DailyBatch;
use sales_core::velocity::{
    calculate_velocity, compare_velocity, split_by_period, velocity_distribution,
    PeriodGranularity, VelocityChange, VelocityDistribution, VelocityMetric,
};

/// Every analytical view over one enriched batch set.
///
/// Rebuilt from scratch on each call to [`AnalyticsSnapshot::compute`];
/// nothing is shared or cached between runs.
#[derive(Debug)]
pub struct AnalyticsSnapshot {
    /// The enriched batches the views below were computed from
    pub batches: Vec<DailyBatch>,
    pub products: Vec<ProductAggregate>,
    pub products_with_company: Vec<ProductAggregate>,
    pub dates: Vec<DateAggregate>,
    pub companies: Vec<CompanyAggregate>,
    pub total_sales: f64,
    pub total_quantity: f64,
    pub velocity: Vec<VelocityMetric>,
    pub velocity_distribution: VelocityDistribution,
    /// Week-over-week velocity movement
    pub weekly_changes: Vec<VelocityChange>,
    pub forecast: ForecastSummary,
    pub backtests: Vec<ProductBacktest>,
}

impl AnalyticsSnapshot {
    /// Run the full pipeline: enrich the batches in place, then derive
    /// the aggregation, velocity, and forecast views from the same
    /// enriched set. Enrichment completes before any view is computed.
    pub fn compute<L: CompanyLookup>(
        mut batches: Vec<DailyBatch>,
        lookup: &L,
        config: &ForecastConfig,
    ) -> forecast_sales::Result<Self> {
        enrich_batches(&mut batches, lookup);

        let velocity = calculate_velocity(&batches);
        let velocity_distribution = velocity_distribution(&velocity);

        let split = split_by_period(&batches, PeriodGranularity::Week);
        let weekly_changes = compare_velocity(&split.current, &split.previous);

        let forecast = generate_forecast_summary(&batches, config)?;
        let backtests = backtest_all(&batches, config)?;

        Ok(Self {
            products: aggregate_by_product(&batches),
            products_with_company: aggregate_by_product_with_company(&batches),
            dates: aggregate_by_date(&batches),
            companies: aggregate_by_company(&batches),
            total_sales: total_sales(&batches),
            total_quantity: total_quantity(&batches),
            velocity,
            velocity_distribution,
            weekly_changes,
            forecast,
            backtests,
            batches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::catalog::CompanyCatalog;
    use sales_core::utils::generate_test_batches;

    #[test]
    fn snapshot_views_agree_on_the_grand_total() {
        let batches = generate_test_batches(21, 4, 15.0);
        let catalog = CompanyCatalog::from_listings(vec![(
            "Acme Foods".to_string(),
            vec!["PS Item 1".to_string(), "FS Item 2".to_string()],
        )]);

        let snapshot =
            AnalyticsSnapshot::compute(batches, &catalog, &ForecastConfig::default()).unwrap();

        let product_sum: f64 = snapshot.products.iter().map(|p| p.total_amount).sum();
        let company_sum: f64 = snapshot.companies.iter().map(|c| c.total_amount).sum();
        assert!((product_sum - snapshot.total_sales).abs() < 1e-6);
        assert!((company_sum - snapshot.total_sales).abs() < 1e-6);

        let dist = snapshot.velocity_distribution;
        assert_eq!(dist.fast + dist.medium + dist.slow, snapshot.velocity.len());
    }

    #[test]
    fn enrichment_happens_before_the_views() {
        let batches = generate_test_batches(14, 3, 15.0);
        let catalog = CompanyCatalog::from_listings(vec![(
            "Acme Foods".to_string(),
            vec!["PS Item 1".to_string()],
        )]);

        let snapshot =
            AnalyticsSnapshot::compute(batches, &catalog, &ForecastConfig::default()).unwrap();

        let tagged = snapshot
            .products_with_company
            .iter()
            .find(|p| p.product == "PS Item 1")
            .unwrap();
        assert_eq!(tagged.company.as_deref(), Some("Acme Foods"));
        assert!(snapshot
            .companies
            .iter()
            .any(|c| c.company == "Acme Foods"));
    }
}
