// End-to-end tour of the sales analytics workspace on generated data
use forecast_sales::ForecastConfig;
use retail_math::statistics::round2;
use sales_core::catalog::CompanyCatalog;
use sales_core::utils::generate_test_batches;
use sales_scope_workspace::AnalyticsSnapshot;

fn main() {
    println!("Sales Scope overview\n");

    // Six weeks of synthetic PS/FS extracts, five products per category
    let batches = generate_test_batches(42, 5, 25.0);

    let catalog = CompanyCatalog::from_listings(vec![
        (
            "Northstar Traders".to_string(),
            vec!["PS Item 1".to_string(), "PS Item 2".to_string()],
        ),
        (
            "Seaside Dairy".to_string(),
            vec!["FS Item 1".to_string(), "FS Item 2".to_string()],
        ),
    ]);

    let snapshot = AnalyticsSnapshot::compute(batches, &catalog, &ForecastConfig::default())
        .expect("pipeline run");

    println!("=== Totals ===");
    println!("Sales:    {:.2}", snapshot.total_sales);
    println!("Quantity: {:.0}", snapshot.total_quantity);
    println!("Extracts: {}", snapshot.dates.len());

    println!("\n=== Top products ===");
    for product in snapshot.products.iter().take(5) {
        println!(
            "{:<12} qty {:>6.0}  amount {:>10.2}  avg price {}",
            product.product,
            product.total_quantity,
            product.total_amount,
            product
                .avg_price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "unknown".to_string()),
        );
    }

    println!("\n=== Companies ===");
    for company in &snapshot.companies {
        println!(
            "{:<20} {:>10.2} across {} products",
            company.company, company.total_amount, company.product_count
        );
    }

    println!("\n=== Velocity ===");
    let dist = snapshot.velocity_distribution;
    println!(
        "fast {} / medium {} / slow {}",
        dist.fast, dist.medium, dist.slow
    );
    for metric in snapshot.velocity.iter().take(3) {
        println!(
            "#{} {:<12} {:.1} units/day ({})",
            metric.rank, metric.product, metric.daily_velocity, metric.classification
        );
    }

    println!("\n=== Week over week ===");
    for change in snapshot.weekly_changes.iter().take(3) {
        println!(
            "{:<12} {:+.1}% ({:?})",
            change.product,
            round2(change.change_percent),
            change.classification
        );
    }

    println!("\n=== Forecast ===");
    let forecast = &snapshot.forecast;
    println!(
        "Tomorrow:  {:.2} revenue / {:.0} units (confidence {})",
        forecast.one_day_total_revenue, forecast.one_day_total_quantity,
        forecast.one_day_confidence
    );
    println!(
        "Next week: {:.2} revenue / {:.0} units (confidence {})",
        forecast.seven_day_total_revenue, forecast.seven_day_total_quantity,
        forecast.seven_day_confidence
    );
    println!("Data quality: {}", forecast.data_quality);
    for warning in &forecast.warnings {
        println!("warning: {}", warning);
    }

    println!("\n=== Backtest (7-day holdout) ===");
    for product_backtest in snapshot.backtests.iter().take(3) {
        println!(
            "{:<12} MAE {:>8.2}  MAPE {:>6.2}%  RMSE {:>8.2}",
            product_backtest.product,
            product_backtest.report.mae,
            product_backtest.report.mape,
            product_backtest.report.rmse
        );
    }

    println!("\nDone");
}
