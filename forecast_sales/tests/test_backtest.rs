use chrono::NaiveDate;
use forecast_sales::backtest::backtest;
use forecast_sales::{backtest_all, ForecastConfig};
use sales_core::record::{DailyBatch, SalesCategory, SalesRecord};
use sales_core::utils::generate_test_batches;

fn record(name: &str, quantity: f64, amount: f64) -> SalesRecord {
    SalesRecord {
        item_code: "0910".to_string(),
        item_name: name.to_string(),
        quantity,
        taxable_amount: amount,
        tax_rate: 5.0,
        company: None,
    }
}

#[test]
fn backtest_all_covers_the_forecast_product_set() {
    let batches = generate_test_batches(30, 6, 25.0);
    let config = ForecastConfig::default();

    let backtests = backtest_all(&batches, &config).unwrap();

    // 12 distinct products, capped at the top 10 by revenue
    assert_eq!(backtests.len(), 10);
    for product_backtest in &backtests {
        assert_eq!(product_backtest.report.test_period_days, 7);
        assert!(product_backtest.report.mae >= 0.0);
        assert!(product_backtest.report.rmse >= product_backtest.report.mae);
    }
}

#[test]
fn backtest_all_reports_sentinels_on_short_history() {
    // 10 days < backtest_days + 7
    let batches = generate_test_batches(10, 4, 25.0);
    let backtests = backtest_all(&batches, &ForecastConfig::default()).unwrap();

    assert_eq!(backtests.len(), 8);
    for product_backtest in &backtests {
        assert_eq!(product_backtest.report.test_period_days, 0);
        assert_eq!(product_backtest.report.mae, 0.0);
        assert_eq!(product_backtest.report.mape, 0.0);
        assert_eq!(product_backtest.report.rmse, 0.0);
    }
}

#[test]
fn constant_sales_backtest_perfectly_through_the_pipeline() {
    let base_date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let batches: Vec<DailyBatch> = (0..21)
        .map(|i| {
            DailyBatch::new(
                base_date + chrono::Duration::days(i),
                SalesCategory::Ps,
                vec![record("Salt 1kg", 6.0, 120.0)],
            )
        })
        .collect();

    let backtests = backtest_all(&batches, &ForecastConfig::default()).unwrap();

    assert_eq!(backtests.len(), 1);
    assert_eq!(backtests[0].product, "Salt 1kg");
    assert_eq!(backtests[0].report.mae, 0.0);
    assert_eq!(backtests[0].report.mape, 0.0);
    assert_eq!(backtests[0].report.rmse, 0.0);
    assert_eq!(backtests[0].report.test_period_days, 7);
}

#[test]
fn boundary_history_length_is_enough() {
    // Exactly test_days + 7 points backtests; one fewer does not
    let values = vec![10.0; 14];
    assert_eq!(backtest(&values, 7).unwrap().test_period_days, 7);

    let values = vec![10.0; 13];
    assert_eq!(backtest(&values, 7).unwrap().test_period_days, 0);
}
