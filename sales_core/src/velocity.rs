//! Velocity engine: movement-rate metrics, classification, and
//! period-over-period comparison
//!
//! Velocity is units sold per *active day* (a calendar date with at
//! least one sale of the product), not per record. Classification is
//! relative to the current product set by rank percentile, so the same
//! product can classify differently on a filtered subset.

use crate::record::{DailyBatch, ProductKey};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Three-way movement classification, relative to the product set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityClass {
    Fast,
    Medium,
    Slow,
}

impl fmt::Display for VelocityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            VelocityClass::Fast => "fast",
            VelocityClass::Medium => "medium",
            VelocityClass::Slow => "slow",
        };
        f.write_str(tag)
    }
}

/// Movement metrics for one product over a batch window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityMetric {
    /// Item name as first seen in the extracts
    pub product: String,
    pub company: Option<String>,
    pub total_quantity: f64,
    pub total_amount: f64,
    /// Count of distinct dates the product sold on
    pub active_days: usize,
    /// Units per active day
    pub daily_velocity: f64,
    /// `daily_velocity * 7`
    pub weekly_velocity: f64,
    pub classification: VelocityClass,
    /// 1-based position when sorted descending by daily velocity
    pub rank: usize,
}

/// Counts per classification bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityDistribution {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
}

/// Period-over-period trend band (±5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Accelerating,
    Stable,
    Decelerating,
}

/// Period-over-period classification band (±15%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeClass {
    Gainer,
    Stable,
    Loser,
}

/// Velocity movement of one product between two periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityChange {
    pub product: String,
    pub company: Option<String>,
    pub current_velocity: f64,
    pub previous_velocity: f64,
    pub change_absolute: f64,
    pub change_percent: f64,
    pub trend: Trend,
    pub classification: ChangeClass,
}

/// Comparison window granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    Week,
    Month,
}

impl PeriodGranularity {
    /// Window length in days (a "month" is a fixed 30-day window)
    pub fn days(&self) -> i64 {
        match self {
            PeriodGranularity::Week => 7,
            PeriodGranularity::Month => 30,
        }
    }
}

/// Two adjacent, equal-length batch windows ending at the latest date
#[derive(Debug, Clone, Default)]
pub struct PeriodSplit {
    pub current: Vec<DailyBatch>,
    pub previous: Vec<DailyBatch>,
}

#[derive(Debug, Default)]
struct VelocityAccumulator {
    display_name: String,
    company: Option<String>,
    quantity: f64,
    amount: f64,
    active_dates: HashSet<NaiveDate>,
}

/// Rank percentile classification: top third fast, middle third medium,
/// bottom third slow. A lone product is fast by definition.
fn classify(rank: usize, total: usize) -> VelocityClass {
    if total <= 1 {
        return VelocityClass::Fast;
    }

    let percentile = (rank - 1) as f64 / (total - 1) as f64;
    if percentile <= 1.0 / 3.0 {
        VelocityClass::Fast
    } else if percentile <= 2.0 / 3.0 {
        VelocityClass::Medium
    } else {
        VelocityClass::Slow
    }
}

/// Compute per-product velocity metrics over a batch window.
///
/// Multiple records of the same product on the same date count as one
/// active day. Output is in rank order (fastest first).
pub fn calculate_velocity(batches: &[DailyBatch]) -> Vec<VelocityMetric> {
    let mut groups: HashMap<ProductKey, VelocityAccumulator> = HashMap::new();

    for batch in batches {
        for record in &batch.records {
            let entry = groups.entry(record.product_key()).or_insert_with(|| {
                VelocityAccumulator {
                    display_name: record.item_name.trim().to_string(),
                    ..VelocityAccumulator::default()
                }
            });
            entry.quantity += record.quantity;
            entry.amount += record.taxable_amount;
            entry.active_dates.insert(batch.date);
            if entry.company.is_none() {
                entry.company = record.company.clone();
            }
        }
    }

    let mut metrics: Vec<VelocityMetric> = groups
        .into_values()
        .map(|acc| {
            let active_days = acc.active_dates.len();
            let daily_velocity = if active_days > 0 {
                acc.quantity / active_days as f64
            } else {
                0.0
            };

            VelocityMetric {
                product: acc.display_name,
                company: acc.company,
                total_quantity: acc.quantity,
                total_amount: acc.amount,
                active_days,
                daily_velocity,
                weekly_velocity: daily_velocity * 7.0,
                classification: VelocityClass::Slow,
                rank: 0,
            }
        })
        .collect();

    metrics.sort_by(|a, b| {
        b.daily_velocity
            .partial_cmp(&a.daily_velocity)
            .unwrap_or(Ordering::Equal)
    });

    let total = metrics.len();
    for (i, metric) in metrics.iter_mut().enumerate() {
        metric.rank = i + 1;
        metric.classification = classify(i + 1, total);
    }

    metrics
}

/// Count metrics per classification bucket
pub fn velocity_distribution(metrics: &[VelocityMetric]) -> VelocityDistribution {
    let mut distribution = VelocityDistribution::default();
    for metric in metrics {
        match metric.classification {
            VelocityClass::Fast => distribution.fast += 1,
            VelocityClass::Medium => distribution.medium += 1,
            VelocityClass::Slow => distribution.slow += 1,
        }
    }
    distribution
}

/// Split batches into the latest N-day window and the N days before it.
///
/// `current` covers `[latest - (N-1), latest]` inclusive; `previous`
/// covers the N days immediately preceding it, with no gap and no
/// overlap. Both windows are empty when no batches exist.
pub fn split_by_period(batches: &[DailyBatch], granularity: PeriodGranularity) -> PeriodSplit {
    let Some(latest) = batches.iter().map(|b| b.date).max() else {
        return PeriodSplit::default();
    };

    let n = granularity.days();
    let current_start = latest - Duration::days(n - 1);
    let previous_start = current_start - Duration::days(n);
    let previous_end = current_start - Duration::days(1);

    let current = batches
        .iter()
        .filter(|b| b.date >= current_start && b.date <= latest)
        .cloned()
        .collect();
    let previous = batches
        .iter()
        .filter(|b| b.date >= previous_start && b.date <= previous_end)
        .cloned()
        .collect();

    PeriodSplit { current, previous }
}

/// Compare per-product velocity between two periods.
///
/// Products present only in the current period report +100% (new);
/// products present only in the previous period report -100%
/// (discontinued). A previous velocity of exactly zero with the product
/// still present reports 0% change. Output is sorted descending by
/// percent change, gainers first.
pub fn compare_velocity(current: &[DailyBatch], previous: &[DailyBatch]) -> Vec<VelocityChange> {
    let current_metrics = calculate_velocity(current);
    let previous_metrics = calculate_velocity(previous);

    let current_by_key: HashMap<ProductKey, &VelocityMetric> = current_metrics
        .iter()
        .map(|m| (ProductKey::new(&m.product), m))
        .collect();
    let previous_by_key: HashMap<ProductKey, &VelocityMetric> = previous_metrics
        .iter()
        .map(|m| (ProductKey::new(&m.product), m))
        .collect();

    let keys: HashSet<&ProductKey> = current_by_key.keys().chain(previous_by_key.keys()).collect();

    let mut changes: Vec<VelocityChange> = keys
        .into_iter()
        .map(|key| {
            match (current_by_key.get(key), previous_by_key.get(key)) {
                (Some(cur), None) => VelocityChange {
                    product: cur.product.clone(),
                    company: cur.company.clone(),
                    current_velocity: cur.daily_velocity,
                    previous_velocity: 0.0,
                    change_absolute: cur.daily_velocity,
                    change_percent: 100.0,
                    trend: Trend::Accelerating,
                    classification: ChangeClass::Gainer,
                },
                (None, Some(prev)) => VelocityChange {
                    product: prev.product.clone(),
                    company: prev.company.clone(),
                    current_velocity: 0.0,
                    previous_velocity: prev.daily_velocity,
                    change_absolute: -prev.daily_velocity,
                    change_percent: -100.0,
                    trend: Trend::Decelerating,
                    classification: ChangeClass::Loser,
                },
                (Some(cur), Some(prev)) => {
                    let change_absolute = cur.daily_velocity - prev.daily_velocity;
                    let change_percent = if prev.daily_velocity > 0.0 {
                        change_absolute / prev.daily_velocity * 100.0
                    } else {
                        0.0
                    };

                    let trend = if change_percent > 5.0 {
                        Trend::Accelerating
                    } else if change_percent < -5.0 {
                        Trend::Decelerating
                    } else {
                        Trend::Stable
                    };
                    let classification = if change_percent > 15.0 {
                        ChangeClass::Gainer
                    } else if change_percent < -15.0 {
                        ChangeClass::Loser
                    } else {
                        ChangeClass::Stable
                    };

                    VelocityChange {
                        product: cur.product.clone(),
                        company: cur.company.clone().or_else(|| prev.company.clone()),
                        current_velocity: cur.daily_velocity,
                        previous_velocity: prev.daily_velocity,
                        change_absolute,
                        change_percent,
                        trend,
                        classification,
                    }
                }
                (None, None) => unreachable!("key taken from one of the two maps"),
            }
        })
        .collect();

    changes.sort_by(|a, b| {
        b.change_percent
            .partial_cmp(&a.change_percent)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.product.cmp(&b.product))
    });

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SalesCategory, SalesRecord};

    fn record(name: &str, quantity: f64) -> SalesRecord {
        SalesRecord {
            item_code: "1704".to_string(),
            item_name: name.to_string(),
            quantity,
            taxable_amount: quantity * 10.0,
            tax_rate: 18.0,
            company: None,
        }
    }

    fn day(d: u32, records: Vec<SalesRecord>) -> DailyBatch {
        DailyBatch::new(
            NaiveDate::from_ymd_opt(2025, 12, d).unwrap(),
            SalesCategory::Ps,
            records,
        )
    }

    #[test]
    fn active_days_count_distinct_dates() {
        // Two records of A on the same date are one active day
        let batches = vec![
            day(1, vec![record("A", 3.0), record("A", 7.0)]),
            day(2, vec![record("A", 20.0)]),
        ];

        let metrics = calculate_velocity(&batches);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].active_days, 2);
        assert_eq!(metrics[0].daily_velocity, 15.0);
        assert_eq!(metrics[0].weekly_velocity, 105.0);
    }

    #[test]
    fn ranks_are_a_gapless_permutation() {
        let batches = vec![day(
            1,
            vec![
                record("A", 5.0),
                record("B", 50.0),
                record("C", 20.0),
                record("D", 1.0),
            ],
        )];

        let metrics = calculate_velocity(&batches);
        let ranks: Vec<usize> = metrics.iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        // Velocity never increases as rank worsens
        for pair in metrics.windows(2) {
            assert!(pair[0].daily_velocity >= pair[1].daily_velocity);
        }
        assert_eq!(metrics[0].product, "B");
    }

    #[test]
    fn classification_boundaries_at_small_sizes() {
        // One product: fast
        let metrics = calculate_velocity(&[day(1, vec![record("A", 1.0)])]);
        assert_eq!(metrics[0].classification, VelocityClass::Fast);

        // Two products: fast and slow, no medium band possible
        let metrics =
            calculate_velocity(&[day(1, vec![record("A", 10.0), record("B", 1.0)])]);
        assert_eq!(metrics[0].classification, VelocityClass::Fast);
        assert_eq!(metrics[1].classification, VelocityClass::Slow);

        // Three products: one of each
        let metrics = calculate_velocity(&[day(
            1,
            vec![record("A", 10.0), record("B", 5.0), record("C", 1.0)],
        )]);
        let dist = velocity_distribution(&metrics);
        assert_eq!(
            dist,
            VelocityDistribution {
                fast: 1,
                medium: 1,
                slow: 1
            }
        );
    }

    #[test]
    fn distribution_covers_every_product() {
        for n in 1..=12usize {
            let records = (0..n).map(|i| record(&format!("P{}", i), (i + 1) as f64)).collect();
            let metrics = calculate_velocity(&[day(1, records)]);
            let dist = velocity_distribution(&metrics);
            assert_eq!(dist.fast + dist.medium + dist.slow, n);
        }
    }

    #[test]
    fn week_split_covers_fourteen_days_without_gap_or_overlap() {
        let batches: Vec<DailyBatch> =
            (1..=14).map(|d| day(d, vec![record("A", 1.0)])).collect();

        let split = split_by_period(&batches, PeriodGranularity::Week);
        assert_eq!(split.current.len(), 7);
        assert_eq!(split.previous.len(), 7);

        let current_dates: HashSet<NaiveDate> = split.current.iter().map(|b| b.date).collect();
        let previous_dates: HashSet<NaiveDate> = split.previous.iter().map(|b| b.date).collect();
        assert!(current_dates.is_disjoint(&previous_dates));
        assert_eq!(current_dates.len() + previous_dates.len(), 14);

        let earliest_current = current_dates.iter().min().unwrap();
        let latest_previous = previous_dates.iter().max().unwrap();
        assert_eq!(*earliest_current - *latest_previous, Duration::days(1));
    }

    #[test]
    fn split_of_empty_input_is_empty() {
        let split = split_by_period(&[], PeriodGranularity::Month);
        assert!(split.current.is_empty());
        assert!(split.previous.is_empty());
    }

    #[test]
    fn new_product_is_a_gainer_at_plus_hundred() {
        let current = vec![day(8, vec![record("A", 10.0), record("New", 4.0)])];
        let previous = vec![day(1, vec![record("A", 10.0)])];

        let changes = compare_velocity(&current, &previous);
        let new_product = changes.iter().find(|c| c.product == "New").unwrap();
        assert_eq!(new_product.change_percent, 100.0);
        assert_eq!(new_product.classification, ChangeClass::Gainer);
        assert_eq!(new_product.trend, Trend::Accelerating);
    }

    #[test]
    fn discontinued_product_is_a_loser_at_minus_hundred() {
        let current = vec![day(8, vec![record("A", 10.0)])];
        let previous = vec![day(1, vec![record("A", 10.0), record("Gone", 4.0)])];

        let changes = compare_velocity(&current, &previous);
        let gone = changes.iter().find(|c| c.product == "Gone").unwrap();
        assert_eq!(gone.change_percent, -100.0);
        assert_eq!(gone.classification, ChangeClass::Loser);
        assert_eq!(gone.trend, Trend::Decelerating);
    }

    #[test]
    fn identical_velocity_is_stable() {
        let current = vec![day(8, vec![record("A", 10.0)])];
        let previous = vec![day(1, vec![record("A", 10.0)])];

        let changes = compare_velocity(&current, &previous);
        assert_eq!(changes[0].change_percent, 0.0);
        assert_eq!(changes[0].classification, ChangeClass::Stable);
        assert_eq!(changes[0].trend, Trend::Stable);
    }

    #[test]
    fn trend_band_is_tighter_than_classification_band() {
        // +10%: inside the classification band, outside the trend band
        let current = vec![day(8, vec![record("A", 11.0)])];
        let previous = vec![day(1, vec![record("A", 10.0)])];

        let changes = compare_velocity(&current, &previous);
        assert!((changes[0].change_percent - 10.0).abs() < 1e-9);
        assert_eq!(changes[0].trend, Trend::Accelerating);
        assert_eq!(changes[0].classification, ChangeClass::Stable);
    }

    #[test]
    fn zero_previous_velocity_reports_zero_change() {
        // Present in both periods but with zero prior quantity: the
        // comparison deliberately reports 0% rather than infinity.
        let current = vec![day(8, vec![record("A", 10.0)])];
        let previous = vec![day(1, vec![record("A", 0.0)])];

        let changes = compare_velocity(&current, &previous);
        assert_eq!(changes[0].change_percent, 0.0);
        assert_eq!(changes[0].classification, ChangeClass::Stable);
    }
}
