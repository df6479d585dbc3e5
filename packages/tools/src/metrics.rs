//! Derived metrics shared across the tools.
//!
//! All functions are pure: they read an already-fetched series and
//! compute aggregates without mutating it.

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::Display;
use ucr_forecast_upstream_models::HistoryPoint;

/// Percent change beyond which a series counts as increasing/decreasing.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Direction of a trend between the first and last point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum TrendDirection {
    /// Change above +5%.
    Increasing,
    /// Change below -5%.
    Decreasing,
    /// Change within ±5%, or not enough data.
    Stable,
}

/// A trend classification with its underlying percent change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    /// Direction label.
    pub direction: TrendDirection,
    /// Percent change from first to last point.
    pub percent_change: f64,
}

/// Percent change from `current` to `forecast`.
///
/// Returns `0` when both are zero and `+inf` when only `current` is zero;
/// otherwise `(forecast - current) / current * 100` with sign preserved.
#[must_use]
pub fn percent_change(current: f64, forecast: f64) -> f64 {
    if current == 0.0 {
        if forecast == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        (forecast - current) / current * 100.0
    }
}

/// Classifies the trend of a series using only its first and last values.
///
/// Fewer than 2 points, or a zero first value, yields `(Stable, 0.0)`.
#[must_use]
pub fn determine_trend(values: &[f64]) -> Trend {
    let stable = Trend {
        direction: TrendDirection::Stable,
        percent_change: 0.0,
    };

    if values.len() < 2 {
        return stable;
    }

    let first = values[0];
    let last = values[values.len() - 1];
    if first == 0.0 {
        return stable;
    }

    let percent_change = (last - first) / first * 100.0;
    let direction = if percent_change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Increasing
    } else if percent_change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Trend {
        direction,
        percent_change,
    }
}

/// Groups monthly history points by the year component of their date,
/// summing actual counts. Points with an unparseable year are skipped.
#[must_use]
pub fn yearly_totals(points: &[HistoryPoint]) -> BTreeMap<i32, i64> {
    let mut totals = BTreeMap::new();
    for point in points {
        let Some(year) = point
            .date
            .split('-')
            .next()
            .and_then(|year| year.parse::<i32>().ok())
        else {
            continue;
        };
        *totals.entry(year).or_insert(0) += point.actual;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, actual: i64) -> HistoryPoint {
        HistoryPoint {
            date: date.to_string(),
            actual,
            rate: None,
        }
    }

    #[test]
    fn percent_change_basic() {
        assert!((percent_change(100.0, 110.0) - 10.0).abs() < f64::EPSILON);
        assert!((percent_change(100.0, 90.0) + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_change_zero_baseline() {
        assert!(percent_change(0.0, 0.0).abs() < f64::EPSILON);
        assert!(percent_change(0.0, 100.0).is_infinite());
        assert!(percent_change(0.0, 100.0) > 0.0);
    }

    #[test]
    fn trend_increasing() {
        let trend = determine_trend(&[100.0, 110.0]);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert!((trend.percent_change - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_decreasing() {
        let trend = determine_trend(&[100.0, 105.0, 90.0]);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert!((trend.percent_change + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_stable_within_threshold() {
        let trend = determine_trend(&[100.0, 103.0]);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!((trend.percent_change - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_single_point() {
        let trend = determine_trend(&[100.0]);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!(trend.percent_change.abs() < f64::EPSILON);
    }

    #[test]
    fn trend_zero_baseline() {
        let trend = determine_trend(&[0.0, 100.0]);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!(trend.percent_change.abs() < f64::EPSILON);
    }

    #[test]
    fn yearly_totals_groups_by_year() {
        let points = vec![
            point("2020-01", 100),
            point("2020-02", 150),
            point("2021-01", 200),
        ];
        let totals = yearly_totals(&points);
        assert_eq!(totals.get(&2020), Some(&250));
        assert_eq!(totals.get(&2021), Some(&200));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn yearly_totals_skips_bad_dates() {
        let totals = yearly_totals(&[point("", 5), point("n/a", 7), point("2022-03", 9)]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get(&2022), Some(&9));
    }
}
