//! Aggregation logic turning the upstream bucket response into chart data.
//!
//! Everything here is a pure function of its arguments: no I/O, no shared
//! state, and identical input always yields identical output. Ratios with a
//! zero denominator are defined as 0 rather than NaN or infinity.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::AnalyticsError;
use crate::model::{
    AnalyticsBucket, AnalyticsResponse, CardTrend, ChartDataPoint, DistributionSegment,
    FunnelStage, MetricCard, MetricKind, PeriodRates, SeriesExtremum, StageConversion,
    TrendAnalysis, TrendDirection,
};

/// Funnel stages in logical progression order.
pub const FUNNEL_STAGES: [MetricKind; 8] = [
    MetricKind::Signup,
    MetricKind::Matched,
    MetricKind::Applications,
    MetricKind::AnAccepted,
    MetricKind::Approvals,
    MetricKind::Realized,
    MetricKind::Finished,
    MetricKind::Completed,
];

/// Metrics shown as headline cards, in display order.
pub const HEADLINE_METRICS: [MetricKind; 5] = [
    MetricKind::Applications,
    MetricKind::Matched,
    MetricKind::Realized,
    MetricKind::Completed,
    MetricKind::Signup,
];

/// Number of trailing periods compared on a metric card.
const CARD_WINDOW: usize = 3;

/// Display format for chart dates ("Jul 2024").
const DISPLAY_DATE_FORMAT: &str = "%b %Y";

/// Merge every metric's buckets into one series, one point per distinct date.
///
/// Buckets come from each metric's `applications` collection, or `people`
/// when that is absent. The result is sorted ascending by the parsed date;
/// a metric with no bucket for a date leaves its key absent on that point.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDate`] if any bucket date cannot be
/// parsed. A partially merged series is never returned.
pub fn transform_analytics_data(
    response: &AnalyticsResponse,
) -> Result<Vec<ChartDataPoint>, AnalyticsError> {
    let mut points: Vec<(NaiveDateTime, ChartDataPoint)> = Vec::new();
    let mut index_by_date: HashMap<String, usize> = HashMap::new();

    for (kind, metric) in response.metrics() {
        for bucket in metric.buckets() {
            let index = match index_by_date.get(&bucket.key_as_string) {
                Some(&index) => index,
                None => {
                    let timestamp = parse_bucket_date(&bucket.key_as_string)?;
                    points.push((
                        timestamp,
                        ChartDataPoint {
                            date: bucket.key_as_string.clone(),
                            formatted_date: format_display_date(timestamp),
                            values: Default::default(),
                        },
                    ));
                    index_by_date.insert(bucket.key_as_string.clone(), points.len() - 1);
                    points.len() - 1
                }
            };

            points[index]
                .1
                .values
                .insert(kind.key().to_string(), bucket.doc_count);
        }
    }

    // Stable sort keeps first-encounter order for equal instants.
    points.sort_by_key(|(timestamp, _)| *timestamp);

    Ok(points.into_iter().map(|(_, point)| point).collect())
}

/// Parse an upstream bucket date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339, and naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (taken as UTC). Plain dates resolve to midnight UTC.
pub fn parse_bucket_date(date: &str) -> Result<NaiveDateTime, AnalyticsError> {
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(date) {
        return Ok(instant.naive_utc());
    }

    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| {
        AnalyticsError::InvalidDate {
            date: date.to_string(),
        }
    })
}

/// Format a bucket instant as a chart label.
pub fn format_display_date(timestamp: NaiveDateTime) -> String {
    timestamp.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Compare the first and second half of a metric's series.
///
/// Missing values count as zero. The series is split at `len / 2`; the
/// percent change of the half averages decides the direction (±5% band).
/// Max and min report the first point holding the extreme value.
///
/// Returns `None` when the series has fewer than two points.
pub fn calculate_trend_analysis(
    data: &[ChartDataPoint],
    metric_key: &str,
) -> Option<TrendAnalysis> {
    if data.len() < 2 {
        return None;
    }

    let values: Vec<u64> = data.iter().map(|p| p.value_or_zero(metric_key)).collect();
    let (first_half, second_half) = values.split_at(values.len() / 2);

    let first_avg = mean(first_half);
    let second_avg = mean(second_half);

    let percent_change = if first_avg == 0.0 {
        0.0
    } else {
        (second_avg - first_avg) / first_avg * 100.0
    };

    let max_index = first_extreme_index(&values, |candidate, best| candidate > best);
    let min_index = first_extreme_index(&values, |candidate, best| candidate < best);

    Some(TrendAnalysis {
        metric: metric_key.to_string(),
        trend: TrendDirection::from_percent_change(percent_change),
        percent_change: round_to(percent_change, 1),
        average: round_to(mean(&values), 0) as u64,
        max: SeriesExtremum {
            value: values[max_index],
            date: data[max_index].formatted_date.clone(),
        },
        min: SeriesExtremum {
            value: values[min_index],
            date: data[min_index].formatted_date.clone(),
        },
    })
}

/// Trend analysis for every catalogue metric that has at least two points.
pub fn calculate_all_trends(data: &[ChartDataPoint]) -> Vec<TrendAnalysis> {
    MetricKind::ALL
        .iter()
        .filter_map(|kind| calculate_trend_analysis(data, kind.key()))
        .collect()
}

/// The eight funnel stages with their totals.
///
/// Absent metrics yield a zero-valued stage, never a missing one. Stage
/// counts are reported as-is; a stage may exceed the one before it.
pub fn calculate_funnel_data(response: &AnalyticsResponse) -> Vec<FunnelStage> {
    FUNNEL_STAGES
        .iter()
        .map(|kind| FunnelStage {
            stage: kind.label().to_string(),
            value: response.doc_count(*kind),
            color: kind.color().to_string(),
        })
        .collect()
}

/// Conversion rate between each pair of consecutive funnel stages.
pub fn calculate_stage_conversions(funnel: &[FunnelStage]) -> Vec<StageConversion> {
    funnel
        .windows(2)
        .map(|pair| StageConversion {
            from: pair[0].stage.clone(),
            to: pair[1].stage.clone(),
            rate: round_to(percentage(pair[1].value, pair[0].value), 1),
            color: pair[1].color.clone(),
        })
        .collect()
}

/// Split applications into the pipeline stage each one currently sits in.
///
/// Each segment is the difference between adjacent cumulative totals, so a
/// segment only appears when the later total is strictly smaller.
pub fn calculate_distribution(response: &AnalyticsResponse) -> Vec<DistributionSegment> {
    let count = |kind: MetricKind| response.doc_count(kind);
    let gap = |earlier: MetricKind, later: MetricKind| count(earlier).saturating_sub(count(later));
    let applications = response.doc_count(MetricKind::Applications);

    let segments = [
        (
            "Pending",
            gap(MetricKind::Applications, MetricKind::Matched),
            "#94a3b8",
        ),
        (
            "Matched (Pending)",
            gap(MetricKind::Matched, MetricKind::Approvals),
            MetricKind::Matched.color(),
        ),
        (
            "Approved",
            gap(MetricKind::Approvals, MetricKind::Realized),
            MetricKind::Approvals.color(),
        ),
        (
            "Realized",
            gap(MetricKind::Realized, MetricKind::Finished),
            MetricKind::Realized.color(),
        ),
        (
            "Finished",
            gap(MetricKind::Finished, MetricKind::Completed),
            MetricKind::Finished.color(),
        ),
        (
            "Completed",
            count(MetricKind::Completed),
            MetricKind::Completed.color(),
        ),
    ];

    segments
        .into_iter()
        .filter(|(_, value, _)| *value > 0)
        .map(|(name, value, color)| DistributionSegment {
            name: name.to_string(),
            value,
            share: round_to(percentage(value, applications), 1),
            color: color.to_string(),
        })
        .collect()
}

/// Per-period match, realization and completion rates.
pub fn calculate_period_rates(data: &[ChartDataPoint]) -> Vec<PeriodRates> {
    let rate = |point: &ChartDataPoint, numerator: MetricKind, denominator: MetricKind| {
        let denominator = point.value_or_zero(denominator.key());
        round_to(
            percentage(point.value_or_zero(numerator.key()), denominator),
            1,
        )
    };

    data.iter()
        .map(|point| PeriodRates {
            date: point.date.clone(),
            formatted_date: point.formatted_date.clone(),
            match_rate: rate(point, MetricKind::Matched, MetricKind::Applications),
            realization_rate: rate(point, MetricKind::Realized, MetricKind::Matched),
            completion_rate: rate(point, MetricKind::Completed, MetricKind::Realized),
        })
        .collect()
}

/// Headline cards for the metrics the upstream reported.
pub fn calculate_metric_cards(response: &AnalyticsResponse) -> Vec<MetricCard> {
    HEADLINE_METRICS
        .iter()
        .filter_map(|kind| {
            let metric = response.metric(*kind)?;
            let (trend, change) = card_trend(metric.buckets());
            Some(MetricCard {
                metric: *kind,
                label: kind.label().to_string(),
                description: kind.description().to_string(),
                color: kind.color().to_string(),
                total: metric.doc_count,
                trend,
                change,
            })
        })
        .collect()
}

/// Compare the last three buckets with the three before them.
///
/// Both sums are divided by three even when fewer buckets exist.
fn card_trend(buckets: &[AnalyticsBucket]) -> (CardTrend, i64) {
    if buckets.len() < 2 {
        return (CardTrend::Stable, 0);
    }

    let len = buckets.len();
    let window_sum = |range: std::ops::Range<usize>| -> f64 {
        buckets[range].iter().map(|b| b.doc_count as f64).sum()
    };

    let recent = window_sum(len.saturating_sub(CARD_WINDOW)..len) / CARD_WINDOW as f64;
    let previous_range = len.saturating_sub(CARD_WINDOW * 2)..len.saturating_sub(CARD_WINDOW);
    let previous = window_sum(previous_range) / CARD_WINDOW as f64;

    if previous == 0.0 {
        return (CardTrend::Stable, 0);
    }

    let change = (recent - previous) / previous * 100.0;
    let trend = if change > 5.0 {
        CardTrend::Up
    } else if change < -5.0 {
        CardTrend::Down
    } else {
        CardTrend::Stable
    };

    (trend, round_to(change, 0) as i64)
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Round half up to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<u64>() as f64 / values.len() as f64
    }
}

/// Index of the first value that no later value beats under `better`.
fn first_extreme_index(values: &[u64], better: impl Fn(u64, u64) -> bool) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if better(value, values[best]) {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalyticsMetric, BucketCollection};

    fn bucket(date: &str, count: u64) -> AnalyticsBucket {
        let key = parse_bucket_date(date).unwrap().and_utc().timestamp_millis();
        AnalyticsBucket {
            key_as_string: date.to_string(),
            key,
            doc_count: count,
        }
    }

    fn metric(total: u64, buckets: Vec<AnalyticsBucket>) -> AnalyticsMetric {
        AnalyticsMetric {
            doc_count: total,
            applications: Some(BucketCollection { buckets }),
            people: None,
        }
    }

    fn people_metric(total: u64, buckets: Vec<AnalyticsBucket>) -> AnalyticsMetric {
        AnalyticsMetric {
            doc_count: total,
            applications: None,
            people: Some(BucketCollection { buckets }),
        }
    }

    fn series(key: &str, values: &[u64]) -> Vec<ChartDataPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let date = format!("2024-{:02}-01", i + 1);
                let timestamp = parse_bucket_date(&date).unwrap();
                ChartDataPoint {
                    date,
                    formatted_date: format_display_date(timestamp),
                    values: [(key.to_string(), *v)].into_iter().collect(),
                }
            })
            .collect()
    }

    #[test]
    fn test_transform_empty_response() {
        let data = transform_analytics_data(&AnalyticsResponse::default()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_transform_merges_and_sorts() {
        // Buckets deliberately out of order across metrics
        let response = AnalyticsResponse::default()
            .with_metric(
                MetricKind::Applications,
                metric(30, vec![bucket("2024-03-01", 20), bucket("2024-01-01", 10)]),
            )
            .with_metric(
                MetricKind::Signup,
                people_metric(9, vec![bucket("2024-02-01", 4), bucket("2024-01-01", 5)]),
            );

        let data = transform_analytics_data(&response).unwrap();

        let dates: Vec<&str> = data.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
        assert_eq!(data[0].formatted_date, "Jan 2024");
        assert_eq!(data[0].value("total_signup"), Some(5));
        assert_eq!(data[0].value("total_applications"), Some(10));
    }

    #[test]
    fn test_transform_leaves_missing_keys_absent() {
        let response = AnalyticsResponse::default()
            .with_metric(
                MetricKind::Applications,
                metric(
                    30,
                    vec![
                        bucket("2024-01-01", 10),
                        bucket("2024-02-01", 15),
                        bucket("2024-03-01", 5),
                    ],
                ),
            )
            .with_metric(
                MetricKind::Realized,
                metric(3, vec![bucket("2024-01-01", 1), bucket("2024-02-01", 2)]),
            );

        let data = transform_analytics_data(&response).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data[1].value("total_realized"), Some(2));
        assert_eq!(data[2].value("total_realized"), None);
        assert!(!data[2].values.contains_key("total_realized"));
        assert_eq!(data[2].value_or_zero("total_realized"), 0);
    }

    #[test]
    fn test_transform_metric_without_buckets() {
        let response = AnalyticsResponse::default().with_metric(
            MetricKind::Completed,
            AnalyticsMetric {
                doc_count: 42,
                applications: None,
                people: None,
            },
        );

        assert!(transform_analytics_data(&response).unwrap().is_empty());
    }

    #[test]
    fn test_transform_rejects_malformed_date() {
        let response = AnalyticsResponse::default().with_metric(
            MetricKind::Applications,
            metric(
                1,
                vec![AnalyticsBucket {
                    key_as_string: "July 2024".to_string(),
                    key: 0,
                    doc_count: 1,
                }],
            ),
        );

        let err = transform_analytics_data(&response).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDate { ref date } if date == "July 2024"));
    }

    #[test]
    fn test_transform_is_idempotent() {
        let response = crate::demo::demo_response();
        let first = transform_analytics_data(&response).unwrap();
        let second = transform_analytics_data(&response).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_bucket_date_formats() {
        let midnight = parse_bucket_date("2024-07-01").unwrap();
        assert_eq!(parse_bucket_date("2024-07-01T00:00:00.000Z").unwrap(), midnight);
        assert_eq!(parse_bucket_date("2024-07-01T02:00:00+02:00").unwrap(), midnight);
        assert_eq!(parse_bucket_date("2024-07-01T00:00:00").unwrap(), midnight);
        assert!(parse_bucket_date("").is_err());
        assert!(parse_bucket_date("2024-13-01").is_err());
    }

    #[test]
    fn test_trend_requires_two_points() {
        assert!(calculate_trend_analysis(&[], "total_applications").is_none());
        let one = series("total_applications", &[5]);
        assert!(calculate_trend_analysis(&one, "total_applications").is_none());
    }

    #[test]
    fn test_trend_two_points() {
        let data = series("total_applications", &[5, 15]);

        let trend = calculate_trend_analysis(&data, "total_applications").unwrap();

        assert_eq!(trend.metric, "total_applications");
        assert_eq!(trend.percent_change, 200.0);
        assert_eq!(trend.trend, TrendDirection::Increasing);
        assert_eq!(trend.average, 10);
        assert_eq!(trend.max.value, 15);
        assert_eq!(trend.max.date, "Feb 2024");
        assert_eq!(trend.min.value, 5);
        assert_eq!(trend.min.date, "Jan 2024");
    }

    #[test]
    fn test_trend_odd_length_split() {
        // First half [10], second half [9, 8] -> avg 8.5 -> -15%
        let data = series("total_matched", &[10, 9, 8]);

        let trend = calculate_trend_analysis(&data, "total_matched").unwrap();

        assert_eq!(trend.percent_change, -15.0);
        assert_eq!(trend.trend, TrendDirection::Decreasing);
        assert_eq!(trend.average, 9);
    }

    #[test]
    fn test_trend_zero_first_half() {
        let data = series("total_realized", &[0, 0, 7, 9]);

        let trend = calculate_trend_analysis(&data, "total_realized").unwrap();

        assert_eq!(trend.percent_change, 0.0);
        assert_eq!(trend.trend, TrendDirection::Stable);
        assert_eq!(trend.min.value, 0);
        assert_eq!(trend.min.date, "Jan 2024");
    }

    #[test]
    fn test_trend_missing_metric_counts_as_zero() {
        let data = series("total_applications", &[1, 2]);

        let trend = calculate_trend_analysis(&data, "total_completed").unwrap();

        assert_eq!(trend.average, 0);
        assert_eq!(trend.max.value, 0);
        assert_eq!(trend.max.date, "Jan 2024");
        assert_eq!(trend.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_trend_ties_take_first_occurrence() {
        let data = series("total_applications", &[3, 9, 1, 9, 1]);

        let trend = calculate_trend_analysis(&data, "total_applications").unwrap();

        assert_eq!(trend.max.date, "Feb 2024");
        assert_eq!(trend.min.date, "Mar 2024");
    }

    #[test]
    fn test_trend_rounding() {
        // (7 - 6) / 6 * 100 = 16.666.. -> 16.7
        let data = series("total_applications", &[6, 7]);
        let trend = calculate_trend_analysis(&data, "total_applications").unwrap();
        assert_eq!(trend.percent_change, 16.7);
        // mean 6.5 rounds half up
        assert_eq!(trend.average, 7);
    }

    #[test]
    fn test_all_trends_skip_short_series() {
        assert!(calculate_all_trends(&series("total_applications", &[1])).is_empty());

        let trends = calculate_all_trends(&series("total_applications", &[1, 2]));
        assert_eq!(trends.len(), MetricKind::ALL.len());
        assert_eq!(trends[0].metric, "total_signup");
    }

    #[test]
    fn test_funnel_missing_stage_is_zero() {
        let response = AnalyticsResponse::default()
            .with_metric(MetricKind::Applications, metric(100, vec![]))
            .with_metric(MetricKind::Approvals, metric(40, vec![]));

        let funnel = calculate_funnel_data(&response);

        assert_eq!(funnel.len(), 8);
        assert_eq!(funnel[3].stage, "Accepted by Host");
        assert_eq!(funnel[3].value, 0);
        assert_eq!(funnel[3].color, "#10b981");
        assert_eq!(funnel[2].value, 100);
        // Not normalised: approvals may exceed accepted-by-host
        assert!(funnel[4].value > funnel[3].value);
    }

    #[test]
    fn test_funnel_order() {
        let stages: Vec<String> = calculate_funnel_data(&AnalyticsResponse::default())
            .into_iter()
            .map(|s| s.stage)
            .collect();
        assert_eq!(
            stages,
            vec![
                "Sign-ups",
                "Matched",
                "Applications",
                "Accepted by Host",
                "Approvals",
                "Realized",
                "Finished",
                "Completed"
            ]
        );
    }

    #[test]
    fn test_stage_conversions() {
        let response = AnalyticsResponse::default()
            .with_metric(MetricKind::Signup, metric(200, vec![]))
            .with_metric(MetricKind::Matched, metric(50, vec![]));

        let conversions = calculate_stage_conversions(&calculate_funnel_data(&response));

        assert_eq!(conversions.len(), 7);
        assert_eq!(conversions[0].from, "Sign-ups");
        assert_eq!(conversions[0].to, "Matched");
        assert_eq!(conversions[0].rate, 25.0);
        // Applications is absent, so the next stage divides by zero
        assert_eq!(conversions[2].rate, 0.0);
    }

    #[test]
    fn test_distribution_drops_non_positive_segments() {
        let response = AnalyticsResponse::default()
            .with_metric(MetricKind::Applications, metric(1000, vec![]))
            .with_metric(MetricKind::Matched, metric(100, vec![]))
            .with_metric(MetricKind::Approvals, metric(120, vec![]))
            .with_metric(MetricKind::Realized, metric(60, vec![]));

        let segments = calculate_distribution(&response);
        let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["Pending", "Approved", "Realized"]);
        assert_eq!(segments[0].value, 900);
        assert_eq!(segments[0].share, 90.0);
        assert_eq!(segments[2].value, 60);
        assert_eq!(segments[2].share, 6.0);
    }

    #[test]
    fn test_distribution_handles_totals_beyond_i64() {
        let huge = u64::MAX - 10;
        let response = AnalyticsResponse::default()
            .with_metric(MetricKind::Applications, metric(huge, vec![]))
            .with_metric(MetricKind::Matched, metric(huge - 40, vec![]))
            .with_metric(MetricKind::Approvals, metric(huge, vec![]));

        let segments = calculate_distribution(&response);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].name, "Pending");
        assert_eq!(segments[0].value, 40);
        assert_eq!(segments[1].name, "Approved");
        assert_eq!(segments[1].value, huge);
        assert_eq!(segments[1].share, 100.0);
    }

    #[test]
    fn test_distribution_without_applications() {
        let response = AnalyticsResponse::default()
            .with_metric(MetricKind::Completed, metric(5, vec![]));

        let segments = calculate_distribution(&response);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].name, "Completed");
        assert_eq!(segments[0].share, 0.0);
    }

    #[test]
    fn test_period_rates() {
        let mut data = series("total_applications", &[200, 0]);
        data[0].values.insert("total_matched".to_string(), 3);
        data[0].values.insert("total_realized".to_string(), 1);

        let rates = calculate_period_rates(&data);

        assert_eq!(rates[0].match_rate, 1.5);
        assert_eq!(rates[0].realization_rate, 33.3);
        assert_eq!(rates[0].completion_rate, 0.0);
        assert_eq!(rates[1].match_rate, 0.0);
    }

    #[test]
    fn test_card_trend_windows() {
        let buckets: Vec<AnalyticsBucket> = [10, 10, 10, 20, 20, 20]
            .iter()
            .enumerate()
            .map(|(i, c)| bucket(&format!("2024-{:02}-01", i + 1), *c))
            .collect();

        assert_eq!(card_trend(&buckets), (CardTrend::Up, 100));
        assert_eq!(card_trend(&buckets[..1]), (CardTrend::Stable, 0));
    }

    #[test]
    fn test_card_trend_short_history_divides_by_window() {
        // previous = 10 / 3, recent = (10 + 10 + 1) / 3 -> +110%
        let buckets: Vec<AnalyticsBucket> = [10, 10, 10, 1]
            .iter()
            .enumerate()
            .map(|(i, c)| bucket(&format!("2024-{:02}-01", i + 1), *c))
            .collect();

        assert_eq!(card_trend(&buckets), (CardTrend::Up, 110));

        // Only two buckets: the previous window is empty
        assert_eq!(card_trend(&buckets[..2]), (CardTrend::Stable, 0));
    }

    #[test]
    fn test_metric_cards_skip_absent_metrics() {
        let response = AnalyticsResponse::default()
            .with_metric(MetricKind::Signup, people_metric(12, vec![]))
            .with_metric(MetricKind::Applications, metric(30, vec![]));

        let cards = calculate_metric_cards(&response);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].metric, MetricKind::Applications);
        assert_eq!(cards[1].metric, MetricKind::Signup);
        assert_eq!(cards[1].total, 12);
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(10, 0), 0.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(-15.04, 1), -15.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
    }
}
