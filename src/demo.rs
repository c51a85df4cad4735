//! Built-in demonstration dataset.
//!
//! Twelve monthly buckets (July 2024 to June 2025) for every metric. Served
//! by `GET /api/dashboard/demo` and used as the fallback when the upstream
//! cannot be reached.

use crate::model::{
    AnalyticsBucket, AnalyticsMetric, AnalyticsResponse, BucketCollection, MetricKind,
};

/// Bucket periods as (date, epoch milliseconds).
const DEMO_PERIODS: [(&str, i64); 12] = [
    ("2024-07-01", 1_719_792_000_000),
    ("2024-08-01", 1_722_470_400_000),
    ("2024-09-01", 1_725_148_800_000),
    ("2024-10-01", 1_727_740_800_000),
    ("2024-11-01", 1_730_419_200_000),
    ("2024-12-01", 1_733_011_200_000),
    ("2025-01-01", 1_735_689_600_000),
    ("2025-02-01", 1_738_368_000_000),
    ("2025-03-01", 1_740_787_200_000),
    ("2025-04-01", 1_743_465_600_000),
    ("2025-05-01", 1_746_057_600_000),
    ("2025-06-01", 1_748_736_000_000),
];

/// Per-metric (total, monthly counts).
const DEMO_COUNTS: [(MetricKind, u64, [u64; 12]); 9] = [
    (
        MetricKind::RemoteRealized,
        0,
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    ),
    (
        MetricKind::Completed,
        104,
        [10, 29, 29, 5, 2, 6, 1, 7, 4, 4, 2, 5],
    ),
    (
        MetricKind::Finished,
        203,
        [24, 66, 47, 10, 5, 10, 5, 13, 6, 8, 2, 7],
    ),
    (
        MetricKind::Realized,
        243,
        [75, 24, 14, 15, 7, 4, 11, 7, 7, 6, 10, 63],
    ),
    (
        MetricKind::AnAccepted,
        674,
        [42, 25, 19, 36, 128, 41, 17, 26, 65, 175, 61, 39],
    ),
    (
        MetricKind::Applications,
        25925,
        [1847, 2309, 2264, 2574, 2545, 2245, 1958, 1392, 2188, 2689, 1903, 2011],
    ),
    (
        MetricKind::Approvals,
        535,
        [44, 18, 14, 20, 89, 29, 5, 24, 50, 154, 50, 38],
    ),
    (
        MetricKind::Matched,
        1006,
        [31, 43, 49, 68, 166, 57, 33, 43, 123, 244, 94, 55],
    ),
    (
        MetricKind::Signup,
        4381,
        [120, 139, 257, 1270, 498, 103, 54, 449, 350, 753, 217, 171],
    ),
];

/// Build the demonstration response.
///
/// Sign-ups are filed under `people`, every other metric under
/// `applications`, matching the upstream schema.
pub fn demo_response() -> AnalyticsResponse {
    DEMO_COUNTS
        .iter()
        .fold(AnalyticsResponse::default(), |response, (kind, total, counts)| {
            let collection = BucketCollection {
                buckets: DEMO_PERIODS
                    .iter()
                    .zip(counts.iter())
                    .map(|((date, key), count)| AnalyticsBucket {
                        key_as_string: date.to_string(),
                        key: *key,
                        doc_count: *count,
                    })
                    .collect(),
            };

            let metric = if *kind == MetricKind::Signup {
                AnalyticsMetric {
                    doc_count: *total,
                    applications: None,
                    people: Some(collection),
                }
            } else {
                AnalyticsMetric {
                    doc_count: *total,
                    applications: Some(collection),
                    people: None,
                }
            };

            response.with_metric(*kind, metric)
        })
}
