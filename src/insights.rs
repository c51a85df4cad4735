//! KPI insights derived from metric totals and the merged series.
//!
//! The composition is fixed: seven insights in a fixed order, each emitted
//! even when its denominator is zero (the ratio is then 0).

use crate::aggregation::{calculate_trend_analysis, percentage, ratio, round_to};
use crate::model::{
    AnalyticsInsight, AnalyticsResponse, ChartDataPoint, InsightKind, InsightValue, MetricKind,
    TrendDirection,
};

/// Derive the KPI insights for a reporting window.
///
/// Rates are computed from the upstream totals (`doc_count`), not the
/// bucketed series; the series only feeds the trend-based insights.
/// Returns an empty list when the series has fewer than two points.
pub fn generate_insights(
    data: &[ChartDataPoint],
    response: &AnalyticsResponse,
) -> Vec<AnalyticsInsight> {
    let applications_trend = calculate_trend_analysis(data, MetricKind::Applications.key());
    let realized_trend = calculate_trend_analysis(data, MetricKind::Realized.key());

    let (Some(applications_trend), Some(realized_trend)) = (applications_trend, realized_trend)
    else {
        return Vec::new();
    };

    let applications = response.doc_count(MetricKind::Applications);
    let realized = response.doc_count(MetricKind::Realized);
    let finished = response.doc_count(MetricKind::Finished);
    let matched = response.doc_count(MetricKind::Matched);
    let approvals = response.doc_count(MetricKind::Approvals);
    let signups = response.doc_count(MetricKind::Signup);

    let mut insights = Vec::with_capacity(7);

    let conversion_rate = percentage(realized, applications);
    insights.push(AnalyticsInsight {
        kind: if conversion_rate > 1.0 {
            InsightKind::Positive
        } else {
            InsightKind::Warning
        },
        title: "Conversion Rate".to_string(),
        description: format!(
            "{:.2}% of applications convert to realized exchanges",
            round_to(conversion_rate, 2)
        ),
        value: Some(InsightValue::Text(format!("{:.2}%", round_to(conversion_rate, 2)))),
        change: None,
        formula: Some(percent_formula("Realized", realized, "Applications", applications)),
    });

    let completion_rate = percentage(finished, realized);
    insights.push(AnalyticsInsight {
        kind: if completion_rate > 70.0 {
            InsightKind::Positive
        } else if completion_rate > 50.0 {
            InsightKind::Neutral
        } else {
            InsightKind::Negative
        },
        title: "Completion Rate".to_string(),
        description: format!(
            "{:.1}% of realized exchanges are finished",
            round_to(completion_rate, 1)
        ),
        value: Some(InsightValue::Text(format!("{:.1}%", round_to(completion_rate, 1)))),
        change: None,
        formula: Some(percent_formula("Finished", finished, "Realized", realized)),
    });

    let match_rate = percentage(matched, applications);
    insights.push(AnalyticsInsight {
        kind: if match_rate > 5.0 {
            InsightKind::Positive
        } else {
            InsightKind::Neutral
        },
        title: "Match Rate".to_string(),
        description: format!("{:.2}% of applications get matched", round_to(match_rate, 2)),
        value: Some(InsightValue::Text(format!("{:.2}%", round_to(match_rate, 2)))),
        change: None,
        formula: Some(percent_formula("Matched", matched, "Applications", applications)),
    });

    insights.push(AnalyticsInsight {
        kind: match applications_trend.trend {
            TrendDirection::Increasing => InsightKind::Positive,
            TrendDirection::Decreasing => InsightKind::Warning,
            TrendDirection::Stable => InsightKind::Neutral,
        },
        title: "Applications Trend".to_string(),
        description: format!(
            "Applications are {} with {}% change",
            applications_trend.trend,
            applications_trend.percent_change.abs()
        ),
        value: None,
        change: Some(applications_trend.percent_change),
        formula: Some("Trend % = ((Recent Avg - Previous Avg) ÷ Previous Avg) × 100".to_string()),
    });

    insights.push(AnalyticsInsight {
        kind: InsightKind::Neutral,
        title: "Peak Performance".to_string(),
        description: format!(
            "Highest realized exchanges ({}) occurred in {}",
            realized_trend.max.value, realized_trend.max.date
        ),
        value: Some(InsightValue::Count(realized_trend.max.value)),
        change: None,
        formula: Some("Maximum value from time series data".to_string()),
    });

    let approval_to_realization = percentage(realized, approvals);
    insights.push(AnalyticsInsight {
        kind: if approval_to_realization > 40.0 {
            InsightKind::Positive
        } else {
            InsightKind::Warning
        },
        title: "Approval to Realization".to_string(),
        description: format!(
            "{:.1}% of approvals convert to realizations",
            round_to(approval_to_realization, 1)
        ),
        value: Some(InsightValue::Text(format!("{:.1}%", round_to(approval_to_realization, 1)))),
        change: None,
        formula: Some(percent_formula("Realized", realized, "Approvals", approvals)),
    });

    let engagement = ratio(applications, signups);
    insights.push(AnalyticsInsight {
        kind: if engagement > 5.0 {
            InsightKind::Positive
        } else {
            InsightKind::Neutral
        },
        title: "Engagement Rate".to_string(),
        description: format!(
            "Each sign-up generates an average of {:.1} applications",
            round_to(engagement, 1)
        ),
        value: Some(InsightValue::Text(format!("{:.1}", round_to(engagement, 1)))),
        change: None,
        formula: Some(format!(
            "Applications ÷ Sign-ups = {} ÷ {}",
            format_count(applications),
            format_count(signups)
        )),
    });

    insights
}

fn percent_formula(
    numerator_label: &str,
    numerator: u64,
    denominator_label: &str,
    denominator: u64,
) -> String {
    format!(
        "({} ÷ {}) × 100 = ({} ÷ {}) × 100",
        numerator_label,
        denominator_label,
        format_count(numerator),
        format_count(denominator)
    )
}

/// Format a count with comma thousands separators ("25,925").
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
