use crate::models::{round2, ChurnTrend, MonthlySnapshot, RetentionHealth, RetentionMetrics, RetentionTrend};

/// Window size for the trend comparison and the point deltas that count as
/// movement. Retention needs a bigger swing than churn to change trend.
const TREND_WINDOW: usize = 3;
const RETENTION_DELTA_PTS: f64 = 5.0;
const CHURN_DELTA_PTS: f64 = 2.0;

/// Retention figures over a snapshot sequence sorted by `month_number`.
///
/// The trend comparison windows are the first three snapshots against the
/// three that follow them, on ascending data. Product has been asked to
/// confirm this is intended; see DESIGN.md.
pub fn analyze_retention(snapshots: &[MonthlySnapshot]) -> RetentionMetrics {
    if snapshots.is_empty() {
        return RetentionMetrics {
            average_retention_pct: 0.0,
            retention_trend: RetentionTrend::Stable,
            churn_rate_pct: 0.0,
            churn_trend: ChurnTrend::Stable,
            retention_health: RetentionHealth::Good,
        };
    }

    let renewals: Vec<f64> = snapshots.iter().map(|s| s.renewal_rate).collect();
    let churns: Vec<f64> = snapshots.iter().map(|s| s.churn_rate).collect();

    let average_retention = mean(&renewals);
    let average_churn = mean(&churns);

    let retention_trend = match window_delta(&renewals) {
        Some(delta) if delta > RETENTION_DELTA_PTS => RetentionTrend::Improving,
        Some(delta) if delta < -RETENTION_DELTA_PTS => RetentionTrend::Declining,
        _ => RetentionTrend::Stable,
    };

    // Inverted sense: churn going down is the improvement.
    let churn_trend = match window_delta(&churns) {
        Some(delta) if delta < -CHURN_DELTA_PTS => ChurnTrend::Improving,
        Some(delta) if delta > CHURN_DELTA_PTS => ChurnTrend::Worsening,
        _ => ChurnTrend::Stable,
    };

    RetentionMetrics {
        average_retention_pct: round2(average_retention),
        retention_trend,
        churn_rate_pct: round2(average_churn),
        churn_trend,
        retention_health: bucket_health(average_retention, average_churn),
    }
}

/// Mean of values[3..6] minus mean of values[0..3]; `None` when there is no
/// second window to compare against.
fn window_delta(values: &[f64]) -> Option<f64> {
    if values.len() <= TREND_WINDOW {
        return None;
    }
    let older = &values[..TREND_WINDOW];
    let recent = &values[TREND_WINDOW..(TREND_WINDOW * 2).min(values.len())];
    Some(mean(recent) - mean(older))
}

/// First matching rule wins.
fn bucket_health(retention: f64, churn: f64) -> RetentionHealth {
    if retention >= 85.0 && churn <= 5.0 {
        RetentionHealth::Excellent
    } else if retention >= 75.0 && churn <= 8.0 {
        RetentionHealth::Good
    } else if retention >= 60.0 && churn <= 12.0 {
        RetentionHealth::Fair
    } else {
        RetentionHealth::Poor
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
