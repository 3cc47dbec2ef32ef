use crate::models::{round2, GrowthMetrics, GrowthTrend, MonthlySnapshot};

/// Trend classification looks at the mean of the last N per-step growth
/// values and compares it against +/- this many percentage points.
const TREND_WINDOW: usize = 3;
const TREND_THRESHOLD_PCT: f64 = 2.0;

/// Growth figures over a snapshot sequence sorted by `month_number`.
///
/// Fewer than two snapshots means there is no step to measure: every
/// percentage is 0 and the trend is stable.
pub fn analyze_growth(snapshots: &[MonthlySnapshot]) -> GrowthMetrics {
    if snapshots.len() < 2 {
        return GrowthMetrics {
            total_growth_pct: 0.0,
            monthly_growth_pct: 0.0,
            average_monthly_growth_pct: 0.0,
            trend: GrowthTrend::Stable,
            projected_next_month: snapshots
                .last()
                .map(|s| s.active_patients_start)
                .unwrap_or(0),
            growth_rate_pct: 0.0,
        };
    }

    let first = &snapshots[0];
    let last = &snapshots[snapshots.len() - 1];

    let total_growth_pct = if first.total_patients == 0 {
        0.0
    } else {
        (last.total_patients - first.total_patients) as f64 / first.total_patients as f64 * 100.0
    };

    // Per-step growth of the active base; a zero previous month is floored
    // to 1 so a single empty month cannot blow up the series.
    let steps: Vec<f64> = snapshots
        .windows(2)
        .map(|pair| {
            let previous = pair[0].active_patients_start;
            let current = pair[1].active_patients_start;
            (current - previous) as f64 / previous.max(1) as f64 * 100.0
        })
        .collect();

    let average = mean(&steps);
    let monthly = steps.last().copied().unwrap_or(0.0);

    let recent_start = steps.len().saturating_sub(TREND_WINDOW);
    let recent_mean = mean(&steps[recent_start..]);
    let trend = if recent_mean > TREND_THRESHOLD_PCT {
        GrowthTrend::Growing
    } else if recent_mean < -TREND_THRESHOLD_PCT {
        GrowthTrend::Declining
    } else {
        GrowthTrend::Stable
    };

    // Projection uses the full-precision average, not the reported one.
    let projected_next_month =
        (last.active_patients_start as f64 * (1.0 + average / 100.0)).round() as i64;

    let growth_rate_pct =
        compound_monthly_rate(first.total_patients, last.total_patients, snapshots.len());

    GrowthMetrics {
        total_growth_pct: round2(total_growth_pct),
        monthly_growth_pct: round2(monthly),
        average_monthly_growth_pct: round2(average),
        trend,
        projected_next_month,
        growth_rate_pct: round2(growth_rate_pct),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Compound monthly growth rate over the total patient base.
fn compound_monthly_rate(first_total: i64, last_total: i64, months: usize) -> f64 {
    if months < 2 || first_total <= 0 || last_total <= 0 {
        return 0.0;
    }
    let periods = (months - 1) as f64;
    ((last_total as f64 / first_total as f64).powf(1.0 / periods) - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(month_number: i32, active: i64, entered: i64) -> MonthlySnapshot {
        MonthlySnapshot::from_raw(
            month_number,
            Some(format!("Mês {month_number}")),
            2026,
            Some(active),
            Some(entered),
            Some(0),
            Some(0.10),
            Some(0.85),
        )
    }

    #[test]
    fn empty_input_yields_neutral_metrics() {
        let metrics = analyze_growth(&[]);
        assert_eq!(metrics.total_growth_pct, 0.0);
        assert_eq!(metrics.monthly_growth_pct, 0.0);
        assert_eq!(metrics.average_monthly_growth_pct, 0.0);
        assert_eq!(metrics.trend, GrowthTrend::Stable);
        assert_eq!(metrics.projected_next_month, 0);
        assert_eq!(metrics.growth_rate_pct, 0.0);
    }

    #[test]
    fn single_snapshot_is_stable_with_zero_growth() {
        let metrics = analyze_growth(&[snapshot(1, 40, 5)]);
        assert_eq!(metrics.monthly_growth_pct, 0.0);
        assert_eq!(metrics.trend, GrowthTrend::Stable);
        assert_eq!(metrics.projected_next_month, 40);
    }

    #[test]
    fn two_snapshots_match_hand_computed_figures() {
        let metrics = analyze_growth(&[snapshot(1, 50, 10), snapshot(2, 55, 12)]);
        // Single step: (55 - 50) / 50 * 100 = 10, so the average is 10 too.
        assert_eq!(metrics.average_monthly_growth_pct, 10.0);
        assert_eq!(metrics.monthly_growth_pct, 10.0);
        // Totals go 60 -> 67.
        assert_eq!(metrics.total_growth_pct, round2(7.0 / 60.0 * 100.0));
        assert_eq!(metrics.trend, GrowthTrend::Growing);
        // 55 * 1.10 = 60.5, rounded away from zero.
        assert_eq!(metrics.projected_next_month, 61);
    }

    #[test]
    fn zero_first_total_never_divides_by_zero() {
        let metrics = analyze_growth(&[snapshot(1, 0, 0), snapshot(2, 10, 0)]);
        assert_eq!(metrics.total_growth_pct, 0.0);
        assert_eq!(metrics.growth_rate_pct, 0.0);
        // Step guard floors the zero previous month to 1.
        assert_eq!(metrics.monthly_growth_pct, 1000.0);
    }

    #[test]
    fn trend_uses_only_the_last_three_steps() {
        // Early decline followed by three flat months: the old drop must not
        // drag the classification below stable.
        let metrics = analyze_growth(&[
            snapshot(1, 100, 0),
            snapshot(2, 80, 0),
            snapshot(3, 80, 0),
            snapshot(4, 81, 0),
            snapshot(5, 81, 0),
        ]);
        assert_eq!(metrics.trend, GrowthTrend::Stable);
    }

    #[test]
    fn sustained_decline_classifies_as_declining() {
        let metrics = analyze_growth(&[
            snapshot(1, 100, 0),
            snapshot(2, 90, 0),
            snapshot(3, 81, 0),
            snapshot(4, 73, 0),
        ]);
        assert_eq!(metrics.trend, GrowthTrend::Declining);
    }

    #[test]
    fn compound_rate_spans_the_whole_sequence() {
        // 100 -> 121 total over two steps is 10% compound per month.
        let metrics = analyze_growth(&[
            snapshot(1, 100, 0),
            snapshot(2, 110, 0),
            snapshot(3, 121, 0),
        ]);
        assert_eq!(metrics.growth_rate_pct, 10.0);
    }
}
