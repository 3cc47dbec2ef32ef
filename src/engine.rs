use tracing::debug;

use crate::growth::analyze_growth;
use crate::health::{score_baseline, score_extended};
use crate::insights::narrate_insights;
use crate::kpi::assemble_kpis;
use crate::models::{HealthMetrics, MetricsBundle, MonthlySnapshot};
use crate::retention::analyze_retention;
use crate::seasonality::analyze_seasonality;

/// Run the full analytics pipeline over a snapshot sequence.
///
/// Pure and deterministic: the same input always produces the same bundle,
/// nothing is cached, and the caller's ordering is not trusted — snapshots
/// are re-sorted by `month_number` before any analyzer runs.
pub fn compute_metrics(snapshots: &[MonthlySnapshot]) -> MetricsBundle {
    let ordered = sort_by_month(snapshots);

    let growth = analyze_growth(&ordered);
    let retention = analyze_retention(&ordered);
    let seasonality = analyze_seasonality(&ordered);

    // Growth data only exists once there is a step to measure.
    let monthly_growth = if ordered.len() >= 2 {
        Some(growth.monthly_growth_pct)
    } else {
        None
    };
    let health = score_baseline(&ordered, monthly_growth);

    let kpis = assemble_kpis(&ordered, &growth, &retention, &health);
    let insights = narrate_insights(&growth, &retention, seasonality.as_ref());

    debug!(
        months = ordered.len(),
        health_score = health.health_score,
        trend = growth.trend.label(),
        "métricas computadas"
    );

    MetricsBundle {
        growth,
        retention,
        health,
        seasonality,
        kpis,
        insights,
    }
}

/// Dashboard-variant health score: whole-history averages blended with the
/// check-in satisfaction proxy, on its own status ladder.
pub fn compute_dashboard_health(
    snapshots: &[MonthlySnapshot],
    satisfaction_proxy: Option<f64>,
) -> HealthMetrics {
    let ordered = sort_by_month(snapshots);
    score_extended(&ordered, satisfaction_proxy)
}

fn sort_by_month(snapshots: &[MonthlySnapshot]) -> Vec<MonthlySnapshot> {
    let mut ordered = snapshots.to_vec();
    ordered.sort_by_key(|s| s.month_number);
    ordered
}
