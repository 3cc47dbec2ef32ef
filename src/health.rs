use crate::models::{round2, HealthMetrics, HealthStatus, MonthlySnapshot};

/// Status cut lines, highest first. The metrics summary and the dashboard
/// variant use different lines on purpose; do not unify them.
pub const BASELINE_STATUS_LADDER: [(f64, HealthStatus); 4] = [
    (90.0, HealthStatus::Excellent),
    (75.0, HealthStatus::Good),
    (60.0, HealthStatus::Fair),
    (40.0, HealthStatus::Poor),
];

pub const EXTENDED_STATUS_LADDER: [(f64, HealthStatus); 4] = [
    (80.0, HealthStatus::Excellent),
    (60.0, HealthStatus::Good),
    (40.0, HealthStatus::Fair),
    (20.0, HealthStatus::Poor),
];

/// Neutral growth score when no growth data is available.
const GROWTH_SCORE_DEFAULT: f64 = 50.0;
/// Satisfaction proxy when no check-in data is available.
const SATISFACTION_DEFAULT: f64 = 50.0;

pub const MSG_INSUFFICIENT_DATA: &str = "Dados insuficientes para análise";
const MSG_KEEP_STRATEGY: &str = "Manter estratégia atual";
const MSG_REVIEW_RETENTION: &str = "Revisar estratégia de retenção de pacientes";
const MSG_REVIEW_ACQUISITION: &str = "Revisar estratégia de aquisição de pacientes";
const MSG_CRITICAL_CHURN: &str = "Taxa de churn crítica: acima de 10%";
const MSG_SEVERE_CHURN: &str = "Perda acelerada de pacientes: churn acima de 15%";
const MSG_LOW_RENEWAL: &str = "Taxa de renovação abaixo de 60%";
const MSG_SHRINKING_BASE: &str = "Queda acentuada na base de pacientes";
const MSG_SMALL_BASE: &str = "Base de pacientes pequena";

/// Baseline score from the latest snapshot's renewal/churn plus the most
/// recent monthly growth figure (absent growth scores neutral).
pub fn score_baseline(
    snapshots: &[MonthlySnapshot],
    monthly_growth_pct: Option<f64>,
) -> HealthMetrics {
    let Some(latest) = snapshots.last() else {
        return no_data_metrics();
    };

    let retention_score = latest.renewal_rate.min(100.0);
    let churn_score = (100.0 - latest.churn_rate).max(0.0);
    let growth_score = monthly_growth_pct
        .map(|g| (g * 5.0).clamp(0.0, 100.0))
        .unwrap_or(GROWTH_SCORE_DEFAULT);

    let score = retention_score * 0.4 + churn_score * 0.4 + growth_score * 0.2;

    finish(
        score,
        &BASELINE_STATUS_LADDER,
        latest.renewal_rate,
        latest.churn_rate,
        monthly_growth_pct,
        latest.total_patients,
    )
}

/// Dashboard score from whole-history averages plus a satisfaction proxy
/// (the average check-in score, already on a 0-100 scale).
pub fn score_extended(
    snapshots: &[MonthlySnapshot],
    satisfaction_proxy: Option<f64>,
) -> HealthMetrics {
    if snapshots.is_empty() {
        return no_data_metrics();
    }

    let avg_renewal = mean(snapshots.iter().map(|s| s.renewal_rate));
    let avg_churn = mean(snapshots.iter().map(|s| s.churn_rate));
    let satisfaction = satisfaction_proxy.unwrap_or(SATISFACTION_DEFAULT);
    let total_patients = snapshots.last().map(|s| s.total_patients).unwrap_or(0);

    let score =
        ((100.0 - avg_churn) * 0.4 + avg_renewal * 0.3 + satisfaction * 0.3).clamp(0.0, 100.0);

    finish(
        score,
        &EXTENDED_STATUS_LADDER,
        avg_renewal,
        avg_churn,
        None,
        total_patients,
    )
}

/// Convert an average check-in score (0-10) to the 0-100 satisfaction proxy.
pub fn satisfaction_from_checkin(average_checkin: f64) -> f64 {
    (average_checkin * 10.0).clamp(0.0, 100.0)
}

fn finish(
    score: f64,
    ladder: &[(f64, HealthStatus)],
    renewal: f64,
    churn: f64,
    growth: Option<f64>,
    total_patients: i64,
) -> HealthMetrics {
    // A NaN score must never reach a caller.
    if score.is_nan() {
        return HealthMetrics {
            health_score: 0.0,
            health_status: HealthStatus::Unknown,
            recommendations: vec![MSG_INSUFFICIENT_DATA.to_string()],
            risk_factors: Vec::new(),
        };
    }

    let (recommendations, risk_factors) = advice(renewal, churn, growth, total_patients);
    HealthMetrics {
        health_score: round2(score),
        health_status: status_for(score, ladder),
        recommendations,
        risk_factors,
    }
}

fn status_for(score: f64, ladder: &[(f64, HealthStatus)]) -> HealthStatus {
    for (cut, status) in ladder {
        if score >= *cut {
            return *status;
        }
    }
    HealthStatus::Critical
}

/// Independent threshold checks; each can add at most one string, and a run
/// with no recommendations falls back to the keep-strategy default.
fn advice(
    renewal: f64,
    churn: f64,
    growth: Option<f64>,
    total_patients: i64,
) -> (Vec<String>, Vec<String>) {
    let mut recommendations = Vec::new();
    let mut risk_factors = Vec::new();

    if churn > 10.0 {
        risk_factors.push(MSG_CRITICAL_CHURN.to_string());
    }
    if churn > 15.0 {
        risk_factors.push(MSG_SEVERE_CHURN.to_string());
    }
    if renewal < 70.0 {
        recommendations.push(MSG_REVIEW_RETENTION.to_string());
    }
    if renewal < 60.0 {
        risk_factors.push(MSG_LOW_RENEWAL.to_string());
    }
    if let Some(growth) = growth {
        if growth < 0.0 {
            recommendations.push(MSG_REVIEW_ACQUISITION.to_string());
        }
        if growth < -5.0 {
            risk_factors.push(MSG_SHRINKING_BASE.to_string());
        }
    }
    if total_patients < 50 {
        risk_factors.push(MSG_SMALL_BASE.to_string());
    }

    if recommendations.is_empty() {
        recommendations.push(MSG_KEEP_STRATEGY.to_string());
    }

    (recommendations, risk_factors)
}

fn no_data_metrics() -> HealthMetrics {
    HealthMetrics {
        health_score: 0.0,
        health_status: HealthStatus::Unknown,
        recommendations: vec![MSG_INSUFFICIENT_DATA.to_string()],
        risk_factors: Vec::new(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        0.0
    } else {
        collected.iter().sum::<f64>() / collected.len() as f64
    }
}
