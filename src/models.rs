use serde::Serialize;

/// One calendar month of aggregate patient-population counters for a tenant.
///
/// Rates are stored as fractions in the database and scaled to percentages
/// exactly once, in [`MonthlySnapshot::from_raw`]. Nothing downstream rescales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySnapshot {
    /// Sequence order across the tenant's whole history (may exceed 12).
    pub month_number: i32,
    /// Calendar label ("Janeiro", "Fevereiro", ...); used for seasonality
    /// grouping only, never for chronological ordering.
    pub month_name: String,
    pub year: i32,
    /// Active patients at the start of the month.
    pub active_patients_start: i64,
    /// New patients acquired in the month.
    pub entered: i64,
    /// Patients lost in the month.
    pub left: i64,
    /// Derived: `active_patients_start + entered`.
    pub total_patients: i64,
    /// Percentage in [0, 100].
    pub churn_rate: f64,
    /// Percentage in [0, 100]. Independent of churn; they need not sum to 100.
    pub renewal_rate: f64,
}

impl MonthlySnapshot {
    /// Normalize a raw store row into a snapshot.
    ///
    /// This is the single ingestion boundary: missing numerics coalesce to 0,
    /// fraction rates in [0, 1] are scaled x100 here and nowhere else, and
    /// `total_patients` is derived rather than trusted from the store.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        month_number: i32,
        month_name: Option<String>,
        year: i32,
        active_patients_start: Option<i64>,
        entered: Option<i64>,
        left: Option<i64>,
        churn_fraction: Option<f64>,
        renewal_fraction: Option<f64>,
    ) -> Self {
        let active_patients_start = active_patients_start.unwrap_or(0).max(0);
        let entered = entered.unwrap_or(0).max(0);
        let left = left.unwrap_or(0).max(0);
        Self {
            month_number,
            month_name: month_name.unwrap_or_default(),
            year,
            active_patients_start,
            entered,
            left,
            total_patients: active_patients_start + entered,
            churn_rate: scale_fraction(churn_fraction),
            renewal_rate: scale_fraction(renewal_fraction),
        }
    }
}

fn scale_fraction(raw: Option<f64>) -> f64 {
    let value = raw.unwrap_or(0.0);
    if value.is_nan() {
        return 0.0;
    }
    (value * 100.0).clamp(0.0, 100.0)
}

/// Round a percentage for reporting. Internal math keeps full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrend {
    Growing,
    Declining,
    Stable,
}

impl GrowthTrend {
    pub fn label(&self) -> &'static str {
        match self {
            GrowthTrend::Growing => "crescendo",
            GrowthTrend::Declining => "em queda",
            GrowthTrend::Stable => "estável",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionTrend {
    Improving,
    Declining,
    Stable,
}

impl RetentionTrend {
    pub fn label(&self) -> &'static str {
        match self {
            RetentionTrend::Improving => "melhorando",
            RetentionTrend::Declining => "piorando",
            RetentionTrend::Stable => "estável",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnTrend {
    Improving,
    Worsening,
    Stable,
}

impl ChurnTrend {
    pub fn label(&self) -> &'static str {
        match self {
            ChurnTrend::Improving => "melhorando",
            ChurnTrend::Worsening => "piorando",
            ChurnTrend::Stable => "estável",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RetentionHealth {
    pub fn label(&self) -> &'static str {
        match self {
            RetentionHealth::Excellent => "excelente",
            RetentionHealth::Good => "boa",
            RetentionHealth::Fair => "razoável",
            RetentionHealth::Poor => "ruim",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
    Unknown,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excelente",
            HealthStatus::Good => "bom",
            HealthStatus::Fair => "razoável",
            HealthStatus::Poor => "ruim",
            HealthStatus::Critical => "crítico",
            HealthStatus::Unknown => "desconhecido",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationSign {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBucket {
    Green,
    Blue,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Positive,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthMetrics {
    pub total_growth_pct: f64,
    pub monthly_growth_pct: f64,
    pub average_monthly_growth_pct: f64,
    pub trend: GrowthTrend,
    pub projected_next_month: i64,
    /// Compound monthly growth rate over `total_patients`.
    pub growth_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionMetrics {
    pub average_retention_pct: f64,
    pub retention_trend: RetentionTrend,
    pub churn_rate_pct: f64,
    pub churn_trend: ChurnTrend,
    pub retention_health: RetentionHealth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub health_score: f64,
    pub health_status: HealthStatus,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub title: String,
    pub value: String,
    pub variation: f64,
    pub variation_sign: VariationSign,
    pub color: ColorBucket,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthAverage {
    pub month_name: String,
    /// Mean of `entered` across every year this month appears in.
    pub average_entries: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityExtremes {
    pub best_month: MonthAverage,
    pub worst_month: MonthAverage,
}

/// Everything the engine produces for one computation cycle. Ephemeral:
/// recomputed on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsBundle {
    pub growth: GrowthMetrics,
    pub retention: RetentionMetrics,
    pub health: HealthMetrics,
    pub seasonality: Option<SeasonalityExtremes>,
    pub kpis: Vec<Kpi>,
    pub insights: Vec<Insight>,
}
