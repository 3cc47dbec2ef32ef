use crate::models::{
    ColorBucket, GrowthMetrics, HealthMetrics, Kpi, MonthlySnapshot, RetentionMetrics,
    VariationSign,
};

/// Fixed display thresholds for the KPI cards. These are presentation
/// ladders, independent of the analyzer status buckets; keep them separate.
const RENEWAL_GREEN_PCT: f64 = 70.0;
const RENEWAL_YELLOW_PCT: f64 = 50.0;
const CHURN_GREEN_PCT: f64 = 10.0;
const CHURN_YELLOW_PCT: f64 = 20.0;
const HEALTH_GREEN: f64 = 80.0;
const HEALTH_BLUE: f64 = 70.0;
const HEALTH_YELLOW: f64 = 50.0;

/// Package the analyzer outputs into the four dashboard cards, in their
/// fixed display order.
pub fn assemble_kpis(
    snapshots: &[MonthlySnapshot],
    growth: &GrowthMetrics,
    retention: &RetentionMetrics,
    health: &HealthMetrics,
) -> Vec<Kpi> {
    let active_patients = snapshots.last().map(|s| s.total_patients).unwrap_or(0);

    vec![
        Kpi {
            title: "Pacientes Ativos".to_string(),
            value: active_patients.to_string(),
            variation: growth.monthly_growth_pct,
            variation_sign: sign_of(growth.monthly_growth_pct),
            color: if growth.monthly_growth_pct > 0.0 {
                ColorBucket::Green
            } else if growth.monthly_growth_pct < 0.0 {
                ColorBucket::Red
            } else {
                ColorBucket::Blue
            },
            description: "Total de pacientes ativos no último mês".to_string(),
        },
        Kpi {
            title: "Taxa de Renovação".to_string(),
            value: format!("{:.1}%", retention.average_retention_pct),
            variation: retention.average_retention_pct,
            variation_sign: if retention.average_retention_pct >= RENEWAL_GREEN_PCT {
                VariationSign::Positive
            } else {
                VariationSign::Negative
            },
            color: if retention.average_retention_pct >= RENEWAL_GREEN_PCT {
                ColorBucket::Green
            } else if retention.average_retention_pct >= RENEWAL_YELLOW_PCT {
                ColorBucket::Yellow
            } else {
                ColorBucket::Red
            },
            description: "Média de renovação no período".to_string(),
        },
        Kpi {
            title: "Taxa de Churn".to_string(),
            value: format!("{:.1}%", retention.churn_rate_pct),
            variation: retention.churn_rate_pct,
            variation_sign: if retention.churn_rate_pct < CHURN_GREEN_PCT {
                VariationSign::Positive
            } else {
                VariationSign::Negative
            },
            color: if retention.churn_rate_pct < CHURN_GREEN_PCT {
                ColorBucket::Green
            } else if retention.churn_rate_pct < CHURN_YELLOW_PCT {
                ColorBucket::Yellow
            } else {
                ColorBucket::Red
            },
            description: "Média de perda de pacientes no período".to_string(),
        },
        Kpi {
            title: "Saúde do Negócio".to_string(),
            value: format!("{:.0}/100", health.health_score),
            variation: health.health_score,
            variation_sign: if health.health_score >= HEALTH_BLUE {
                VariationSign::Positive
            } else {
                VariationSign::Negative
            },
            color: if health.health_score >= HEALTH_GREEN {
                ColorBucket::Green
            } else if health.health_score >= HEALTH_BLUE {
                ColorBucket::Blue
            } else if health.health_score >= HEALTH_YELLOW {
                ColorBucket::Yellow
            } else {
                ColorBucket::Red
            },
            description: "Índice composto de retenção, churn e crescimento".to_string(),
        },
    ]
}

fn sign_of(value: f64) -> VariationSign {
    if value > 0.0 {
        VariationSign::Positive
    } else if value < 0.0 {
        VariationSign::Negative
    } else {
        VariationSign::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ChurnTrend, GrowthTrend, HealthStatus, RetentionHealth, RetentionTrend,
    };

    fn growth(monthly: f64) -> GrowthMetrics {
        GrowthMetrics {
            total_growth_pct: 0.0,
            monthly_growth_pct: monthly,
            average_monthly_growth_pct: monthly,
            trend: GrowthTrend::Stable,
            projected_next_month: 0,
            growth_rate_pct: 0.0,
        }
    }

    fn retention(renewal: f64, churn: f64) -> RetentionMetrics {
        RetentionMetrics {
            average_retention_pct: renewal,
            retention_trend: RetentionTrend::Stable,
            churn_rate_pct: churn,
            churn_trend: ChurnTrend::Stable,
            retention_health: RetentionHealth::Good,
        }
    }

    fn health(score: f64) -> HealthMetrics {
        HealthMetrics {
            health_score: score,
            health_status: HealthStatus::Good,
            recommendations: Vec::new(),
            risk_factors: Vec::new(),
        }
    }

    fn kpis(renewal: f64, churn: f64, score: f64, monthly_growth: f64) -> Vec<Kpi> {
        assemble_kpis(
            &[],
            &growth(monthly_growth),
            &retention(renewal, churn),
            &health(score),
        )
    }

    #[test]
    fn always_exactly_four_cards_in_fixed_order() {
        let cards = kpis(85.0, 5.0, 90.0, 2.0);
        let titles: Vec<&str> = cards.iter().map(|k| k.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Pacientes Ativos",
                "Taxa de Renovação",
                "Taxa de Churn",
                "Saúde do Negócio"
            ]
        );
    }

    #[test]
    fn renewal_at_69_9_is_negative_but_yellow() {
        // Pins the ladder boundary: sign flips at 70, color at 50.
        let cards = kpis(69.9, 5.0, 90.0, 0.0);
        assert_eq!(cards[1].variation_sign, VariationSign::Negative);
        assert_eq!(cards[1].color, ColorBucket::Yellow);
    }

    #[test]
    fn renewal_ladder_boundaries() {
        assert_eq!(kpis(70.0, 5.0, 90.0, 0.0)[1].variation_sign, VariationSign::Positive);
        assert_eq!(kpis(70.0, 5.0, 90.0, 0.0)[1].color, ColorBucket::Green);
        assert_eq!(kpis(49.9, 5.0, 90.0, 0.0)[1].color, ColorBucket::Red);
    }

    #[test]
    fn churn_ladder_boundaries() {
        assert_eq!(kpis(85.0, 9.9, 90.0, 0.0)[2].variation_sign, VariationSign::Positive);
        assert_eq!(kpis(85.0, 9.9, 90.0, 0.0)[2].color, ColorBucket::Green);
        assert_eq!(kpis(85.0, 10.0, 90.0, 0.0)[2].variation_sign, VariationSign::Negative);
        assert_eq!(kpis(85.0, 10.0, 90.0, 0.0)[2].color, ColorBucket::Yellow);
        assert_eq!(kpis(85.0, 20.0, 90.0, 0.0)[2].color, ColorBucket::Red);
    }

    #[test]
    fn health_ladder_boundaries() {
        assert_eq!(kpis(85.0, 5.0, 80.0, 0.0)[3].color, ColorBucket::Green);
        assert_eq!(kpis(85.0, 5.0, 79.9, 0.0)[3].color, ColorBucket::Blue);
        assert_eq!(kpis(85.0, 5.0, 70.0, 0.0)[3].variation_sign, VariationSign::Positive);
        assert_eq!(kpis(85.0, 5.0, 69.9, 0.0)[3].variation_sign, VariationSign::Negative);
        assert_eq!(kpis(85.0, 5.0, 69.9, 0.0)[3].color, ColorBucket::Yellow);
        assert_eq!(kpis(85.0, 5.0, 49.9, 0.0)[3].color, ColorBucket::Red);
    }

    #[test]
    fn active_patients_sign_follows_growth_sign() {
        assert_eq!(kpis(85.0, 5.0, 90.0, 3.0)[0].variation_sign, VariationSign::Positive);
        assert_eq!(kpis(85.0, 5.0, 90.0, -3.0)[0].variation_sign, VariationSign::Negative);
        assert_eq!(kpis(85.0, 5.0, 90.0, 0.0)[0].variation_sign, VariationSign::Neutral);
        assert_eq!(kpis(85.0, 5.0, 90.0, 0.0)[0].color, ColorBucket::Blue);
    }

    #[test]
    fn active_patients_value_is_the_latest_total() {
        let snapshots = [
            MonthlySnapshot::from_raw(
                1,
                Some("Janeiro".to_string()),
                2026,
                Some(50),
                Some(10),
                Some(5),
                Some(0.15),
                Some(0.85),
            ),
            MonthlySnapshot::from_raw(
                2,
                Some("Fevereiro".to_string()),
                2026,
                Some(55),
                Some(12),
                Some(4),
                Some(0.10),
                Some(0.90),
            ),
        ];
        let cards = assemble_kpis(
            &snapshots,
            &growth(10.0),
            &retention(87.5, 12.5),
            &health(84.0),
        );
        assert_eq!(cards[0].value, "67");
    }
}
