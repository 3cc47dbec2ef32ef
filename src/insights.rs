use crate::models::{
    GrowthMetrics, Insight, InsightKind, RetentionMetrics, SeasonalityExtremes,
};

/// Tier boundaries for the narrated insights.
const COMPOUND_GROWTH_STRONG_PCT: f64 = 5.0;
const RETENTION_EFFICIENCY_STRONG_PTS: f64 = 10.0;

/// Turn computed metrics into the short narrative cards shown under the
/// dashboard: one for compound growth, one for retention efficiency, and,
/// whenever seasonality extremes exist, one naming the best and worst months.
pub fn narrate_insights(
    growth: &GrowthMetrics,
    retention: &RetentionMetrics,
    seasonality: Option<&SeasonalityExtremes>,
) -> Vec<Insight> {
    let mut insights = vec![
        growth_insight(growth),
        retention_efficiency_insight(retention),
    ];
    if let Some(extremes) = seasonality {
        insights.push(seasonality_insight(extremes));
    }
    insights
}

fn growth_insight(growth: &GrowthMetrics) -> Insight {
    let rate = growth.growth_rate_pct;
    if rate > COMPOUND_GROWTH_STRONG_PCT {
        Insight {
            kind: InsightKind::Positive,
            title: "Crescimento acelerado".to_string(),
            body: format!(
                "A base de pacientes cresce {rate:.1}% ao mês em taxa composta. \
                 Considere ampliar a capacidade de atendimento."
            ),
        }
    } else if rate < -COMPOUND_GROWTH_STRONG_PCT {
        Insight {
            kind: InsightKind::Warning,
            title: "Retração da base de pacientes".to_string(),
            body: format!(
                "A base encolhe {:.1}% ao mês em taxa composta. \
                 Priorize ações de aquisição e reativação.",
                rate.abs()
            ),
        }
    } else {
        Insight {
            kind: InsightKind::Neutral,
            title: "Crescimento estável".to_string(),
            body: format!(
                "A base de pacientes varia {rate:.1}% ao mês em taxa composta, \
                 dentro da faixa de estabilidade."
            ),
        }
    }
}

/// Retention efficiency is the renewal rate minus the churn rate, in points.
fn retention_efficiency_insight(retention: &RetentionMetrics) -> Insight {
    let efficiency = retention.average_retention_pct - retention.churn_rate_pct;
    if efficiency > RETENTION_EFFICIENCY_STRONG_PTS {
        Insight {
            kind: InsightKind::Positive,
            title: "Retenção eficiente".to_string(),
            body: format!(
                "A renovação supera o churn em {efficiency:.1} pontos. \
                 A carteira de pacientes está se consolidando."
            ),
        }
    } else if efficiency < 0.0 {
        Insight {
            kind: InsightKind::Warning,
            title: "Churn acima da renovação".to_string(),
            body: format!(
                "O churn supera a renovação em {:.1} pontos. \
                 Revise o acompanhamento dos pacientes em risco.",
                efficiency.abs()
            ),
        }
    } else {
        Insight {
            kind: InsightKind::Neutral,
            title: "Retenção em equilíbrio".to_string(),
            body: format!(
                "Renovação e churn estão próximos ({efficiency:.1} pontos de diferença). \
                 Há espaço para melhorar a fidelização."
            ),
        }
    }
}

fn seasonality_insight(extremes: &SeasonalityExtremes) -> Insight {
    Insight {
        kind: InsightKind::Neutral,
        title: "Sazonalidade de captação".to_string(),
        body: format!(
            "{} é o melhor mês para captação (média de {:.1} novos pacientes); \
             {} é o mais fraco (média de {:.1}). Planeje campanhas de acordo.",
            extremes.best_month.month_name,
            extremes.best_month.average_entries,
            extremes.worst_month.month_name,
            extremes.worst_month.average_entries,
        ),
    }
}
