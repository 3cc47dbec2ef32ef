use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{MetricsBundle, MonthlySnapshot, VariationSign};

/// Render the computed metrics as a markdown report for a tenant.
pub fn build_report(
    tenant: &str,
    generated_on: NaiveDate,
    snapshots: &[MonthlySnapshot],
    bundle: &MetricsBundle,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Relatório de Métricas do Negócio");
    let _ = writeln!(output, "Tenant: {} (gerado em {})", tenant, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Indicadores");

    if snapshots.is_empty() {
        let _ = writeln!(output, "Nenhum snapshot mensal registrado para este tenant.");
    }

    for kpi in bundle.kpis.iter() {
        let arrow = match kpi.variation_sign {
            VariationSign::Positive => "▲",
            VariationSign::Negative => "▼",
            VariationSign::Neutral => "—",
        };
        let _ = writeln!(
            output,
            "- {}: {} {} ({:.1}) — {}",
            kpi.title, kpi.value, arrow, kpi.variation, kpi.description
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Crescimento");
    let _ = writeln!(
        output,
        "- Crescimento total: {:.2}% (tendência {})",
        bundle.growth.total_growth_pct,
        bundle.growth.trend.label()
    );
    let _ = writeln!(
        output,
        "- Crescimento médio mensal: {:.2}% (último mês {:.2}%)",
        bundle.growth.average_monthly_growth_pct, bundle.growth.monthly_growth_pct
    );
    let _ = writeln!(
        output,
        "- Projeção para o próximo mês: {} pacientes ativos",
        bundle.growth.projected_next_month
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Retenção");
    let _ = writeln!(
        output,
        "- Renovação média: {:.2}% (tendência {})",
        bundle.retention.average_retention_pct,
        bundle.retention.retention_trend.label()
    );
    let _ = writeln!(
        output,
        "- Churn médio: {:.2}% (tendência {})",
        bundle.retention.churn_rate_pct,
        bundle.retention.churn_trend.label()
    );
    let _ = writeln!(
        output,
        "- Saúde da retenção: {}",
        bundle.retention.retention_health.label()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Saúde do Negócio");
    let _ = writeln!(
        output,
        "Pontuação {:.0}/100 — status {}.",
        bundle.health.health_score,
        bundle.health.health_status.label()
    );

    if !bundle.health.recommendations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Recomendações:");
        for recommendation in bundle.health.recommendations.iter() {
            let _ = writeln!(output, "- {}", recommendation);
        }
    }

    if !bundle.health.risk_factors.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Fatores de risco:");
        for risk in bundle.health.risk_factors.iter() {
            let _ = writeln!(output, "- {}", risk);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sazonalidade");
    match bundle.seasonality.as_ref() {
        Some(extremes) => {
            let _ = writeln!(
                output,
                "- Melhor mês: {} (média de {:.1} novos pacientes)",
                extremes.best_month.month_name, extremes.best_month.average_entries
            );
            let _ = writeln!(
                output,
                "- Pior mês: {} (média de {:.1} novos pacientes)",
                extremes.worst_month.month_name, extremes.worst_month.average_entries
            );
        }
        None => {
            let _ = writeln!(output, "Sem dados suficientes para análise sazonal.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for insight in bundle.insights.iter() {
        let _ = writeln!(output, "- **{}** — {}", insight.title, insight.body);
    }

    let mut recent: Vec<&MonthlySnapshot> = snapshots.iter().collect();
    recent.sort_by(|a, b| b.month_number.cmp(&a.month_number));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Histórico Recente");

    if recent.is_empty() {
        let _ = writeln!(output, "Nenhum snapshot registrado.");
    } else {
        for snapshot in recent.iter().take(6) {
            let _ = writeln!(
                output,
                "- {}/{} — {} ativos, {} entradas, {} saídas, renovação {:.1}%, churn {:.1}%",
                snapshot.month_name,
                snapshot.year,
                snapshot.active_patients_start,
                snapshot.entered,
                snapshot.left,
                snapshot.renewal_rate,
                snapshot.churn_rate
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_metrics;

    fn snapshots() -> Vec<MonthlySnapshot> {
        vec![
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
        ]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn report_includes_every_section() {
        let snapshots = snapshots();
        let bundle = compute_metrics(&snapshots);
        let report = build_report("Clínica Demo", date(), &snapshots, &bundle);

        for heading in [
            "# Relatório de Métricas do Negócio",
            "## Indicadores",
            "## Crescimento",
            "## Retenção",
            "## Saúde do Negócio",
            "## Sazonalidade",
            "## Insights",
            "## Histórico Recente",
        ] {
            assert!(report.contains(heading), "missing section: {heading}");
        }
        assert!(report.contains("Clínica Demo"));
        assert!(report.contains("Pacientes Ativos"));
    }

    #[test]
    fn empty_snapshot_set_still_renders_a_complete_report() {
        let bundle = compute_metrics(&[]);
        let report = build_report("Clínica Demo", date(), &[], &bundle);
        assert!(report.contains("Nenhum snapshot mensal registrado"));
        assert!(report.contains("Sem dados suficientes para análise sazonal."));
        assert!(report.contains("Dados insuficientes para análise"));
        assert!(report.contains("Nenhum snapshot registrado."));
    }

    #[test]
    fn recent_history_is_listed_newest_first() {
        let snapshots = snapshots();
        let bundle = compute_metrics(&snapshots);
        let report = build_report("Clínica Demo", date(), &snapshots, &bundle);
        let fevereiro = report.find("Fevereiro/2026").unwrap();
        let janeiro = report.find("Janeiro/2026").unwrap();
        assert!(fevereiro < janeiro);
    }
}
