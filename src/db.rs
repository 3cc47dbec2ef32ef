use anyhow::Context;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::MonthlySnapshot;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let tenant_id = Uuid::parse_str("7a1c2b3d-5e6f-4a8b-9c0d-1e2f3a4b5c6d")?;

    sqlx::query(
        r#"
        INSERT INTO business_metrics.tenants (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(tenant_id)
    .bind("Clínica Demo")
    .execute(pool)
    .await?;

    // One year of plausible history. Rates are fractions here; the scaling
    // to percentages happens once, in MonthlySnapshot::from_raw.
    let months: Vec<(i32, &str, i64, i64, i64, f64, f64)> = vec![
        (1, "Janeiro", 40, 12, 3, 0.06, 0.88),
        (2, "Fevereiro", 49, 9, 4, 0.08, 0.85),
        (3, "Março", 54, 7, 5, 0.09, 0.82),
        (4, "Abril", 56, 6, 4, 0.07, 0.84),
        (5, "Maio", 58, 8, 3, 0.05, 0.90),
        (6, "Junho", 63, 5, 6, 0.10, 0.80),
        (7, "Julho", 62, 4, 5, 0.08, 0.81),
        (8, "Agosto", 61, 7, 3, 0.05, 0.87),
        (9, "Setembro", 65, 9, 4, 0.06, 0.89),
        (10, "Outubro", 70, 10, 3, 0.04, 0.91),
        (11, "Novembro", 77, 8, 5, 0.06, 0.88),
        (12, "Dezembro", 80, 6, 7, 0.09, 0.83),
    ];

    for (month_number, month_name, active, entered, left, churn, renewal) in months {
        sqlx::query(
            r#"
            INSERT INTO business_metrics.monthly_snapshots
            (id, tenant_id, month_number, month_name, year,
             active_patients_start, entered, patients_left, churn_rate, renewal_rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (tenant_id, month_number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(month_number)
        .bind(month_name)
        .bind(2025)
        .bind(active)
        .bind(entered)
        .bind(left)
        .bind(churn)
        .bind(renewal)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Fetch a tenant's full snapshot history.
///
/// Counter and rate columns are nullable because upstream feeds occasionally
/// deliver partial rows; `from_raw` coalesces them to 0 and scales the
/// fraction rates, so everything downstream sees clean percentages.
pub async fn fetch_snapshots(pool: &PgPool, tenant: &str) -> anyhow::Result<Vec<MonthlySnapshot>> {
    let rows = sqlx::query(
        r#"
        SELECT s.month_number, s.month_name, s.year,
               s.active_patients_start, s.entered, s.patients_left,
               s.churn_rate, s.renewal_rate
        FROM business_metrics.monthly_snapshots s
        JOIN business_metrics.tenants t ON t.id = s.tenant_id
        WHERE t.name = $1
        ORDER BY s.month_number
        "#,
    )
    .bind(tenant)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to fetch snapshots for tenant {tenant}"))?;

    let snapshots: Vec<MonthlySnapshot> = rows
        .into_iter()
        .map(|row| {
            MonthlySnapshot::from_raw(
                row.get("month_number"),
                row.get("month_name"),
                row.get("year"),
                row.get("active_patients_start"),
                row.get("entered"),
                row.get("patients_left"),
                row.get("churn_rate"),
                row.get("renewal_rate"),
            )
        })
        .collect();

    debug!(tenant, months = snapshots.len(), "snapshots carregados");
    Ok(snapshots)
}
