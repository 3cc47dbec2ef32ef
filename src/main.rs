use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

mod db;
mod engine;
mod growth;
mod health;
mod insights;
mod kpi;
mod models;
mod report;
mod retention;
mod seasonality;

use models::VariationSign;

#[derive(Parser)]
#[command(name = "nutri-metrics")]
#[command(about = "Business metrics analytics for nutrition practices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Compute and print the metrics summary for a tenant
    Metrics {
        #[arg(long)]
        tenant: String,
        /// Average check-in score (0-10) used as the satisfaction proxy
        /// for the dashboard health variant
        #[arg(long)]
        avg_checkin: Option<f64>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        tenant: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export the raw snapshot list as JSON
    Export {
        #[arg(long)]
        tenant: String,
        #[arg(long, default_value = "snapshots.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Metrics {
            tenant,
            avg_checkin,
        } => {
            let snapshots = db::fetch_snapshots(&pool, &tenant)
                .await
                .context("metrics unavailable")?;
            let bundle = engine::compute_metrics(&snapshots);

            println!("Métricas de {tenant} ({} meses):", snapshots.len());
            for kpi in bundle.kpis.iter() {
                let arrow = match kpi.variation_sign {
                    VariationSign::Positive => "▲",
                    VariationSign::Negative => "▼",
                    VariationSign::Neutral => "—",
                };
                println!("- {}: {} {}", kpi.title, kpi.value, arrow);
            }
            println!(
                "- Tendência de crescimento: {} (média mensal {:.2}%)",
                bundle.growth.trend.label(),
                bundle.growth.average_monthly_growth_pct
            );
            println!(
                "- Retenção: {} (renovação {:.2}%, churn {:.2}%)",
                bundle.retention.retention_health.label(),
                bundle.retention.average_retention_pct,
                bundle.retention.churn_rate_pct
            );
            for insight in bundle.insights.iter() {
                println!("- {}: {}", insight.title, insight.body);
            }

            if let Some(avg_checkin) = avg_checkin {
                let proxy = health::satisfaction_from_checkin(avg_checkin);
                let dashboard = engine::compute_dashboard_health(&snapshots, Some(proxy));
                println!(
                    "- Saúde (painel, com check-ins): {:.0}/100 — {}",
                    dashboard.health_score,
                    dashboard.health_status.label()
                );
            }
        }
        Commands::Report { tenant, out } => {
            let snapshots = db::fetch_snapshots(&pool, &tenant)
                .await
                .context("metrics unavailable")?;
            let bundle = engine::compute_metrics(&snapshots);
            let report = report::build_report(
                &tenant,
                chrono::Utc::now().date_naive(),
                &snapshots,
                &bundle,
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { tenant, out } => {
            let snapshots = db::fetch_snapshots(&pool, &tenant)
                .await
                .context("metrics unavailable")?;
            let json = serde_json::to_string_pretty(&snapshots)?;
            std::fs::write(&out, json)?;
            println!(
                "Exported {} snapshots to {}.",
                snapshots.len(),
                out.display()
            );
        }
    }

    Ok(())
}
