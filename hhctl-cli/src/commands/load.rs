//! `--action load`

use std::io::Write;

use anyhow::{Context, Result};
use hhctl_core::{load, DbManager, HhClient, HhConfig, LoadReport};
use tracing::info;

pub async fn run_load<W: Write>(config: &HhConfig, db: &DbManager, out: &mut W) -> Result<()> {
    let report = load_all(config, db).await?;
    print_report(&report, out)?;
    Ok(())
}

/// Ensure the schema, then load every configured employer.
pub async fn load_all(config: &HhConfig, db: &DbManager) -> Result<LoadReport> {
    let created = db
        .create_database()
        .await
        .with_context(|| format!("Failed to ensure database '{}'", db.database_name()))?;
    if created {
        info!(database = db.database_name(), "created target database");
    }
    db.create_tables().await.context("Failed to create tables")?;

    let client = HhClient::new(&config.api).context("Failed to build HTTP client")?;
    info!(
        employers = config.employer_ids.len(),
        base_url = client.base_url(),
        "starting load"
    );

    load(&client, db, &config.employer_ids)
        .await
        .context("Load aborted")
}

pub fn print_report<W: Write>(report: &LoadReport, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Loaded {} companies and {} vacancies.",
        report.companies_loaded, report.vacancies_loaded
    )?;
    if !report.skipped.is_empty() {
        writeln!(out, "Skipped employers: {}", report.skipped.join(", "))?;
    }
    Ok(())
}
