//! `--action clean`

use std::io::Write;

use anyhow::{Context, Result};
use hhctl_core::DbManager;

pub async fn run_clean<W: Write>(db: &DbManager, out: &mut W) -> Result<()> {
    db.create_tables().await.context("Failed to create tables")?;
    db.clear_database().await.context("Failed to clear database")?;

    let stats = db.get_statistics().await.context("Failed to read statistics")?;
    writeln!(
        out,
        "Database cleared: {} companies, {} vacancies remain.",
        stats.num_companies, stats.num_vacancies
    )?;
    Ok(())
}
