//! CSV export command implementations

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::config::TallyConfig;
use tally_core::db::Database;
use tally_core::debt::Projector;
use tally_core::export::{write_expenses_csv, write_projection_csv};
use tally_core::gating::{Feature, FeatureGate};

use super::expense_filter;

pub fn cmd_export_expenses(
    db: &Database,
    config: &TallyConfig,
    output: Option<&Path>,
    month: Option<&str>,
    category: Option<&str>,
) -> Result<usize> {
    FeatureGate::for_tier(config.tier).require(Feature::CsvExport)?;

    let filter = expense_filter(month, category)?;
    let expenses = db.list_expenses(&filter)?;

    let count = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let count = write_expenses_csv(file, &expenses)?;
            eprintln!("✅ Exported {} expenses to {}", count, path.display());
            count
        }
        None => write_expenses_csv(io::stdout().lock(), &expenses)?,
    };

    Ok(count)
}

pub fn cmd_export_projection(
    db: &Database,
    config: &TallyConfig,
    id: i64,
    extra: f64,
    output: Option<&Path>,
    today: NaiveDate,
) -> Result<usize> {
    FeatureGate::for_tier(config.tier).require(Feature::CsvExport)?;

    let debt = db
        .get_debt(id)?
        .with_context(|| format!("Debt {} not found", id))?;
    let projection = Projector::new(config.projection.max_months).project(&debt, extra, today)?;

    let count = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let count = write_projection_csv(file, &projection)?;
            eprintln!(
                "✅ Exported {}-month schedule for '{}' to {}",
                count,
                debt.name,
                path.display()
            );
            count
        }
        None => write_projection_csv(io::stdout().lock(), &projection)?,
    };

    Ok(count)
}
