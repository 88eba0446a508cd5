//! Bulk AP renaming from a CSV export
//!
//! The CSV needs `AP Name` and `Serial Number` columns; other columns are
//! ignored. Progress is one `.` per AP, and each failure gets its own line
//! so a long run can be grepped afterwards.

use crate::error::Result;
use crate::output::print_info;
use aruba_central_common::ProfileConfig;
use aruba_central_sdk::{ArubaCentralClient, RenameOutcome};
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

/// One row of the AP list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApRow {
    #[serde(rename = "AP Name")]
    pub name: String,
    #[serde(rename = "Serial Number")]
    pub serial: String,
}

/// Totals of a rename run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Parse AP rows from CSV
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ApRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in reader.deserialize::<ApRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Rename every row whose name contains `filter` (all rows without one)
pub async fn rename_rows<W: Write>(
    client: &ArubaCentralClient,
    rows: &[ApRow],
    filter: Option<&str>,
    out: &mut W,
) -> Result<RenameSummary> {
    let mut summary = RenameSummary::default();

    for row in rows {
        if filter.is_some_and(|f| !row.name.contains(f)) {
            summary.skipped += 1;
            continue;
        }

        let result = if row.serial.is_empty() {
            Err("missing serial number".to_string())
        } else {
            client
                .rename_ap(&row.name, &row.serial)
                .await
                .map_err(|e| e.to_string())
        };

        match result {
            Ok(outcome) => {
                match outcome {
                    RenameOutcome::Renamed => summary.renamed += 1,
                    RenameOutcome::Unchanged => summary.unchanged += 1,
                }
                write!(out, ".")?;
            }
            Err(message) => {
                summary.failed += 1;
                writeln!(
                    out,
                    "\nFailed: {} --> {}\t{}",
                    row.serial,
                    row.name,
                    single_line(&message)
                )?;
            }
        }
        out.flush()?;
    }

    if summary.renamed + summary.unchanged + summary.failed > 0 {
        writeln!(out)?;
    }
    Ok(summary)
}

fn single_line(message: &str) -> String {
    message.replace(['\r', '\n'], " ")
}

/// Handle the `rename-aps` command
pub async fn handle_rename_aps(
    config: ProfileConfig,
    csv_path: &Path,
    filter: Option<&str>,
) -> Result<ExitCode> {
    let file = std::fs::File::open(csv_path)?;
    let rows = read_rows(file)?;
    debug!("Read {} APs from {}", rows.len(), csv_path.display());

    let client = ArubaCentralClient::from_config(config)?;
    let mut stdout = std::io::stdout();
    let summary = rename_rows(&client, &rows, filter, &mut stdout).await?;

    print_info(&format!(
        "{} renamed, {} already named, {} skipped, {} failed",
        summary.renamed, summary.unchanged, summary.skipped, summary.failed
    ));

    if summary.failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
