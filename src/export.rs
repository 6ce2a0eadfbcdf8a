use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::{format_timestamp, Transaction};

const HEADER: [&str; 5] = ["date", "category", "amount", "description", "recurring"];

/// Write transactions as CSV to `path`. Returns the number of rows written.
pub(crate) fn export_to_csv(path: &Path, transactions: &[&Transaction]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let count = write_csv(file, transactions)?;
    tracing::info!(path = %path.display(), rows = count, "exported transactions");
    Ok(count)
}

pub(crate) fn write_csv<W: Write>(out: W, transactions: &[&Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;
    for txn in transactions {
        wtr.write_record([
            format_timestamp(&txn.timestamp),
            txn.category.clone(),
            txn.amount.to_string(),
            txn.description.clone(),
            txn.recurring.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(transactions.len())
}
