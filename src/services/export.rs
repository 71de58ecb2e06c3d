//! CSV export of the final table

use crate::model::NamedTable;
use anyhow::{Context, Result};
use std::path::Path;

/// Default export location, relative to the working directory
pub const EXPORT_PATH: &str = "sheetwiz_export.csv";

/// Write `table` as CSV: header row first, nulls as empty fields,
/// datetimes in ISO-8601
pub fn export_csv(table: &NamedTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        let record: Vec<String> = row.iter().map(|v| v.export_text()).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
