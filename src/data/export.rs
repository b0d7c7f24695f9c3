use super::model::Table;
use crate::error::{EdaError, EdaResult};

pub const DOWNLOAD_FILE_NAME: &str = "cleaned_data.csv";
pub const DOWNLOAD_CONTENT_TYPE: &str = "text/csv";

/// A serialized table ready to hand to the save dialog.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Write the table as comma-separated text: header row first, then rows in
/// table order. Missing cells become empty fields, so a re-parse restores
/// them as missing at the same position.
pub fn serialize(table: &Table) -> EdaResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(table.column_names())
        .map_err(|e| EdaError::Compute(format!("writing CSV header: {e}")))?;

    let mut row = Vec::with_capacity(table.column_count());
    for r in 0..table.row_count() {
        row.clear();
        row.extend(table.columns().iter().map(|c| c.values[r].to_string()));
        writer
            .write_record(&row)
            .map_err(|e| EdaError::Compute(format!("writing CSV row {r}: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| EdaError::Compute(format!("flushing CSV: {e}")))
}

pub fn download(table: &Table) -> EdaResult<Download> {
    Ok(Download {
        file_name: DOWNLOAD_FILE_NAME,
        content_type: DOWNLOAD_CONTENT_TYPE,
        bytes: serialize(table)?,
    })
}
