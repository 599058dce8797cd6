//! CSV lead-file reader.
//!
//! Yields an ordered header row plus rows of trimmed string cells, padded to
//! the header width. Fully blank rows are dropped. The first non-blank row
//! is the header row; lead exports do not carry label banners above it.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::IngestError;

/// One parsed lead file: ordered raw headers and rows of string cells.
#[derive(Debug, Clone)]
pub struct LeadTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl LeadTable {
    /// Index of a raw header, matched exactly as it appeared in the file.
    pub fn header_index(&self, raw_header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == raw_header)
    }

    /// Cell value at `(row, column)`, empty string when the record was short.
    pub fn value(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn clean_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut cleaned = String::new();
    if let Some(first) = parts.next() {
        cleaned.push_str(first);
        for part in parts {
            cleaned.push(' ');
            cleaned.push_str(part);
        }
    }
    cleaned
}

fn clean_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a lead file into a [`LeadTable`].
///
/// Records shorter than the header row are padded with empty cells; longer
/// records are truncated to the header width.
pub fn read_lead_table(path: &Path) -> Result<LeadTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(clean_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }

    if raw_rows.is_empty() {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    }

    let headers: Vec<String> = raw_rows[0].iter().map(|value| clean_header(value)).collect();
    let mut rows = Vec::with_capacity(raw_rows.len() - 1);
    for record in raw_rows.iter().skip(1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            row.push(record.get(idx).cloned().unwrap_or_default());
        }
        rows.push(row);
    }

    debug!(
        path = %path.display(),
        headers = headers.len(),
        rows = rows.len(),
        "read lead table"
    );

    Ok(LeadTable { headers, rows })
}

/// Up to `limit` non-blank observed values for one raw header.
///
/// Used to show the caller what an unknown column actually contains before
/// they decide where it maps.
pub fn column_samples(table: &LeadTable, raw_header: &str, limit: usize) -> Vec<String> {
    let Some(idx) = table.header_index(raw_header) else {
        return Vec::new();
    };
    let mut samples = Vec::new();
    for row in &table.rows {
        if samples.len() >= limit {
            break;
        }
        let value = row.get(idx).map(String::as_str).unwrap_or("");
        if !value.is_empty() {
            samples.push(value.to_string());
        }
    }
    samples
}
