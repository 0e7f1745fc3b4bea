// src/services/parser.rs

//! Record parser service.
//!
//! Decodes the raw XLS report into structured incident records. Malformed
//! rows are dropped individually with a warning; only an unreadable
//! container aborts the whole parse.

use std::fmt;
use std::io::Cursor;

use calamine::{Data, Reader, Xls};
use chrono::NaiveDateTime;

use crate::error::{AppError, Result};
use crate::models::{FEED_TIMESTAMP_FORMAT, Incident, Snapshot};

/// Minimum number of cells a row must carry to be usable.
pub const MIN_FIELDS: usize = 11;

// Positional columns consumed from the report. Columns 4, 7 and 9 are not
// interpreted; columns past MIN_FIELDS are preserved raw in `extra`.
const COL_TIMESTAMP: usize = 0;
const COL_STATUS: usize = 1;
const COL_CATEGORY: usize = 2;
const COL_SUBCATEGORY: usize = 3;
const COL_REGION: usize = 5;
const COL_LOCALITY: usize = 6;
const COL_STREET: usize = 8;
const COL_NOTE: usize = 10;

/// A data row that could not be turned into an incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub reason: MalformedReason,
}

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    TooFewFields { cells: usize },
    BadTimestamp { value: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            MalformedReason::TooFewFields { cells } => write!(
                f,
                "row {}: expected at least {} fields, got {}",
                self.row, MIN_FIELDS, cells
            ),
            MalformedReason::BadTimestamp { value } => {
                write!(f, "row {}: unparseable timestamp '{}'", self.row, value)
            }
        }
    }
}

/// Parse the raw report bytes into a snapshot plus per-row warnings.
pub fn parse_snapshot(bytes: &[u8]) -> Result<(Snapshot, Vec<ParseWarning>)> {
    let mut workbook = Xls::new(Cursor::new(bytes)).map_err(AppError::unreadable_feed)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::unreadable_feed("report contains no worksheets"))?
        .map_err(AppError::unreadable_feed)?;

    // First row is the column header.
    Ok(build_snapshot(range.rows().skip(1)))
}

/// Assemble a snapshot from raw data rows. Fully-empty rows (sheet padding)
/// are skipped silently; anything else counts toward the row total.
fn build_snapshot<'a>(rows: impl Iterator<Item = &'a [Data]>) -> (Snapshot, Vec<ParseWarning>) {
    let mut incidents = Vec::new();
    let mut warnings = Vec::new();
    let mut index = 0;

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        match parse_row(index, row) {
            Ok(incident) => incidents.push(incident),
            Err(warning) => warnings.push(warning),
        }
        index += 1;
    }

    let snapshot = Snapshot {
        incidents,
        total_rows: index,
    };
    (snapshot, warnings)
}

/// Parse a single data row. The feed makes no ordering promise, so rows are
/// taken as they come.
fn parse_row(index: usize, row: &[Data]) -> std::result::Result<Incident, ParseWarning> {
    if row.len() < MIN_FIELDS {
        return Err(ParseWarning {
            row: index,
            reason: MalformedReason::TooFewFields { cells: row.len() },
        });
    }

    let timestamp = parse_timestamp(&row[COL_TIMESTAMP]).ok_or_else(|| ParseWarning {
        row: index,
        reason: MalformedReason::BadTimestamp {
            value: cell_text(&row[COL_TIMESTAMP]),
        },
    })?;

    Ok(Incident {
        timestamp,
        status: cell_text(&row[COL_STATUS]),
        category: cell_text(&row[COL_CATEGORY]),
        subcategory: cell_text(&row[COL_SUBCATEGORY]),
        region: cell_text(&row[COL_REGION]),
        locality: cell_text(&row[COL_LOCALITY]),
        street: optional_text(&row[COL_STREET]),
        note: optional_text(&row[COL_NOTE]),
        extra: row[MIN_FIELDS..].iter().map(cell_text).collect(),
    })
}

/// Timestamp cells arrive either as native Excel datetimes or as text in the
/// feed's `DD.MM.YYYY HH:MM:SS` format.
fn parse_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok(),
        Data::String(s) => NaiveDateTime::parse_from_str(s.trim(), FEED_TIMESTAMP_FORMAT).ok(),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Empty cells become an explicit `None`, never an ambiguous empty string.
fn optional_text(cell: &Data) -> Option<String> {
    let text = cell_text(cell);
    if text.is_empty() { None } else { Some(text) }
}
