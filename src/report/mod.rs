//! Load accounting and end-of-run reporting.
//!
//! Loading never aborts the run for a bad row or a missing file; instead
//! everything noteworthy is collected here and rendered once at the end,
//! so partial results are still produced and the operator still learns
//! what was dropped.

pub mod format;

pub use format::*;

use std::path::Path;

use serde::Serialize;

/// One field that was present but failed to parse. The field became a
/// missing value; the row itself survived.
#[derive(Debug, Clone, Serialize)]
pub struct FieldWarning {
    pub line: usize,
    pub field: &'static str,
    pub raw: String,
}

/// Per-stream accounting for a single load.
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    pub name: &'static str,
    pub path: String,
    /// The file was missing or unreadable; the stream produced no records
    /// but other streams loaded regardless.
    pub absent: bool,
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub rows_skipped: usize,
    pub skipped_lines: Vec<usize>,
    pub warnings: Vec<FieldWarning>,
}

impl StreamReport {
    pub fn new(name: &'static str, path: &Path) -> Self {
        Self {
            name,
            path: path.display().to_string(),
            absent: false,
            rows_read: 0,
            rows_loaded: 0,
            rows_skipped: 0,
            skipped_lines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a whole-row rejection (wrong field count, unusable timestamp).
    pub fn skip(&mut self, line: usize) {
        self.rows_skipped += 1;
        self.skipped_lines.push(line);
    }

    /// Record a field-level parse failure.
    pub fn warn(&mut self, line: usize, field: &'static str, raw: &str) {
        self.warnings.push(FieldWarning {
            line,
            field,
            raw: raw.to_string(),
        });
    }
}

/// Accounting for every stream touched by a run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub streams: Vec<StreamReport>,
}
