//! SQLite value rendering.
//!
//! Result shapes are only known at query time, so cells are never mapped to
//! typed rows: each one is rendered straight to its display string.

use rusqlite::types::ValueRef;
use rusqlite::Row;

/// Renders SQLite storage-class values as display strings.
pub struct TypeMapper;

impl TypeMapper {
    /// Render a single value.
    pub fn to_display_string(value: ValueRef<'_>) -> String {
        match value {
            ValueRef::Null => "NULL".to_string(),
            ValueRef::Integer(v) => v.to_string(),
            ValueRef::Real(v) => Self::real_to_string(v),
            ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ValueRef::Blob(bytes) => format!("<blob: {} bytes>", bytes.len()),
        }
    }

    /// Whole-number reals keep a `.0` so they read as REAL, not INTEGER.
    fn real_to_string(v: f64) -> String {
        if v.is_finite() && v.fract() == 0.0 {
            format!("{:.1}", v)
        } else {
            v.to_string()
        }
    }

    /// Render every column of a row, in column order.
    pub fn extract_row(row: &Row<'_>, column_count: usize) -> rusqlite::Result<Vec<String>> {
        (0..column_count)
            .map(|idx| row.get_ref(idx).map(Self::to_display_string))
            .collect()
    }
}
