use std::fmt;
use std::io::Cursor;

use bytes::Bytes;
use calamine::{Data, Reader, Sheets};
use serde_json::{json, Value};

pub mod errors;

use errors::{ExcelError, Result};

/// A workbook opened from an in-memory copy of the file.
///
/// Readers are cheap to construct and meant to live for a single request.
/// Nothing is cached between constructions; callers re-download and reopen
/// the workbook every time.
pub struct SheetReader {
    sheets: Sheets<Cursor<Bytes>>,
}

impl SheetReader {
    /// Open a workbook from raw file bytes.
    ///
    /// The format is detected from the content, matching what the upstream
    /// file claims to be (xlsx, xls, xlsb or ods).
    pub fn open(bytes: Bytes) -> Result<SheetReader> {
        let buffer = Cursor::new(bytes);
        let sheets: Sheets<_> = calamine::open_workbook_auto_from_rs(buffer)?;
        Ok(SheetReader { sheets })
    }

    /// Sheet names, ordered as stored in the workbook.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    /// Read all rows from the named sheet.
    ///
    /// Rows are returned in workbook order, each cell converted to a JSON
    /// value. Blank rows and cells inside the used area come back as nulls.
    /// Cells hold the values stored in the file, so formula cells yield
    /// their computed results.
    pub fn read_rows(&mut self, name: &str) -> Result<Vec<Vec<Value>>> {
        if !self.sheets.sheet_names().iter().any(|s| s == name) {
            return Err(ExcelError::SheetNotFound(name.to_string()));
        }

        let range = self.sheets.worksheet_range(name)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_to_value).collect())
            .collect())
    }
}

// Hand-written because calamine's workbook type has no Debug impl.
impl fmt::Debug for SheetReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetReader")
            .field("sheets", &self.sheet_names())
            .finish()
    }
}

/// Convert a single cell to a JSON value.
///
/// Whole floats map to integers since xlsx stores all numbers as floats.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => json!(*i),
        Data::Float(f) => {
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                json!(*f as i64)
            } else {
                json!(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Value::String(dt.to_string()),
            None => json!(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Value::String(s.clone()),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}
