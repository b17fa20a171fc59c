//! Minimal CSV reading and writing for recording files.
//!
//! Recordings are exported by device software as plain comma-separated text
//! with a single header row. The reader accepts an optional UTF-8 byte-order
//! mark, `\r\n` or `\n` line endings, blank lines and double-quoted fields
//! (with `""` as an escaped quote). Quoted fields may not span lines.

use crate::error::{LabelError, Result};
use std::fmt::Write as FmtWrite;

const BOM: char = '\u{feff}';

/// A parsed CSV document: header plus data rows.
#[derive(Debug, Clone, Default)]
pub struct CsvDocument {
    pub header: Vec<String>,
    pub rows: Vec<CsvRow>,
}

/// A data row and the 1-based line it came from.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRow {
    /// Field at `index`, or a parse error naming the missing column
    pub fn field(&self, index: usize, column: &str) -> Result<&str> {
        self.fields
            .get(index)
            .map(|s| s.as_str())
            .ok_or_else(|| LabelError::Parse {
                line: self.line,
                message: format!("row has no value for column '{}'", column),
            })
    }
}

impl CsvDocument {
    /// Parse a whole document
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .filter(|(_, l)| !l.trim().is_empty());

        let Some((header_line, header)) = lines.next() else {
            return Err(LabelError::Schema("file is empty".to_string()));
        };
        let header = split_record(header).map_err(|message| LabelError::Parse {
            line: header_line,
            message,
        })?;

        let mut rows = Vec::new();
        for (line, text) in lines {
            let fields = split_record(text).map_err(|message| LabelError::Parse { line, message })?;
            rows.push(CsvRow { line, fields });
        }

        Ok(Self { header, rows })
    }
}

/// Split one line into fields
pub fn split_record(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                '"' if field.trim().is_empty() => {
                    field.clear();
                    in_quotes = true;
                }
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields.into_iter().map(|f| f.trim().to_string()).collect())
}

/// Append one record to `out`, quoting fields that need it
pub fn write_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let field = field.as_ref();
        if field.contains([',', '"', '\n']) {
            let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
