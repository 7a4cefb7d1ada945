//! Tab-delimited reader for sample tables and study records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{EnaError, Result};
use super::source::{SampleRow, SampleTable, StudyRecord};

/// Reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            quote: b'"',
        }
    }
}

/// Reads metadata files into sample tables or study records.
#[derive(Debug, Clone, Default)]
pub struct TabularReader {
    config: ReaderConfig,
}

impl TabularReader {
    /// Create a new reader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read the whole file as UTF-8 text. The handle is closed before returning.
    pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| EnaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| EnaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("Read {} bytes from {}", contents.len(), path.display());

        String::from_utf8(contents).map_err(|e| {
            EnaError::Format(format!("'{}' is not valid UTF-8: {}", path.display(), e))
        })
    }

    /// Read a header-led sample table from a file.
    pub fn read_sample_table(&self, path: impl AsRef<Path>) -> Result<SampleTable> {
        let text = Self::read_text(path)?;
        self.parse_sample_table(&text)
    }

    /// Read a headerless key-value study file.
    pub fn read_study_record(&self, path: impl AsRef<Path>) -> Result<StudyRecord> {
        let text = Self::read_text(path)?;
        self.parse_study_record(&text)
    }

    fn csv_reader<'a>(&self, text: &'a str, has_headers: bool) -> Result<csv::Reader<&'a [u8]>> {
        check_quotes_closed(text.as_bytes(), self.config.delimiter, self.config.quote)?;

        Ok(csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(text.as_bytes()))
    }

    /// Parse a sample table from text.
    ///
    /// Rows shorter than the header get null cells for the trailing
    /// columns; rows longer than the header are rejected.
    pub fn parse_sample_table(&self, text: &str) -> Result<SampleTable> {
        if text.trim().is_empty() {
            return Err(EnaError::Format("No columns to parse from file".to_string()));
        }

        let mut reader = self.csv_reader(text, true)?;

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        for (idx, name) in headers.iter().enumerate() {
            if headers[..idx].contains(name) {
                return Err(EnaError::Format(format!("Duplicate column name '{}'", name)));
            }
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;

            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(EnaError::Format(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            let mut row = SampleRow::new();
            for (idx, name) in headers.iter().enumerate() {
                row.insert(name.clone(), record.get(idx).map(|s| s.to_string()));
            }
            rows.push(row);
        }

        debug!(
            "Parsed sample table with {} columns and {} rows",
            headers.len(),
            rows.len()
        );

        Ok(SampleTable::new(headers, rows))
    }

    /// Parse a study record from text.
    ///
    /// Column 0 is the key, column 1 the value. A repeated key overwrites
    /// the earlier value.
    pub fn parse_study_record(&self, text: &str) -> Result<StudyRecord> {
        if text.trim().is_empty() {
            return Err(EnaError::Format("No columns to parse from file".to_string()));
        }

        let mut reader = self.csv_reader(text, false)?;
        let mut record = StudyRecord::new();

        for result in reader.records() {
            let row = result?;

            if row.len() > 2 {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                return Err(EnaError::Format(format!(
                    "Expected 2 fields in line {}, saw {}",
                    line,
                    row.len()
                )));
            }

            let Some(key) = row.get(0) else {
                continue;
            };
            let value = row.get(1).map(|s| s.to_string());

            if record.insert(key, value).is_some() {
                warn!("Duplicate study key '{}'; keeping the last value", key);
            }
        }

        debug!("Parsed study record with {} keys", record.len());

        Ok(record)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    AfterQuote,
}

/// Reject input where a quoted field is still open at end of input.
///
/// The csv reader accepts this and folds every following line into one
/// cell. A quote only opens a field when it is the field's first byte;
/// a doubled quote inside a quoted field is an escaped quote.
fn check_quotes_closed(bytes: &[u8], delimiter: u8, quote: u8) -> Result<()> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1;
    let mut opened_at = 0;

    for &b in bytes {
        let boundary = b == delimiter || b == b'\n' || b == b'\r';
        state = match state {
            QuoteState::Quoted if b == quote => QuoteState::AfterQuote,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::AfterQuote if b == quote => QuoteState::Quoted,
            QuoteState::FieldStart if b == quote => {
                opened_at = line;
                QuoteState::Quoted
            }
            _ if boundary => QuoteState::FieldStart,
            _ => QuoteState::Unquoted,
        };
        if b == b'\n' {
            line += 1;
        }
    }

    if state == QuoteState::Quoted {
        return Err(EnaError::Format(format!(
            "EOF inside string starting at line {}",
            opened_at
        )));
    }
    Ok(())
}
