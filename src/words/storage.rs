//! Storage for the vocabulary list
//!
//! The word list is a comma-separated text file:
//! ```text
//! Wort, reviewFrequency, reviewDate
//! Apfel,,
//! Brot,T,2023-01-01
//! Haus,B,2023-02-14
//! ```
//! Row 0 is the header. Rows are addressed by line index, so the first word
//! is row 1. Saving rewrites only the rows that changed and keeps every other
//! line byte-for-byte.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use super::models::{FrequencyCode, RowUpdate, WordRecord, DATE_FORMAT};

#[derive(Error, Debug)]
pub enum WordStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed word list row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("Word list row not found: {0}")]
    RowNotFound(usize),
}

pub type Result<T> = std::result::Result<T, WordStoreError>;

/// Number of fields every data row must have
const REQUIRED_FIELDS: usize = 3;

/// Storage manager for a single word list file
#[derive(Debug, Clone)]
pub struct WordStore {
    path: PathBuf,
}

impl WordStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// The raw header line, without its line ending
    pub fn header(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path)?;
        Ok(split_lines(&content)
            .first()
            .map(|line| split_ending(line).0.to_string())
            .unwrap_or_default())
    }

    /// Load every data row in file order
    pub fn load(&self) -> Result<Vec<WordRecord>> {
        let content = fs::read_to_string(&self.path)?;
        let lines = split_lines(&content);

        let mut records = Vec::with_capacity(lines.len().saturating_sub(1));
        for (row, line) in lines.iter().enumerate().skip(1) {
            let (body, _) = split_ending(line);
            records.push(parse_row(row, body)?);
        }

        log::debug!("Loaded {} words from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Rewrite the file with new frequency and date for the given rows
    pub fn save(&self, updates: &BTreeMap<usize, RowUpdate>) -> Result<()> {
        let content = fs::read_to_string(&self.path)?;
        let lines = split_lines(&content);

        if let Some(&row) = updates
            .keys()
            .find(|&&row| row == 0 || row >= lines.len())
        {
            return Err(WordStoreError::RowNotFound(row));
        }

        let mut output = String::with_capacity(content.len());
        for (row, line) in lines.iter().enumerate() {
            match updates.get(&row) {
                Some(update) => {
                    let (body, ending) = split_ending(line);
                    output.push_str(&rewrite_row(row, body, update)?);
                    output.push_str(ending);
                }
                None => output.push_str(line),
            }
        }

        // Write next to the original and swap it in
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, output)?;
        fs::rename(&tmp_path, &self.path)?;

        log::info!("Saved {} updated rows to {:?}", updates.len(), self.path);
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Split content into lines, each keeping its line ending
fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Separate a line from its `\n` or `\r\n` ending
fn split_ending(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\r', '\n']);
    (body, &line[body.len()..])
}

fn read_fields(body: &str) -> Result<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut record = csv::StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

fn parse_row(row: usize, body: &str) -> Result<WordRecord> {
    let fields = read_fields(body)?;
    if fields.len() < REQUIRED_FIELDS {
        return Err(WordStoreError::Parse {
            row,
            message: format!(
                "expected {} fields, found {}",
                REQUIRED_FIELDS,
                fields.len()
            ),
        });
    }

    let word = fields[0].trim().to_string();
    let frequency: FrequencyCode = fields[1].parse().map_err(|e| WordStoreError::Parse {
        row,
        message: format!("{}", e),
    })?;

    let date = fields[2].trim();
    let next_review = if date.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| WordStoreError::Parse {
                row,
                message: format!("invalid review date {:?}: {}", date, e),
            })?,
        )
    };

    Ok(WordRecord {
        row,
        word,
        frequency,
        next_review,
    })
}

/// Replace the frequency and date fields of a row, keeping the rest
fn rewrite_row(row: usize, body: &str, update: &RowUpdate) -> Result<String> {
    let fields = read_fields(body)?;
    if fields.len() < REQUIRED_FIELDS {
        return Err(WordStoreError::Parse {
            row,
            message: format!(
                "expected {} fields, found {}",
                REQUIRED_FIELDS,
                fields.len()
            ),
        });
    }

    let date = update
        .next_review
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();

    let mut out: Vec<&str> = Vec::with_capacity(fields.len());
    out.push(&fields[0]);
    out.push(update.frequency.code());
    out.push(&date);
    out.extend(fields.iter().skip(REQUIRED_FIELDS));

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(&out)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| WordStoreError::Io(e.into_error()))?;

    Ok(String::from_utf8_lossy(&bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "Wort, reviewFrequency, reviewDate\nApfel,,\nBrot,T,2023-01-01\nHaus,B,\n";

    fn create_test_store(content: &str) -> (WordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.csv");
        fs::write(&path, content).unwrap();
        (WordStore::new(path), temp_dir)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_load_skips_header() {
        let (store, _temp) = create_test_store(SAMPLE);
        let records = store.load().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[0].word, "Apfel");
        assert_eq!(records[0].frequency, FrequencyCode::Unset);
        assert_eq!(records[0].next_review, None);
        assert_eq!(records[1].frequency, FrequencyCode::Tomorrow);
        assert_eq!(records[1].next_review, Some(date("2023-01-01")));
        assert_eq!(records[2].frequency, FrequencyCode::Burned);
        assert_eq!(store.header().unwrap(), "Wort, reviewFrequency, reviewDate");
    }

    #[test]
    fn test_load_crlf() {
        let (store, _temp) = create_test_store("Wort,f,d\r\nApfel,W,2023-03-01\r\n");
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frequency, FrequencyCode::Week);
    }

    #[test]
    fn test_load_empty_file() {
        let (store, _temp) = create_test_store("");
        assert!(store.load().unwrap().is_empty());

        let (store, _temp) = create_test_store("Wort, reviewFrequency, reviewDate\n");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let (store, _temp) = create_test_store("header\nApfel,,\nBrot\n");
        match store.load() {
            Err(WordStoreError::Parse { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_code_and_date_are_parse_errors() {
        let (store, _temp) = create_test_store("header\nApfel,X,\n");
        assert!(matches!(store.load(), Err(WordStoreError::Parse { row: 1, .. })));

        let (store, _temp) = create_test_store("header\nApfel,T,01.02.2023\n");
        assert!(matches!(store.load(), Err(WordStoreError::Parse { row: 1, .. })));
    }

    #[test]
    fn test_save_round_trip() {
        let (store, _temp) = create_test_store(SAMPLE);
        let before = fs::read_to_string(store.path()).unwrap();

        let mut updates = BTreeMap::new();
        updates.insert(
            2,
            RowUpdate {
                frequency: FrequencyCode::Week,
                next_review: Some(date("2023-06-08")),
            },
        );
        store.save(&updates).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records[1].word, "Brot");
        assert_eq!(records[1].frequency, FrequencyCode::Week);
        assert_eq!(records[1].next_review, Some(date("2023-06-08")));

        // Untouched lines are byte-identical
        let after = fs::read_to_string(store.path()).unwrap();
        let before_lines: Vec<&str> = before.split_inclusive('\n').collect();
        let after_lines: Vec<&str> = after.split_inclusive('\n').collect();
        assert_eq!(before_lines.len(), after_lines.len());
        for row in [0, 1, 3] {
            assert_eq!(before_lines[row], after_lines[row]);
        }
        assert_eq!(after_lines[2], "Brot,W,2023-06-08\n");
    }

    #[test]
    fn test_save_keeps_odd_formatting_and_trailing_content() {
        let content = "Wort ,  x\r\nApfel, ,,extra\r\nBrot,T,2023-01-01\r\n\"Kaffee, schwarz\",,\nno newline at end,,";
        let (store, _temp) = create_test_store(content);

        let mut updates = BTreeMap::new();
        updates.insert(
            3,
            RowUpdate {
                frequency: FrequencyCode::Burned,
                next_review: Some(date("2023-06-01")),
            },
        );
        updates.insert(
            1,
            RowUpdate {
                frequency: FrequencyCode::Tomorrow,
                next_review: Some(date("2023-06-02")),
            },
        );
        store.save(&updates).unwrap();

        let after = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            after,
            "Wort ,  x\r\nApfel,T,2023-06-02,extra\r\nBrot,T,2023-01-01\r\n\"Kaffee, schwarz\",B,2023-06-01\nno newline at end,,"
        );

        let records = store.load().unwrap();
        assert_eq!(records[2].word, "Kaffee, schwarz");
    }

    #[test]
    fn test_save_rejects_unknown_rows() {
        let (store, _temp) = create_test_store(SAMPLE);
        let update = RowUpdate {
            frequency: FrequencyCode::Tomorrow,
            next_review: None,
        };

        let mut updates = BTreeMap::new();
        updates.insert(0, update);
        assert!(matches!(store.save(&updates), Err(WordStoreError::RowNotFound(0))));

        let mut updates = BTreeMap::new();
        updates.insert(42, update);
        assert!(matches!(store.save(&updates), Err(WordStoreError::RowNotFound(42))));

        // Nothing was written
        assert_eq!(fs::read_to_string(store.path()).unwrap(), SAMPLE);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = WordStore::new(temp_dir.path().join("missing.csv"));
        assert!(!store.exists());
        assert!(matches!(store.load(), Err(WordStoreError::Io(_))));
    }
}
