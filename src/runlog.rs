//! Append-only log of review session starts
//!
//! One `YYYY-MM-DD HH:MM:SS` timestamp per line; the last line is the most
//! recent run.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum RunLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed run log line {0:?}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Record a review start
    pub fn append(&self, at: NaiveDateTime) -> Result<(), RunLogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", at.format(TIMESTAMP_FORMAT))?;
        Ok(())
    }

    /// The most recent run, if any was recorded
    pub fn last_run(&self) -> Result<Option<NaiveDateTime>, RunLogError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let Some(line) = content.lines().map(str::trim).filter(|l| !l.is_empty()).last() else {
            return Ok(None);
        };

        NaiveDateTime::parse_from_str(line, TIMESTAMP_FORMAT)
            .map(Some)
            .map_err(|_| RunLogError::Parse(line.to_string()))
    }
}
