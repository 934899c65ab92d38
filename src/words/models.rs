//! Data models for the word list and review batches

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of words in one review batch
pub const BATCH_CAPACITY: usize = 10;

/// Date format used in the word list file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Review interval bucket assigned to a word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyCode {
    /// Never reviewed
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Review again tomorrow
    #[serde(rename = "T")]
    Tomorrow,
    /// Review again in a week
    #[serde(rename = "W")]
    Week,
    /// Review again in a month
    #[serde(rename = "M")]
    Month,
    /// Review again in three months
    #[serde(rename = "3M")]
    ThreeMonths,
    /// Burned in memory, never scheduled again
    #[serde(rename = "B")]
    Burned,
}

impl FrequencyCode {
    /// Code as written in the word list file
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Tomorrow => "T",
            Self::Week => "W",
            Self::Month => "M",
            Self::ThreeMonths => "3M",
            Self::Burned => "B",
        }
    }

    /// Human-readable label used on review buttons
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unset => "Not reviewed",
            Self::Tomorrow => "Tomorrow",
            Self::Week => "1 Week",
            Self::Month => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::Burned => "Burned",
        }
    }

    pub fn is_burned(&self) -> bool {
        matches!(self, Self::Burned)
    }
}

impl fmt::Display for FrequencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an unrecognised frequency code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown frequency code: {0:?}")]
pub struct UnknownFrequencyCode(pub String);

impl FromStr for FrequencyCode {
    type Err = UnknownFrequencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::Unset),
            "T" => Ok(Self::Tomorrow),
            "W" => Ok(Self::Week),
            "M" => Ok(Self::Month),
            "3M" => Ok(Self::ThreeMonths),
            "B" => Ok(Self::Burned),
            other => Err(UnknownFrequencyCode(other.to_string())),
        }
    }
}

/// One data row of the word list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    /// Line index in the file; the header is row 0
    pub row: usize,
    pub word: String,
    pub frequency: FrequencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
}

impl WordRecord {
    /// Due when it has a date on or before `today` and is not burned
    pub fn is_due(&self, today: NaiveDate) -> bool {
        !self.frequency.is_burned() && self.next_review.map_or(false, |d| d <= today)
    }
}

/// Which pool a selected word was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionOrigin {
    /// Review date reached
    Due,
    /// Never reviewed, sampled at random
    Pending,
}

/// Snapshot of a word taken when the batch was selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEntry {
    pub word: String,
    pub row: usize,
    pub frequency: FrequencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
    pub origin: SelectionOrigin,
}

impl SelectionEntry {
    pub fn from_record(record: &WordRecord, origin: SelectionOrigin) -> Self {
        Self {
            word: record.word.clone(),
            row: record.row,
            frequency: record.frequency,
            review_date: record.next_review,
            origin,
        }
    }

    /// The review date as written to the file (empty when unset)
    pub fn review_date_string(&self) -> String {
        self.review_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// The words picked for one review session, in presentation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewBatch {
    entries: Vec<SelectionEntry>,
}

impl ReviewBatch {
    /// Build a batch, keeping at most `BATCH_CAPACITY` entries
    pub fn new(mut entries: Vec<SelectionEntry>) -> Self {
        entries.truncate(BATCH_CAPACITY);
        Self { entries }
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn words(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.word.clone()).collect()
    }

    pub fn into_entries(self) -> Vec<SelectionEntry> {
        self.entries
    }
}

/// Per-bucket tally of the word list, for reporting only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCounts {
    pub total: usize,
    pub due: usize,
    pub pending: usize,
    pub burned: usize,
    pub tomorrow: usize,
    pub week: usize,
    pub month: usize,
    pub three_months: usize,
}

impl BucketCounts {
    /// Share of burned words in the list, 0.0 for an empty list
    pub fn burned_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.burned as f64 / self.total as f64
    }

    pub fn burned_percentage(&self) -> f64 {
        self.burned_ratio() * 100.0
    }
}

/// New frequency and date for one row, applied by `WordStore::save`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowUpdate {
    pub frequency: FrequencyCode,
    pub next_review: Option<NaiveDate>,
}
