//! Rebuild a word list from a plain backup list
//!
//! The backup is one word per line under a header line. Every word is
//! written back as a fresh, never-reviewed row.

use std::fs;
use std::path::Path;

use super::storage::Result;

/// Header written to rebuilt word lists
pub const DEFAULT_HEADER: &str = "Wort, reviewFrequency, reviewDate";

/// Write `output` from the words in `backup`, returning the word count
pub fn rebuild_from_backup(backup: &Path, output: &Path) -> Result<usize> {
    let content = fs::read_to_string(backup)?;

    let mut lines = vec![DEFAULT_HEADER.to_string()];
    lines.extend(
        content
            .lines()
            .skip(1)
            .map(str::trim_end)
            .filter(|word| !word.is_empty())
            .map(|word| format!("{},,", word)),
    );

    let count = lines.len() - 1;
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(output, text)?;

    log::info!("Rebuilt {:?} with {} words from {:?}", output, count, backup);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::{FrequencyCode, WordStore};
    use tempfile::TempDir;

    #[test]
    fn test_rebuild_from_backup() {
        let temp = TempDir::new().unwrap();
        let backup = temp.path().join("backup.csv");
        let output = temp.path().join("words.csv");
        fs::write(&backup, "Wort\nApfel  \nBrot\n\nHaus\n").unwrap();

        let count = rebuild_from_backup(&backup, &output).unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "Wort, reviewFrequency, reviewDate\nApfel,,\nBrot,,\nHaus,,\n"
        );

        let records = WordStore::new(output).load().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| r.frequency == FrequencyCode::Unset && r.next_review.is_none()));
    }
}
