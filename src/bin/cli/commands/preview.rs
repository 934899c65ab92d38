use anyhow::Result;
use chrono::Local;

use wortschatz_lib::words::{selector, SelectionOrigin};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let records = app.load_words()?;
    let selection = selector::select(&records, Local::now().date_naive(), &mut rand::thread_rng());
    let entries = selection.batch.entries();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("Nothing to review.");
                return Ok(());
            }

            let width = entries.iter().map(|e| e.word.chars().count()).max().unwrap_or(4).max(4);
            println!("{:<width$}  {:<13} {:<10}  Origin", "Word", "Interval", "Due", width = width);
            for entry in entries {
                let origin = match entry.origin {
                    SelectionOrigin::Due => "due",
                    SelectionOrigin::Pending => "new",
                };
                println!(
                    "{:<width$}  {:<13} {:<10}  {}",
                    entry.word,
                    entry.frequency.label(),
                    entry.review_date_string(),
                    origin,
                    width = width
                );
            }
            println!("\n{} words", entries.len());
        }
    }

    Ok(())
}
