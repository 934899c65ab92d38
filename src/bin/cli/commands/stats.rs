use anyhow::{Context, Result};
use chrono::Local;

use wortschatz_lib::runlog::TIMESTAMP_FORMAT;
use wortschatz_lib::words::selector;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let records = app.load_words()?;
    let counts = selector::count_buckets(&records, Local::now().date_naive());
    let last_run = app.run_log.last_run().context("Failed to read run log")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "counts": counts,
                "burnedPercentage": counts.burned_percentage(),
                "lastRun": last_run.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let rows = [
                ("Words", counts.total),
                ("Due", counts.due),
                ("Not reviewed", counts.pending),
                ("Tomorrow", counts.tomorrow),
                ("1 Week", counts.week),
                ("1 Month", counts.month),
                ("3 Months", counts.three_months),
                ("Burned", counts.burned),
            ];
            for (label, value) in rows {
                println!("{:<14} {:>6}", label, value);
            }
            println!("\nBurned: {:.1}%", counts.burned_percentage());
            match last_run {
                Some(at) => println!("Last review: {}", at.format(TIMESTAMP_FORMAT)),
                None => println!("No review yet"),
            }
        }
    }

    Ok(())
}
