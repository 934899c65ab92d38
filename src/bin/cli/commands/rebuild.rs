use std::path::PathBuf;

use anyhow::{Context, Result};

use wortschatz_lib::words::import;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, backup: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let backup = backup.unwrap_or_else(|| app.config.backup_list.clone());
    let output = app.word_store.path();

    let count = import::rebuild_from_backup(&backup, output)
        .with_context(|| format!("Failed to rebuild {:?} from {:?}", output, backup))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "wordList": output,
                "backup": backup,
                "words": count,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Wrote {} words to {}", count, output.display());
        }
    }

    Ok(())
}
