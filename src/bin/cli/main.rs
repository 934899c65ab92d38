mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wortschatz", about = "German vocabulary review server and tools", version)]
struct Cli {
    /// Config file (default: $WORTSCHATZ_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run the review web server
    Serve {
        /// Address to listen on (overrides the config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Show how the word list is spread over review intervals
    Stats,

    /// Show the words the next review would pick, without saving anything
    Preview,

    /// Recreate the word list from the plain backup list
    Rebuild {
        /// Backup list to read (overrides the config)
        #[arg(long)]
        backup: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { bind } => commands::serve::run(&app, bind.as_deref())?,
        Command::Stats => commands::stats::run(&app, &cli.format)?,
        Command::Preview => commands::preview::run(&app, &cli.format)?,
        Command::Rebuild { backup } => commands::rebuild::run(&app, backup, &cli.format)?,
    }

    Ok(())
}
