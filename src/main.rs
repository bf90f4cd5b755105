use anyhow::Result;
use clap::{Parser, Subcommand};
use flipfolio::{chart_data_for, extract_charts, summarize_path, summary_for};
use flipfolio::{FlipfolioError, LocalStore, Workbook};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flipfolio", about = "Portfolio workbook chart extraction and summarization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the four-series chart bundle as JSON
    Charts {
        /// Workbook file to read
        file: Option<PathBuf>,
        /// Resolve the workbook for this user identity instead of a file
        #[arg(long, conflicts_with = "file")]
        user: Option<String>,
        /// Upload directory used with --user
        #[arg(long, default_value = "filestorage")]
        store: PathBuf,
    },
    /// Render the flattened text summary of every sheet
    Summarize {
        /// Workbook file to read
        file: Option<PathBuf>,
        /// Resolve the workbook for this user identity instead of a file
        #[arg(long, conflicts_with = "file")]
        user: Option<String>,
        /// Upload directory used with --user
        #[arg(long, default_value = "filestorage")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Charts { file, user, store } => {
            let bundle = match (file, user) {
                (Some(file), _) => Workbook::open(&file).and_then(|wb| extract_charts(&wb)),
                (None, Some(user)) => chart_data_for(&LocalStore::new(store), &user),
                (None, None) => anyhow::bail!("either FILE or --user is required"),
            };
            match bundle {
                Ok(bundle) => println!("{}", serde_json::to_string_pretty(&bundle)?),
                Err(FlipfolioError::WorkbookNotFound { user }) => {
                    eprintln!("No uploaded file found for '{}'.", user);
                    std::process::exit(1);
                }
                Err(error) => {
                    // detail goes to the log, callers get the generic message
                    tracing::error!(%error, "error processing chart data");
                    eprintln!("{}", FlipfolioError::EXTRACTION_FAILED);
                    std::process::exit(1);
                }
            }
        }
        Command::Summarize { file, user, store } => {
            let text = match (file, user) {
                (Some(file), _) => summarize_path(file),
                (None, Some(user)) => summary_for(&LocalStore::new(store), &user),
                (None, None) => anyhow::bail!("either FILE or --user is required"),
            };
            println!("{}", text);
        }
    }
    Ok(())
}
