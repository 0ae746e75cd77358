/*!
squill command line interface

Drives the interpreter from a terminal: execute a single cell, or run a
file of cells separated by blank lines. Table results print their
`text/plain` rendering; charts print their Vega-Lite JSON.
*/

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use squill::reply::{CollectingPublisher, Publication, TEXT_PLAIN, VEGALITE_MIME};
use squill::token::tokenize;
use squill::{Interpreter, VERSION};

#[derive(Parser)]
#[command(name = "squill")]
#[command(about = "Notebook-style SQL interpreter with magic commands")]
#[command(version = VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single cell (a magic command or raw SQL)
    Exec {
        /// The cell text to execute
        cell: String,

        /// Load a database first, e.g. "sqlite3 dbname=test.db"
        #[arg(long)]
        db: Option<String>,
    },

    /// Execute cells from a file, separated by blank lines
    Run {
        /// Path to the file of cells
        file: PathBuf,

        /// Load a database first, e.g. "sqlite3 dbname=test.db"
        #[arg(long)]
        db: Option<String>,
    },

    /// Tokenize a line and print the tokens (for debugging magics)
    Tokens {
        /// The line to tokenize
        line: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squill=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Exec { cell, db } => {
            let mut interp = Interpreter::new();
            load_db(&mut interp, db.as_deref())?;
            run_cell(&mut interp, &cell)
        }

        Commands::Run { file, db } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
            let mut interp = Interpreter::new();
            load_db(&mut interp, db.as_deref())?;
            for cell in text.split("\n\n").filter(|c| !c.trim().is_empty()) {
                run_cell(&mut interp, cell)?;
            }
            Ok(())
        }

        Commands::Tokens { line } => {
            for token in tokenize(&line) {
                println!("{token}");
            }
            Ok(())
        }
    }
}

fn load_db(interp: &mut Interpreter, db: Option<&str>) -> anyhow::Result<()> {
    match db {
        Some(db) => run_cell(interp, &format!("%LOAD {db}")),
        None => Ok(()),
    }
}

fn run_cell(interp: &mut Interpreter, code: &str) -> anyhow::Result<()> {
    let mut publisher = CollectingPublisher::new();
    let reply = interp.execute(code, &mut publisher);

    for publication in &publisher.published {
        match publication {
            Publication::Result(bundle) => {
                if let Some(text) = bundle.get(TEXT_PLAIN).and_then(|v| v.as_str()) {
                    println!("{text}");
                } else if let Some(chart) = bundle.get(VEGALITE_MIME) {
                    println!("{}", serde_json::to_string_pretty(chart)?);
                }
            }
            Publication::Error { traceback, .. } => {
                for line in traceback {
                    eprintln!("{line}");
                }
            }
        }
    }

    if !reply.is_ok() {
        anyhow::bail!("cell failed");
    }
    Ok(())
}
