mod commands;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "pricebook",
    version,
    about = "Competitor price-list extraction and load pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a price-list PDF into canonical rows (without loading)
    Extract {
        /// Path to the price-list PDF
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted rows to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Product-number corrections JSON file
        #[arg(short, long, value_name = "FILE")]
        corrections: Option<PathBuf>,
    },
    /// Extract a price-list PDF and load its partition into the store
    Load {
        /// Path to the price-list PDF
        input_file: PathBuf,

        /// Path to the SQLite store
        #[arg(long, value_name = "FILE")]
        db: PathBuf,

        /// Product-number corrections JSON file
        #[arg(short, long, value_name = "FILE")]
        corrections: Option<PathBuf>,
    },
    /// Extract and load every PDF found in a folder
    Ingest {
        /// Folder containing price-list PDFs
        folder: PathBuf,

        /// Path to the SQLite store
        #[arg(long, value_name = "FILE")]
        db: PathBuf,

        /// Product-number corrections JSON file
        #[arg(short, long, value_name = "FILE")]
        corrections: Option<PathBuf>,

        /// Stop at the first failing document instead of skipping it
        #[arg(long)]
        halt_on_error: bool,
    },
    /// Read one (plant, date) partition back from the store
    Query {
        /// Path to the SQLite store
        #[arg(long, value_name = "FILE")]
        db: PathBuf,

        /// Plant location, e.g. "STATESVILLE"
        #[arg(long)]
        plant: String,

        /// Effective date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pricebook=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            output,
            out,
            corrections,
        } => commands::extract::run(input_file, &output, out, corrections),
        Commands::Load {
            input_file,
            db,
            corrections,
        } => commands::load::run(input_file, &db, corrections),
        Commands::Ingest {
            folder,
            db,
            corrections,
            halt_on_error,
        } => commands::ingest::run(folder, &db, corrections, halt_on_error),
        Commands::Query {
            db,
            plant,
            date,
            output,
        } => commands::query::run(&db, &plant, date, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
