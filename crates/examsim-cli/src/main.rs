//! examsim CLI: take practice NICET IB-PSC exams in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "examsim", version, about = "NICET IB-PSC exam simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam interactively
    Take {
        /// Exam mode: half or full (default from config)
        #[arg(long)]
        mode: Option<String>,

        /// Start with hints visible
        #[arg(long)]
        hints: bool,

        /// Load the question bank from a saved response file
        #[arg(long, conflicts_with = "url")]
        bank_file: Option<PathBuf>,

        /// Load the question bank from this sheet URL
        #[arg(long)]
        url: Option<String>,

        /// Output directory for reports (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format: json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Fetch the question bank and check it for data problems
    Validate {
        /// Load the question bank from a saved response file
        #[arg(long, conflicts_with = "url")]
        bank_file: Option<PathBuf>,

        /// Load the question bank from this sheet URL
        #[arg(long)]
        url: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show exam modes and domain weights
    Modes {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a saved JSON report
    Review {
        /// Report JSON written by `take`
        #[arg(long)]
        report: PathBuf,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examsim=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            mode,
            hints,
            bank_file,
            url,
            output,
            format,
            config,
        } => commands::take::execute(mode, hints, bank_file, url, config, output, format).await,
        Commands::Validate {
            bank_file,
            url,
            config,
        } => commands::validate::execute(bank_file, url, config).await,
        Commands::Modes { config } => commands::modes::execute(config),
        Commands::Review { report } => commands::review::execute(report),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
