//! surveystat CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "surveystat", version, about = "Survey response statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for one survey
    Stats {
        /// Survey ID
        #[arg(long)]
        survey: String,

        /// Dataset file or directory (overrides the configured store)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output format: text, json, html, markdown, all (comma-separated)
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory for html/markdown/all (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a dataset for malformed responses and suspicious data
    Validate {
        /// Dataset file or directory
        #[arg(long)]
        data: PathBuf,
    },

    /// List surveys, newest first
    List {
        /// Only show surveys with this status (draft, active, closed)
        #[arg(long)]
        status: Option<String>,

        /// Dataset file or directory (overrides the configured store)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Serve statistics over HTTP
    Serve {
        /// Address to bind (default: from config)
        #[arg(long)]
        bind: Option<String>,

        /// Dataset file or directory (overrides the configured store)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example dataset
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("surveystat=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stats {
            survey,
            data,
            format,
            output,
            config,
        } => commands::stats::execute(survey, data, format, output, config).await,
        Commands::Validate { data } => commands::validate::execute(data),
        Commands::List {
            status,
            data,
            config,
        } => commands::list::execute(status, data, config).await,
        Commands::Serve { bind, data, config } => {
            commands::serve::execute(bind, data, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
