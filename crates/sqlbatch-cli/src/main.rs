//! sqlbatch CLI tool.

use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "sqlbatch")]
#[command(about = "Batch SQL job runner", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, env = "SQLBATCH_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a job definition
    Validate {
        /// Path to the job definition file
        #[arg(default_value = "job.kdl")]
        path: String,
    },
    /// Parse a job definition and execute it once
    Run {
        /// Path to the job definition file
        #[arg(default_value = "job.kdl")]
        path: String,
        /// Per-statement timeout in seconds
        #[arg(long)]
        statement_timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
        Commands::Run {
            path,
            statement_timeout,
        } => {
            commands::run(&path, statement_timeout).await?;
        }
    }
    Ok(())
}
