//! jobboard-migrate: applies, reverts and reports on jobboard schema migrations.

mod config;

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{LogFormat, Settings};
use jobboard_core::{defaults, JOBS_TABLE};
use jobboard_db::{log_pool_metrics, Database};

#[derive(Parser)]
#[command(name = "jobboard-migrate")]
#[command(author, version, about = "Schema migrations for the jobboard database")]
#[command(propagate_version = true)]
struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Up,

    /// Revert the most recently applied migrations
    Down {
        /// Number of migrations to revert
        #[arg(short, long, default_value_t = defaults::ROLLBACK_STEPS)]
        steps: usize,
    },

    /// Show every migration and whether it has been applied
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the CREATE TABLE statement for the jobs table
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _file_guard = init_tracing(&settings);

    match run(cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(subsystem = "cli", error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing from settings.
///
/// `RUST_LOG` overrides the default filter. With `LOG_FILE` set, logs go to a
/// daily-rotated file instead of stderr.
fn init_tracing(settings: &Settings) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = settings.log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("jobboard-migrate.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match settings.log_format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(settings.log_ansi.unwrap_or(false)), // no ANSI in files
                )
                .init(),
        }
        Some(guard)
    } else {
        match settings.log_format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
                if let Some(ansi) = settings.log_ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    }
}

async fn run(cli: Cli, settings: &Settings) -> anyhow::Result<()> {
    if let Commands::Schema = cli.command {
        print_schema();
        return Ok(());
    }

    let database_url = settings.database_url(cli.database_url.as_deref())?;
    let db = Database::connect_with_config(&database_url, settings.pool_config())
        .await
        .context("connecting to database")?;

    let result = execute(&db, cli.command).await;
    log_pool_metrics(db.pool());
    db.pool().close().await;
    result
}

async fn execute(db: &Database, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Up => {
            let applied = db.migrate().await.context("applying migrations")?;
            if applied.is_empty() {
                println!("Database is up to date");
            }
            for version in applied {
                println!("Applied {}", version);
            }
        }
        Commands::Down { steps } => {
            let reverted = db.rollback(steps).await.context("reverting migrations")?;
            if reverted.is_empty() {
                println!("Nothing to revert");
            }
            for version in reverted {
                println!("Reverted {}", version);
            }
        }
        Commands::Status { json } => {
            let status = db
                .migration_status()
                .await
                .context("reading migration status")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                for s in status {
                    let state = if s.applied { "applied" } else { "pending" };
                    println!("{:<16}{:<10}{}", s.version, state, s.description);
                }
            }
        }
        Commands::Schema => print_schema(),
    }
    Ok(())
}

fn print_schema() {
    print!("{}", JOBS_TABLE.create_table_sql());
}
