mod collector;
mod db;
mod filter;
mod model;
mod output;
mod parser;
mod pipeline;
mod settings;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::output::Format;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "jobpulse", about = "Job offer scraper with filtering and a local SQLite store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch listings, extract offers, filter and store new ones
    Run {
        /// Config file (JSON/TOML); defaults to ./config.json when present
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Max offers per source (overrides config)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// SQLite database path (overrides config)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Query stored offers
    Show {
        /// SQLite database path
        #[arg(long, default_value = "jobpulse.db")]
        db: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// City substring
        #[arg(long)]
        city: Option<String>,
        /// Company substring
        #[arg(long)]
        company: Option<String>,
        /// Skill substring
        #[arg(long)]
        skill: Option<String>,
        /// Title substring
        #[arg(long)]
        title: Option<String>,
        /// Exact source id (e.g. justjoinit)
        #[arg(long)]
        source: Option<String>,
        /// Minimum salary in PLN, checked against either bound
        #[arg(long)]
        min_salary: Option<u32>,
        /// Show skills and URL (text format only)
        #[arg(short, long)]
        verbose: bool,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List sources that have a collector
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            limit,
            db: db_path,
        } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(n) = limit {
                settings.limit = n;
            }
            if let Some(path) = db_path {
                settings.db_path = path;
            }
            settings.validate()?;
            info!(settings = ?settings, "Starting fetch cycle");

            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;

            let collectors = collector::registry::collectors(&settings.sources);
            if collectors.is_empty() {
                println!("No usable sources configured.");
                return Ok(());
            }

            let report = pipeline::run_cycle(&conn, &settings, &collectors).await?;
            println!("Fetched offers:  {}", report.fetched);
            println!("After filters:   {}", report.kept.len());
            println!("Saved new:       {}", report.inserted);
            for (i, offer) in report.kept.iter().enumerate() {
                println!("{}", output::preview_line(i + 1, offer));
            }
            Ok(())
        }
        Commands::Show {
            db: db_path,
            limit,
            city,
            company,
            skill,
            title,
            source,
            min_salary,
            verbose,
            format,
        } => {
            let conn = db::connect_read_only(&db_path)?;
            let total = db::count(&conn)?;
            let query = db::OfferQuery {
                city,
                company,
                skill,
                title,
                source,
                min_salary,
                limit,
            };
            let rows = db::query_offers(&conn, &query)?;
            output::write_rows(io::stdout().lock(), &rows, total, format, verbose)
                .context("Failed to write results")
        }
        Commands::Sources => {
            for src in collector::registry::REGISTERED {
                println!("{}", src);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", elapsed_label(elapsed));
    }

    result
}

fn elapsed_label(d: Duration) -> String {
    let secs = d.as_secs();
    match (secs / 3600, secs % 3600 / 60, secs % 60) {
        (0, 0, _) => format!("{:.1}s", d.as_secs_f64()),
        (0, m, s) => format!("{m}m {s:02}s"),
        (h, m, s) => format!("{h}h {m:02}m {s:02}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_label_picks_largest_unit() {
        assert_eq!(elapsed_label(Duration::from_millis(2_500)), "2.5s");
        assert_eq!(elapsed_label(Duration::from_secs(65)), "1m 05s");
        assert_eq!(elapsed_label(Duration::from_secs(3_725)), "1h 02m 05s");
    }
}
