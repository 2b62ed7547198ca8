use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use geowatch::{Dataset, DateWindow, PassEngine, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "geowatch")]
#[command(about = "Run one classification and layout pass over a monitoring dataset")]
struct Args {
    /// Path to the dataset JSON file
    #[arg(short, long)]
    file: PathBuf,

    /// Optional pipeline configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start of the validity window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    from: Option<String>,

    /// End of the validity window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    to: Option<String>,

    /// Point names allowed to bypass the render budgets (repeatable)
    #[arg(long = "focus")]
    focus: Vec<String>,

    /// Write the pass report to a file instead of stdout
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    let store = Dataset::load(&args.file)
        .with_context(|| format!("loading dataset {}", args.file.display()))?
        .into_store()?;

    let window = DateWindow {
        from: args.from.as_deref().map(parse_day_start).transpose()?,
        to: args.to.as_deref().map(parse_day_end).transpose()?,
    };

    let mut engine = PassEngine::new(store, config);
    for name in &args.focus {
        engine.add_to_allow_list(name.clone());
    }

    let report = engine.run_pass(&window);

    let json = serde_json::to_string_pretty(&report)?;
    match &args.export {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn parse_day_start(s: &str) -> Result<DateTime<Utc>> {
    let date: NaiveDate = s.parse().with_context(|| format!("invalid date: {s}"))?;
    Ok(date.and_hms_opt(0, 0, 0).context("invalid time of day")?.and_utc())
}

fn parse_day_end(s: &str) -> Result<DateTime<Utc>> {
    let date: NaiveDate = s.parse().with_context(|| format!("invalid date: {s}"))?;
    Ok(date.and_hms_opt(23, 59, 59).context("invalid time of day")?.and_utc())
}
