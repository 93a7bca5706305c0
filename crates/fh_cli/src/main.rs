mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use fh_core::logging::{init_logging, StageLogger};
use fh_core::{Error, PipelineConfig};

use crate::pipeline::{run_stages, Stage};

/// Exit status for a stage whose input artifact does not exist yet.
const EXIT_MISSING_INPUT: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval(Duration);

impl FromStr for Interval {
    type Err = String;

    /// Accepts `90`, `45m`, `1h30m`, `1d`; a bare number means seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total = 0u64;
        let mut digits = String::new();
        let mut seen = false;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let n: u64 = digits
                .parse()
                .map_err(|_| format!("unit '{}' without a number", c))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("invalid duration unit: {}", c)),
            };
            total = n
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| format!("interval too large: {}", s))?;
            digits.clear();
            seen = true;
        }
        if !digits.is_empty() {
            let secs = digits.parse::<u64>().map_err(|e| e.to_string())?;
            total = total
                .checked_add(secs)
                .ok_or_else(|| format!("interval too large: {}", s))?;
            seen = true;
        }
        if !seen || total == 0 {
            return Err("interval must be a positive duration".to_string());
        }
        Ok(Interval(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "RSS feeds in, static news site out", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for intermediate JSON artifacts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory the site is written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch every configured feed into the raw artifact
    Fetch,
    /// Clean, summarise and categorise the raw articles
    Process,
    /// Attach affiliate links to processed articles
    Affiliate,
    /// Generate the HTML site and JSON API
    Render,
    /// Generate sitemap.xml, sitemap-news.xml and sitemap_index.xml
    Sitemap,
    /// Run every stage in order and print an execution report
    RunAll {
        /// Repeat the whole pipeline on this interval (e.g. 45m, 1h)
        #[arg(long)]
        every: Option<Interval>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

async fn run_all(config: &PipelineConfig) -> anyhow::Result<()> {
    info!("🗞️  Starting full pipeline ({} stages)", Stage::ALL.len());
    let report = run_stages(config, &Stage::ALL).await;
    report.log(&StageLogger::for_stage("pipeline"));

    // Keep the original error so the exit code can see its variant.
    let failed = report.steps.into_iter().find_map(|s| s.outcome.err().map(|e| (s.stage, e)));
    if let Some((stage, e)) = failed {
        return Err(anyhow::Error::new(e).context(format!("stage {} failed", stage)));
    }
    info!("🎉 Pipeline finished; site is in {}", config.output_dir.display());
    Ok(())
}

async fn run_one(stage: Stage, config: &PipelineConfig) -> anyhow::Result<()> {
    let report = stage
        .run(config)
        .await
        .with_context(|| format!("stage {} failed", stage))?;
    info!(
        "✨ {} done: {} processed, {} skipped",
        stage,
        report.processed,
        report.skipped_count()
    );
    Ok(())
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    init_logging(cli.verbose || config.debug);

    match cli.command {
        Commands::RunAll { every: None } => run_all(&config).await,
        Commands::RunAll { every: Some(interval) } => {
            info!("Running every {}s", interval.0.as_secs());
            loop {
                if let Err(e) = run_all(&config).await {
                    error!("Pipeline run failed: {:#}", e);
                }
                info!("Waiting {}s before the next run", interval.0.as_secs());
                tokio::time::sleep(interval.0).await;
            }
        }
        Commands::Fetch => run_one(Stage::Fetch, &config).await,
        Commands::Process => run_one(Stage::Process, &config).await,
        Commands::Affiliate => run_one(Stage::Affiliate, &config).await,
        Commands::Render => run_one(Stage::Render, &config).await,
        Commands::Sitemap => run_one(Stage::Sitemap, &config).await,
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        Some(Error::MissingInput(_)) => ExitCode::from(EXIT_MISSING_INPUT),
        _ => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // No-op unless configuration failed before logging was set up.
            init_logging(false);
            error!("❌ {:#}", e);
            exit_code(&e)
        }
    }
}
