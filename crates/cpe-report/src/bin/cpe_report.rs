use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cpe_report::render::{render_elasticities, render_grid};
use cpe_report::{evaluate, run_report, ReportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON or TOML config file (defaults to cpe.toml / cpe.json in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output base directory; each run gets a timestamped subdirectory
    #[arg(long, default_value = "output-cpe")]
    output: PathBuf,

    /// Baseline revenue
    #[arg(long)]
    revenue: Option<f64>,

    /// Baseline marketing spend
    #[arg(long)]
    marketing_spend: Option<f64>,

    /// Product margin as a fraction in [0, 1]
    #[arg(long)]
    margin: Option<f64>,

    /// Other costs as a fraction of revenue in [0, 1]
    #[arg(long)]
    other_costs: Option<f64>,

    /// Finite-difference step for the elasticities
    #[arg(long)]
    delta: Option<f64>,

    /// Print results without writing any files
    #[arg(long, default_value_t = false)]
    stdout_only: bool,

    /// Print results as JSON instead of text tables
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn apply_overrides(cli: &Cli, config: &mut ReportConfig) {
    if let Some(v) = cli.revenue {
        config.revenue = v;
    }
    if let Some(v) = cli.marketing_spend {
        config.marketing_spend = v;
    }
    if let Some(v) = cli.margin {
        config.product_margin = v;
    }
    if let Some(v) = cli.other_costs {
        config.other_costs_pct = v;
    }
    if let Some(v) = cli.delta {
        config.delta = v;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let mut config = ReportConfig::resolve(cli.config.as_deref(), &cwd)
        .context("failed to load configuration")?;
    apply_overrides(&cli, &mut config);

    let (evaluation, written) = if cli.stdout_only {
        (evaluate(&config).context("invalid inputs")?, None)
    } else {
        let summary = run_report(&config, &cli.output).context("report failed")?;
        (summary.evaluation.clone(), Some(summary))
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        println!("{}", render_elasticities(&evaluation.elasticities));
        print!("{}", render_grid(&evaluation.grid));
    }

    if let Some(summary) = written {
        eprintln!("Run directory: {}", summary.output_dir.display());
        eprintln!("CSV: {}", summary.csv_path.display());
        eprintln!("Elasticities: {}", summary.elasticity_path.display());
        eprintln!("Manifest: {}", summary.manifest_path.display());
    }

    Ok(())
}
