use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use metricscope::experiments::{classification, regression, ClassificationConfig, RegressionConfig};
use metricscope::io::read_json;
use metricscope::ExperimentConfig;

#[derive(Parser)]
#[command(
    name = "metricscope",
    version,
    about = "Evaluation-metric experiments on synthetic data"
)]
struct Cli {
    /// JSON file with experiment settings; explicit flags take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare ROC-AUC and average precision of three scorers on imbalanced labels
    Classification(ClassificationArgs),
    /// Fit ridge regression and compare metrics across train/val/test
    Regression(RegressionArgs),
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for charts and exported files
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Also write CSV and JSON results
    #[arg(long)]
    export: bool,
}

#[derive(Args)]
struct ClassificationArgs {
    /// Random seed [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Number of samples [default: 10000]
    #[arg(long)]
    samples: Option<usize>,

    /// Number of positive samples [default: 200]
    #[arg(long)]
    positives: Option<usize>,

    /// Skip rendering the SVG charts
    #[arg(long)]
    no_plots: bool,

    #[command(flatten)]
    output: OutputArgs,
}

impl ClassificationArgs {
    fn apply(&self, cfg: &mut ClassificationConfig) {
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.samples {
            cfg.n_samples = v;
        }
        if let Some(v) = self.positives {
            cfg.n_positive = v;
        }
    }
}

#[derive(Args)]
struct RegressionArgs {
    /// Random seed [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Number of samples [default: 200]
    #[arg(long)]
    samples: Option<usize>,

    /// Number of features [default: 5]
    #[arg(long)]
    features: Option<usize>,

    /// Standard deviation of the target noise [default: 15]
    #[arg(long)]
    noise: Option<f64>,

    /// Ridge regularisation strength [default: 1.0]
    #[arg(long)]
    alpha: Option<f64>,

    /// Feature scaling: standard or minmax [default: standard]
    #[arg(long)]
    scaling: Option<String>,

    /// Share of rows held out for testing [default: 0.2]
    #[arg(long)]
    test_size: Option<f64>,

    /// Share of the remaining rows used for validation [default: 0.25]
    #[arg(long)]
    val_size: Option<f64>,

    #[command(flatten)]
    output: OutputArgs,
}

impl RegressionArgs {
    fn apply(&self, cfg: &mut RegressionConfig) {
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.samples {
            cfg.n_samples = v;
        }
        if let Some(v) = self.features {
            cfg.n_features = v;
        }
        if let Some(v) = self.noise {
            cfg.noise = v;
        }
        if let Some(v) = self.alpha {
            cfg.alpha = v;
        }
        if let Some(v) = &self.scaling {
            cfg.scaling = v.clone();
        }
        if let Some(v) = self.test_size {
            cfg.test_size = v;
        }
        if let Some(v) = self.val_size {
            cfg.val_size = v;
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ExperimentConfig> {
    match path {
        Some(p) => read_json(p).with_context(|| format!("failed to load config from {}", p.display())),
        None => Ok(ExperimentConfig::default()),
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

fn print_written(paths: &[PathBuf]) {
    for p in paths {
        println!("  wrote {}", p.display());
    }
}

fn cmd_classification(args: &ClassificationArgs, mut cfg: ClassificationConfig) -> Result<()> {
    args.apply(&mut cfg);
    let report = classification::run(&cfg).context("classification experiment failed")?;

    for line in report.summary_lines() {
        println!("{line}");
    }

    let out = &args.output.out_dir;
    if !args.no_plots || args.output.export {
        ensure_dir(out)?;
    }
    if !args.no_plots {
        let written = classification::render(&report, out).context("failed to render charts")?;
        print_written(&written);
    }
    if args.output.export {
        let written = classification::export(&report, out).context("failed to export results")?;
        print_written(&written);
    }
    Ok(())
}

fn cmd_regression(args: &RegressionArgs, mut cfg: RegressionConfig) -> Result<()> {
    args.apply(&mut cfg);
    let report = regression::run(&cfg).context("regression experiment failed")?;

    for line in report.summary_lines() {
        println!("{line}");
    }

    if args.output.export {
        let out = &args.output.out_dir;
        ensure_dir(out)?;
        let written = regression::export(&report, out).context("failed to export results")?;
        print_written(&written);
    }
    Ok(())
}

/// `RUST_LOG`-style directives when given and valid, `warn` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    info!(config = ?cli.config, "loaded settings");

    match &cli.command {
        Commands::Classification(args) => cmd_classification(args, config.classification),
        Commands::Regression(args) => cmd_regression(args, config.regression),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["metricscope", "regression", "--alpha", "0.1", "--scaling", "minmax"]).unwrap();
        let Commands::Regression(args) = cli.command else {
            panic!("expected regression subcommand");
        };
        let mut cfg = RegressionConfig {
            n_samples: 500,
            ..RegressionConfig::default()
        };
        args.apply(&mut cfg);
        assert_eq!(cfg.alpha, 0.1);
        assert_eq!(cfg.scaling, "minmax");
        // untouched by flags
        assert_eq!(cfg.n_samples, 500);
        assert_eq!(args.output.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_classification_flags() {
        let cli = Cli::try_parse_from([
            "metricscope",
            "--config",
            "settings.json",
            "classification",
            "--positives",
            "50",
            "--no-plots",
            "--export",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("settings.json")));
        let Commands::Classification(args) = cli.command else {
            panic!("expected classification subcommand");
        };
        let mut cfg = ClassificationConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.n_positive, 50);
        assert_eq!(cfg.n_samples, 10_000);
        assert!(args.no_plots && args.output.export);
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_plain_rust_log_level_overrides_default() {
        assert_eq!(log_filter(Some("info")).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("error")).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(
            log_filter(Some("metricscope=debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/metricscope.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
