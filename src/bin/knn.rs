//! Command-line entry point for the kNN classifier.
//!
//! `holdout` reports the hold-out error rate of a labeled file, `classify`
//! scores one raw query against a labeled file, and `predict` labels every row
//! of an unlabeled digit file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nearest_neighbors::dataset::{self, DelimitedFormat};
use nearest_neighbors::{classify_normalized, holdout_error_rate, HoldoutConfig, KnnClassifier};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Tab-separated features, integer class in the last column
    Dating,
    /// Comma-separated with a header row, class in the first column
    Digits,
}

impl Format {
    fn layout(self) -> DelimitedFormat {
        match self {
            Format::Dating => DelimitedFormat::dating(),
            Format::Digits => DelimitedFormat::digits(),
        }
    }
}

#[derive(Parser)]
#[command(name = "knn")]
#[command(about = "k-nearest-neighbors classification of delimited datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hold out a fraction of a labeled file and report the error rate
    Holdout(HoldoutArgs),
    /// Classify one raw query after min-max scaling it with the labeled data
    Classify(ClassifyArgs),
    /// Label every row of an unlabeled digit file
    Predict(PredictArgs),
}

#[derive(Args)]
struct HoldoutArgs {
    /// Labeled data file
    #[arg(short, long)]
    input: PathBuf,

    /// Number of neighbors polled per query
    #[arg(short, long, default_value_t = 3)]
    k: usize,

    /// Fraction of rows held out as queries
    #[arg(short, long, default_value_t = 0.10)]
    test_ratio: f64,

    /// Input layout
    #[arg(short, long, value_enum, default_value_t = Format::Dating)]
    format: Format,

    /// Skip min-max normalization
    #[arg(long)]
    no_normalize: bool,

    /// Shuffle rows with this seed before splitting
    #[arg(long)]
    seed: Option<u64>,

    /// Classify held-out rows in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct ClassifyArgs {
    /// Labeled data file
    #[arg(short, long)]
    input: PathBuf,

    /// Input layout
    #[arg(short, long, value_enum, default_value_t = Format::Dating)]
    format: Format,

    /// Number of neighbors polled
    #[arg(short, long, default_value_t = 3)]
    k: usize,

    /// Raw feature values, comma-separated, in the file's column order
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    query: Vec<f64>,
}

#[derive(Args)]
struct PredictArgs {
    /// Labeled training file (header row, class in the first column)
    #[arg(long)]
    train: PathBuf,

    /// Unlabeled query file (header row, pixel columns only)
    #[arg(long)]
    test: PathBuf,

    /// Number of neighbors polled per query
    #[arg(short, long, default_value_t = 1)]
    k: usize,

    /// Classify query rows in parallel
    #[arg(long)]
    parallel: bool,
}

fn run_holdout(args: &HoldoutArgs) -> nearest_neighbors::Result<()> {
    let config = HoldoutConfig {
        k: args.k,
        test_ratio: args.test_ratio,
        normalize: !args.no_normalize,
        shuffle_seed: args.seed,
        parallel: args.parallel,
    };
    let data = dataset::load_labeled::<i64>(&args.input, args.format.layout())?;
    let report = holdout_error_rate(&data, &config)?;
    println!(
        "the total error count is: {}. rate is: {:.6}",
        report.error_count, report.error_rate
    );
    Ok(())
}

fn run_classify(args: &ClassifyArgs) -> nearest_neighbors::Result<()> {
    let data = dataset::load_labeled::<i64>(&args.input, args.format.layout())?;
    let label = classify_normalized(&data, &args.query, args.k)?;
    match (args.format, dating_verdict(label)) {
        (Format::Dating, Some(verdict)) => println!("You will probably like this person: {verdict}"),
        _ => println!("predicted class: {label}"),
    }
    Ok(())
}

fn run_predict(args: &PredictArgs) -> nearest_neighbors::Result<()> {
    let train = dataset::load_labeled::<i64>(&args.train, DelimitedFormat::digits())?;
    let queries = dataset::load_unlabeled(&args.test, DelimitedFormat::digits_unlabeled())?;

    let mut classifier = KnnClassifier::new().with_parallel(args.parallel);
    classifier.train(train.features, train.labels)?;
    let predictions = classifier.predict(&queries, args.k)?;

    println!("ImageId,Label");
    for (i, label) in predictions.iter().enumerate() {
        println!("{},{label}", i + 1);
    }
    Ok(())
}

/// Dating classes are 1-based: not at all, small doses, large doses.
fn dating_verdict(label: i64) -> Option<&'static str> {
    match label {
        1 => Some("not at all"),
        2 => Some("in small doses"),
        3 => Some("in large doses"),
        _ => None,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let (name, result) = match &cli.command {
        Commands::Holdout(args) => ("holdout", run_holdout(args)),
        Commands::Classify(args) => ("classify", run_classify(args)),
        Commands::Predict(args) => ("predict", run_predict(args)),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, command = name, "command failed");
            ExitCode::FAILURE
        }
    }
}
