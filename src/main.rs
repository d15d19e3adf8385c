use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

mod dates;
mod error;
mod evaluate;
mod ingest;
mod kmeans;
mod models;
mod report;
mod rules;
mod samples;
mod scaling;
mod train;

use kmeans::KMeansConfig;
use models::{ClusterRules, Sample};

#[derive(Parser)]
#[command(name = "activity-clusters")]
#[command(about = "Cluster daily step totals against average heart rate", long_about = None)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    /// Print load statistics to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DataArgs {
    /// Directory holding the default input files
    #[arg(long, env = "ACTIVITY_DATA_DIR", default_value = "Data", global = true)]
    data_dir: PathBuf,

    /// Heart-rate samples CSV (Id, SecondsTime, HeartRate)
    #[arg(long, global = true)]
    heart_rate_file: Option<PathBuf>,

    /// Daily steps CSV (Id, ActivityDate, TotalSteps); repeat to list fallbacks in order
    #[arg(long, global = true)]
    steps_file: Vec<PathBuf>,
}

impl DataArgs {
    fn heart_rate_path(&self) -> PathBuf {
        self.heart_rate_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("Kalp.csv"))
    }

    fn step_paths(&self) -> Vec<PathBuf> {
        if !self.steps_file.is_empty() {
            return self.steps_file.clone();
        }
        vec![self.data_dir.join("Adim.csv"), self.data_dir.join("Adım.csv")]
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score k-means fits for K = 2..5 (the default command)
    Evaluate {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Fit standardized clusters and print them as cluster rules JSON
    Train {
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Assign one day's observation to the nearest cluster of a rules file
    Predict {
        #[arg(long)]
        rules: PathBuf,
        #[arg(long)]
        steps: f64,
        #[arg(long)]
        avg_hr: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Evaluate {
        format: OutputFormat::Text,
    });

    match command {
        Commands::Evaluate { format } => {
            let samples = load_samples(&cli.data, cli.verbose)?;
            let report = evaluate::evaluate(&samples, &KMeansConfig::default())?;

            match format {
                OutputFormat::Text => print!("{}", report::build_report(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            if let Some(notice) = report::skipped_notice(&report) {
                eprintln!("{notice}");
            }
        }
        Commands::Train { k, seed } => {
            let samples = load_samples(&cli.data, cli.verbose)?;
            let config = KMeansConfig::default().with_seed(seed);
            let rules = train::train_rules(&samples, k, &config)?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
        Commands::Predict {
            rules,
            steps,
            avg_hr,
        } => {
            let cluster_rules = ClusterRules::from_path(&rules)?;
            let cluster = cluster_rules.predict(steps, avg_hr)?;
            println!("Cluster: {cluster}");
        }
    }

    Ok(())
}

fn load_samples(data: &DataArgs, verbose: bool) -> anyhow::Result<Vec<Sample>> {
    let heart_rate_path = data.heart_rate_path();
    let heart_rate = ingest::load_heart_rate(&heart_rate_path)
        .context("heart-rate data is required")?;
    let (steps_path, steps) = ingest::load_steps(&data.step_paths())?;

    for (path, table) in [(&heart_rate_path, &heart_rate.table), (&steps_path, &steps.table)] {
        if table.is_empty() {
            eprintln!("warning: no usable rows in {}", path.display());
        }
    }

    if verbose {
        for (path, stats) in [
            (&heart_rate_path, &heart_rate.stats),
            (&steps_path, &steps.stats),
        ] {
            eprintln!(
                "{}: {} rows, {} kept, {} skipped, {} days",
                path.display(),
                stats.rows,
                stats.kept,
                stats.skipped,
                stats.keys
            );
        }
    }

    let samples = samples::build_samples(&steps.table, &heart_rate.table);
    if verbose {
        eprintln!("{} shared (Id, date) days", samples.len());
    }
    Ok(samples)
}
