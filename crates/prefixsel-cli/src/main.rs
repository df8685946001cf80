mod input;
mod logging;
mod render;

use clap::{Parser, ValueEnum};
use input::{DEFAULT_MATRIX_FILE, DEFAULT_WEIGHTS_FILE, InputError, find_input, read_table};
use prefixsel_highs::HighsSolver;
use prefixsel_risk::SampleMode;
use prefixsel_select::{ObjectivePair, SelectionConfig, SelectionPipeline};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Select the shortest row prefix of a risk matrix that meets a coverage target"
)]
struct Cli {
    /// Directory holding the risk matrix and weight files
    #[arg(long, default_value = ".")]
    search_root: PathBuf,

    /// JSON file with selection settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Risk matrix file name inside the search root
    #[arg(long, default_value = DEFAULT_MATRIX_FILE)]
    matrix_file: String,

    /// Weight file name inside the search root
    #[arg(long, default_value = DEFAULT_WEIGHTS_FILE)]
    weights_file: String,

    /// Fraction of the real weight total the prefix must cover
    #[arg(long)]
    target_percentage: Option<f64>,

    /// Minimum number of selected rows
    #[arg(long)]
    minimum_rows: Option<usize>,

    /// Objective weights as COVERAGE,PARSIMONY
    #[arg(long, value_delimiter = ',', num_args = 2, value_names = ["COVERAGE", "PARSIMONY"])]
    objective_weights: Option<Vec<f64>>,

    /// Objective priorities as COVERAGE,PARSIMONY; lower is solved first
    #[arg(long, value_delimiter = ',', num_args = 2, value_names = ["COVERAGE", "PARSIMONY"])]
    objective_priorities: Option<Vec<u32>>,

    /// Maximum number of sampled rows
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Maximum number of sampled columns
    #[arg(long)]
    sample_columns: Option<usize>,

    /// Sampling mode
    #[arg(long, value_enum)]
    sample_mode: Option<SampleModeArg>,

    /// Seed for random sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Solver time limit in seconds, per objective tier
    #[arg(long)]
    time_limit: Option<f64>,

    /// Relative MIP gap
    #[arg(long)]
    mip_gap: Option<f64>,

    /// Solver thread count
    #[arg(long)]
    threads: Option<u32>,

    /// Print solver output to the console
    #[arg(long)]
    solver_log: bool,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// List every monotonic prefix constraint in the table
    #[arg(long)]
    all_slacks: bool,

    /// Log filter (e.g. debug, prefixsel_highs=trace); falls back to PREFIXSEL_TRACE
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum SampleModeArg {
    Truncate,
    Random,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    let config = apply_overrides(load_config(cli.config.as_deref())?, &cli);
    config.validate()?;

    let matrix_path = find_input(&cli.search_root, &cli.matrix_file)?;
    let weights_path = find_input(&cli.search_root, &cli.weights_file)?;
    let rows = read_table(&matrix_path)?;
    let weights = read_table(&weights_path)?;

    let started = Instant::now();
    let mut solver = HighsSolver::with_config(config.solver.clone());
    let outcome = SelectionPipeline::run(&rows, &weights, &config, &mut solver)?;
    info!(
        component = "cli",
        operation = "run",
        status = outcome.status.as_str(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Selection finished"
    );

    match cli.format {
        OutputFormat::Table => print!(
            "{}",
            render::render_table(&config.model_name, &outcome, cli.all_slacks)
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SelectionConfig, InputError> {
    let Some(path) = path else {
        return Ok(SelectionConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| InputError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn pair<T: Copy>(values: &[T]) -> Option<ObjectivePair<T>> {
    match values {
        [coverage, parsimony] => Some(ObjectivePair::new(*coverage, *parsimony)),
        _ => None,
    }
}

fn apply_overrides(mut config: SelectionConfig, cli: &Cli) -> SelectionConfig {
    if let Some(pct) = cli.target_percentage {
        config.target_percentage = pct;
    }
    if let Some(rows) = cli.minimum_rows {
        config.minimum_rows = rows;
    }
    if let Some(weights) = cli.objective_weights.as_deref().and_then(pair) {
        config.objective_weights = weights;
    }
    if let Some(priorities) = cli.objective_priorities.as_deref().and_then(pair) {
        config.objective_priorities = priorities;
    }
    if let Some(rows) = cli.sample_rows {
        config.sample.rows = rows;
    }
    if let Some(columns) = cli.sample_columns {
        config.sample.columns = columns;
    }
    match cli.sample_mode {
        Some(SampleModeArg::Truncate) => config.sample.mode = SampleMode::Truncate,
        Some(SampleModeArg::Random) => config.sample.mode = SampleMode::Random { seed: cli.seed },
        None => {
            if let (SampleMode::Random { seed }, Some(new_seed)) =
                (&mut config.sample.mode, cli.seed)
            {
                *seed = Some(new_seed);
            }
        }
    }
    if let Some(limit) = cli.time_limit {
        config.solver.time_limit = Some(limit);
    }
    if let Some(gap) = cli.mip_gap {
        config.solver.mip_gap = Some(gap);
    }
    if let Some(threads) = cli.threads {
        config.solver.threads = Some(threads);
    }
    if cli.solver_log {
        config.solver.log_to_console = Some(true);
    }
    config
}
