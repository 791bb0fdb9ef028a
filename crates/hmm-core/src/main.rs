//! hmm-core - Baum-Welch fitting for Gaussian hidden Markov models
//!
//! Commands:
//! - `fit`: estimate parameters from an observation file
//! - `simulate`: sample a sequence from a model
//! - `loglik`: evaluate the sequence log-likelihood under a model
//! - `config show`: print the resolved fit configuration
//!
//! Payloads go to stdout as JSON; logs and errors go to stderr.

use clap::{Args, Parser, Subcommand};
use hmm_config::{load_fit_config, validate_fit_config, ConfigSummary, LoadedConfig, VarianceUpdate};
use hmm_core::exit_codes::ExitCode;
use hmm_core::logging::{generate_run_id, init_logging, LevelFilter, LogConfig, LogFormat};
use hmm_core::{log_likelihood, simulate, EstimateError, Estimator, Theta};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span};

/// Baum-Welch parameter estimation for Gaussian HMMs
#[derive(Parser)]
#[command(name = "hmm-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Path to fit.json (overrides HMM_EM_CONFIG and the search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate model parameters with Baum-Welch
    Fit(FitArgs),

    /// Sample a state path and observations from a model
    Simulate(SimulateArgs),

    /// Sequence log-likelihood under a model
    Loglik(LoglikArgs),

    /// Inspect fit configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct FitArgs {
    /// JSON array of observations
    #[arg(long)]
    observations: PathBuf,

    /// Initial model (serialized Theta)
    #[arg(long)]
    initial: PathBuf,

    /// Number of EM iterations (overrides config)
    #[arg(long)]
    max_iter: Option<usize>,

    /// Standard-deviation update (previous-mean, updated-mean)
    #[arg(long)]
    variance_update: Option<VarianceUpdate>,

    /// Stop early when the log-likelihood changes by less than this
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Generating model (serialized Theta)
    #[arg(long)]
    model: PathBuf,

    /// Number of time steps
    #[arg(long)]
    length: usize,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Args, Debug)]
struct LoglikArgs {
    /// JSON array of observations
    #[arg(long)]
    observations: PathBuf,

    /// Model (serialized Theta)
    #[arg(long)]
    model: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved configuration and its snapshot
    Show,
}

/// Failure of a single command, carrying its exit code.
#[derive(Debug)]
struct CommandError {
    code: ExitCode,
    message: String,
}

impl CommandError {
    fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        CommandError {
            code: ExitCode::IoError,
            message: format!("{}: {}", path.display(), err),
        }
    }
}

impl From<EstimateError> for CommandError {
    fn from(err: EstimateError) -> Self {
        CommandError {
            code: ExitCode::from(&err),
            message: format!("[{}] {}", err.code(), err),
        }
    }
}

impl From<hmm_config::ValidationError> for CommandError {
    fn from(err: hmm_config::ValidationError) -> Self {
        CommandError {
            code: ExitCode::from(&err),
            message: format!("[{}] {}", err.code(), err),
        }
    }
}

type CommandResult = Result<(), CommandError>;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let result = match &cli.command {
        Commands::Fit(args) => run_fit(&cli.global, args, &run_id),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Loglik(args) => run_loglik(args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            error!(code = %err.code, "{}", err.message);
            let body = serde_json::json!({
                "run_id": run_id,
                "error": {
                    "code": err.code.code_name(),
                    "exit_code": err.code.as_i32(),
                    "message": err.message,
                }
            });
            eprintln!("{}", body);
            err.code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_fit(global: &GlobalOpts, args: &FitArgs, run_id: &str) -> CommandResult {
    let LoadedConfig {
        mut config,
        mut snapshot,
    } = load_fit_config(global.config.as_deref())?;

    if let Some(max_iter) = args.max_iter {
        config = config.with_max_iter(max_iter);
    }
    if let Some(mode) = args.variance_update {
        config = config.with_variance_update(mode);
    }
    if let Some(tolerance) = args.tolerance {
        config = config.with_tolerance(tolerance);
    }
    validate_fit_config(&config)?;
    snapshot.summary = ConfigSummary::from(&config);

    let observations = read_observations(&args.observations)?;
    let initial = read_model(&args.initial)?;
    info!(
        config = snapshot.short_id(),
        source = %snapshot.config_source,
        "Loaded fit configuration"
    );

    let report = Estimator::new(config).fit(&observations, &initial)?;

    #[derive(Serialize)]
    struct FitOutput<'a> {
        run_id: &'a str,
        config: &'a hmm_config::ConfigSnapshot,
        report: &'a hmm_core::FitReport,
    }
    print_json(&FitOutput {
        run_id,
        config: &snapshot,
        report: &report,
    })
}

fn run_simulate(args: &SimulateArgs) -> CommandResult {
    let model = read_model(&args.model)?;
    let simulation = simulate(&model, args.length, args.seed)?;
    info!(length = args.length, seed = args.seed, "Simulated sequence");
    print_json(&simulation)
}

fn run_loglik(args: &LoglikArgs) -> CommandResult {
    let observations = read_observations(&args.observations)?;
    let model = read_model(&args.model)?;
    let ll = log_likelihood(&observations, &model)?;
    print_json(&serde_json::json!({
        "observations": observations.len(),
        "states": model.n_states(),
        "log_likelihood": ll,
    }))
}

fn run_config_show(global: &GlobalOpts) -> CommandResult {
    let loaded = load_fit_config(global.config.as_deref())?;
    print_json(&serde_json::json!({
        "config": loaded.config,
        "snapshot": loaded.snapshot,
    }))
}

fn read_observations(path: &Path) -> Result<Vec<f64>, CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CommandError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| CommandError::io(path, e))
}

fn read_model(path: &Path) -> Result<Theta, CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CommandError::io(path, e))?;
    Theta::from_json(&raw).map_err(|e| CommandError::io(path, e))
}

fn print_json<T: Serialize>(value: &T) -> CommandResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(e) => Err(CommandError {
            code: ExitCode::InternalError,
            message: format!("failed to serialize output: {}", e),
        }),
    }
}
