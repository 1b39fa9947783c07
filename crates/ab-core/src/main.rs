//! ab-core: experiment statistics from the command line.
//!
//! Reads an experiment snapshot as JSON (`{"variations": [...]}`) from a file
//! or stdin, runs one analysis, and writes a JSON envelope to stdout. Logs
//! go to stderr.

use ab_config::{load_settings, ConfigError, ResolvedSettings, ValidationError};
use ab_core::exit_codes::ExitCode;
use ab_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use ab_core::{Engine, EngineError, VariationSample};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Envelope schema for stdout payloads.
const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

/// Experiment statistics: significance tests, Bayesian ranking, sequential looks, bandit allocation
#[derive(Parser)]
#[command(name = "ab-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (overrides AB_STATS_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Experiment JSON file, or '-' for stdin
    #[arg(long, short = 'i', global = true, default_value = "-")]
    input: String,

    /// Seed for Monte Carlo routines (reproducible output)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Two-proportion z-test of the second variation against the first
    Frequentist(AlphaArgs),

    /// Beta-Binomial comparison of the second variation against the first
    Bayesian,

    /// Posterior probability of being best for every variation
    Rank,

    /// Interim look with alpha spending
    Sequential(SequentialArgs),

    /// Bandit traffic allocation
    Allocate(AllocateArgs),

    /// Sample-ratio-mismatch check on visitor counts
    Srm(SrmArgs),

    /// Visitors needed per variation to detect an effect
    SampleSize(SampleSizeArgs),

    /// Inspect or validate engine settings
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct AlphaArgs {
    /// Significance level (defaults to the configured alpha)
    #[arg(long)]
    alpha: Option<f64>,
}

#[derive(Args, Debug)]
struct SequentialArgs {
    /// Planned total visitors across both variations
    #[arg(long)]
    max_sample_size: u64,

    /// Overall significance level (defaults to the configured alpha)
    #[arg(long)]
    alpha: Option<f64>,
}

#[derive(Args, Debug)]
struct AllocateArgs {
    /// thompson-sampling, epsilon-greedy, or ucb
    #[arg(long, default_value = "thompson-sampling")]
    strategy: String,
}

#[derive(Args, Debug)]
struct SrmArgs {
    /// Intended traffic weights, one per variation (default: equal split)
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,
}

#[derive(Args, Debug)]
struct SampleSizeArgs {
    /// Baseline conversion rate, in (0, 1)
    #[arg(long)]
    baseline: f64,

    /// Minimum detectable effect, relative to the baseline (0.1 = +10%)
    #[arg(long)]
    mde: f64,

    #[arg(long)]
    alpha: Option<f64>,

    #[arg(long)]
    power: Option<f64>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective settings and where they came from
    Show,
    /// Load and validate settings, reporting any problem
    Validate,
}

/// Experiment snapshot read from `--input`.
#[derive(Debug, Deserialize)]
struct ExperimentInput {
    variations: Vec<VariationSample>,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    run_id: &'a str,
    command: &'static str,
    result: T,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot read input {path}: {source}")]
    InputIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid experiment JSON in {path}: {source}")]
    InputParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{command} needs at least {needed} variations, got {got}")]
    TooFewVariations {
        command: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(ConfigError::ValidationError(ValidationError::VersionMismatch {
                ..
            })) => ExitCode::VersionError,
            CliError::Config(_) => ExitCode::ConfigError,
            CliError::Engine(EngineError::InvalidArgument { .. }) => ExitCode::ArgsError,
            CliError::Engine(EngineError::Settings(_)) => ExitCode::ArgsError,
            CliError::Engine(_) => ExitCode::InputError,
            CliError::InputIo { .. }
            | CliError::InputParse { .. }
            | CliError::TooFewVariations { .. } => ExitCode::InputError,
            CliError::Serialize(_) => ExitCode::InternalError,
            CliError::Output(_) => ExitCode::IoError,
        }
    }
}

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
    let span = tracing::warn_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let exit_code = match run(&cli, &run_id) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            tracing::error!(error = %err, exit_code = %code, "command failed");
            report_error(&err, code, &run_id, &log_config);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli, run_id: &str) -> Result<(), CliError> {
    let global = &cli.global;
    let resolved = load_settings(global.config.as_deref())?;
    tracing::debug!(source = %resolved.source, "settings resolved");

    match &cli.command {
        Commands::Frequentist(args) => {
            let engine = engine_with(&resolved, args.alpha, None)?;
            let variations = read_variations(&global.input)?;
            let (control, treatment) = pair("frequentist", &variations)?;
            let result = engine.frequentist(control, treatment)?;
            emit(global, run_id, "frequentist", &result)
        }
        Commands::Bayesian => {
            let engine = engine_with(&resolved, None, None)?;
            let variations = read_variations(&global.input)?;
            let (control, treatment) = pair("bayesian", &variations)?;
            let result = engine.bayesian(control, treatment, &mut make_rng(global.seed))?;
            emit(global, run_id, "bayesian", &result)
        }
        Commands::Rank => {
            let engine = engine_with(&resolved, None, None)?;
            let variations = read_variations(&global.input)?;
            let result = engine.rank(&variations, &mut make_rng(global.seed))?;
            emit(global, run_id, "rank", &result)
        }
        Commands::Sequential(args) => {
            let engine = engine_with(&resolved, args.alpha, None)?;
            let variations = read_variations(&global.input)?;
            let (control, treatment) = pair("sequential", &variations)?;
            let result = engine.sequential(control, treatment, args.max_sample_size)?;
            emit(global, run_id, "sequential", &result)
        }
        Commands::Allocate(args) => {
            let engine = engine_with(&resolved, None, None)?;
            let variations = read_variations(&global.input)?;
            let result = engine.allocate(&variations, &args.strategy, &mut make_rng(global.seed))?;
            emit(global, run_id, "allocate", &result)
        }
        Commands::Srm(args) => {
            let engine = engine_with(&resolved, None, None)?;
            let variations = read_variations(&global.input)?;
            let result = engine.check_sample_ratio(&variations, args.weights.as_deref())?;
            emit(global, run_id, "srm", &result)
        }
        Commands::SampleSize(args) => {
            let engine = engine_with(&resolved, args.alpha, args.power)?;
            let n = engine.sample_size(args.baseline, args.mde)?;
            let result = serde_json::json!({
                "baseline_rate": args.baseline,
                "mde_relative": args.mde,
                "alpha": engine.settings().alpha,
                "power": engine.settings().power,
                "per_variation": n,
                "total": n.saturating_mul(2),
            });
            emit(global, run_id, "sample-size", &result)
        }
        Commands::Config(args) => {
            let result = serde_json::json!({
                "valid": true,
                "source": resolved.source.to_string(),
                "path": resolved.path,
                "settings": &resolved.settings,
            });
            let command = match args.command {
                ConfigCommands::Show => "config show",
                ConfigCommands::Validate => "config validate",
            };
            emit(global, run_id, command, &result)
        }
    }
}

/// Engine over the loaded settings with per-command overrides applied.
fn engine_with(
    resolved: &ResolvedSettings,
    alpha: Option<f64>,
    power: Option<f64>,
) -> Result<Engine, CliError> {
    let mut settings = resolved.settings.clone();
    if let Some(alpha) = alpha {
        settings = settings.with_alpha(alpha);
    }
    if let Some(power) = power {
        settings = settings.with_power(power);
    }
    Ok(Engine::new(settings)?)
}

fn read_variations(input: &str) -> Result<Vec<VariationSample>, CliError> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::InputIo {
                path: "<stdin>".to_string(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(Path::new(input)).map_err(|source| CliError::InputIo {
            path: input.to_string(),
            source,
        })?
    };

    let parsed: ExperimentInput =
        serde_json::from_str(&content).map_err(|source| CliError::InputParse {
            path: input.to_string(),
            source,
        })?;
    for variation in &parsed.variations {
        variation.validate()?;
    }
    tracing::debug!(variations = parsed.variations.len(), "experiment input read");
    Ok(parsed.variations)
}

/// First variation is control, second is treatment; extras are ignored.
fn pair<'a>(
    command: &'static str,
    variations: &'a [VariationSample],
) -> Result<(&'a VariationSample, &'a VariationSample), CliError> {
    match variations {
        [control, treatment, rest @ ..] => {
            if !rest.is_empty() {
                tracing::warn!(
                    command,
                    ignored = rest.len(),
                    "only the first two variations are compared"
                );
            }
            Ok((control, treatment))
        }
        _ => Err(CliError::TooFewVariations {
            command,
            needed: 2,
            got: variations.len(),
        }),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn emit<T: Serialize>(
    global: &GlobalOpts,
    run_id: &str,
    command: &'static str,
    result: &T,
) -> Result<(), CliError> {
    let envelope = Envelope {
        schema_version: OUTPUT_SCHEMA_VERSION,
        run_id,
        command,
        result,
    };
    let rendered = if global.compact {
        serde_json::to_string(&envelope)
    } else {
        serde_json::to_string_pretty(&envelope)
    }
    .map_err(CliError::Serialize)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(CliError::Output)
}

/// Structured error on stderr; JSON when logs are JSONL, prose otherwise.
fn report_error(err: &CliError, code: ExitCode, run_id: &str, log_config: &LogConfig) {
    match log_config.format {
        LogFormat::Jsonl => {
            let payload = serde_json::json!({
                "run_id": run_id,
                "error": {
                    "code": code.as_i32(),
                    "code_name": code.code_name(),
                    "message": err.to_string(),
                },
            });
            eprintln!("{payload}");
        }
        LogFormat::Human => eprintln!("ab-core: error: {err}"),
    }
}
