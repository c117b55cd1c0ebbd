mod benchmark;
mod config;
mod input;
mod oracle;
mod output;
mod tfidf;

use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use truthfinder_core::constants::{DEFAULT_INFLUENCE_RELATED, DEFAULT_INITIAL_TRUSTWORTHINESS, DEFAULT_ITERATIONS};
use truthfinder_core::{EngineConfig, ScoredStatement, Statement, TrainOptions, TrainResult, TruthError, TruthFinder};

use crate::benchmark::BenchmarkOptions;
use crate::config::TruthfinderConfig;
use crate::oracle::{CliOracle, OracleKind};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(
    name = "truthfinder",
    version,
    about = "Discover true claims and trustworthy sources from conflicting statements"
)]
struct Cli {
    /// Show progress during execution (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Estimate claim confidence and source trustworthiness for a statement set
    Train(TrainArgs),
    /// Run the bundled seven-statement scientists example
    Demo(DemoArgs),
    /// Measure accuracy against a synthetic dataset with known ground truth
    Benchmark(BenchmarkArgs),
    /// Create a default config file at ~/.config/truthfinder/config.toml
    Init {
        /// Where to write the config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Parser)]
struct TrainArgs {
    /// File with statements: JSON array, or one "source,claim,subject" per line
    #[arg(long)]
    input: Option<PathBuf>,

    /// Inline statement "source,claim,subject" (repeatable)
    #[arg(long = "statement")]
    inline_statements: Vec<String>,

    /// Number of training iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Trustworthiness every source starts with, in (0, 1)
    #[arg(long)]
    initial_trust: Option<f64>,

    /// Dampening factor applied before the sigmoid, in (0, 1)
    #[arg(long)]
    dampening: Option<f64>,

    /// Weight of related claims, in [0, 1]
    #[arg(long)]
    influence: Option<f64>,

    /// Implication oracle: "tfidf", "case-insensitive" or "constant"
    #[arg(long)]
    oracle: Option<String>,

    /// Output JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/truthfinder/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct DemoArgs {
    /// Number of training iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Output JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct BenchmarkArgs {
    /// Number of subjects to generate
    #[arg(long, default_value_t = 200)]
    subjects: usize,

    /// Number of sources to generate
    #[arg(long, default_value_t = 10)]
    sources: usize,

    /// RNG seed (random if omitted; printed either way)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of training iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Dampening factor. Low values keep trust from saturating when many
    /// sources agree.
    #[arg(long, default_value_t = 0.1)]
    dampening: f64,

    /// Weight of related claims
    #[arg(long, default_value_t = DEFAULT_INFLUENCE_RELATED)]
    influence: f64,
}

impl TrainArgs {
    /// The flag layer of the settings stack.
    fn flags(&self) -> TruthfinderConfig {
        TruthfinderConfig {
            dampening_factor: self.dampening,
            influence_related: self.influence,
            iterations: self.iterations,
            initial_trustworthiness: self.initial_trust,
            oracle: self.oracle.clone(),
        }
    }
}

/// Seven statements from three websites about who discovered what.
const DEMO_STATEMENTS: [(&str, &str, &str); 7] = [
    ("a", "Einstein", "Special relativity"),
    ("a", "Newton", "Universal gravitation"),
    ("b", "Albert Einstein", "Special relativity"),
    ("b", "Galileo Galilei", "Heliocentrism"),
    ("c", "Newton", "Special relativity"),
    ("c", "Galilei", "Universal gravitation"),
    ("c", "Einstein", "Heliocentrism"),
];

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Demo(args) => run_demo(args),
        Commands::Benchmark(args) => benchmark::run_benchmark(&BenchmarkOptions {
            subjects: args.subjects,
            sources: args.sources,
            seed: args.seed,
            iterations: args.iterations,
            initial_trustworthiness: DEFAULT_INITIAL_TRUSTWORTHINESS,
            engine: EngineConfig {
                dampening_factor: args.dampening,
                influence_related: args.influence,
            },
        }),
        Commands::Init { config: path } => {
            let path = match path {
                Some(path) => path,
                None => config::default_path().unwrap_or_else(|e| bail(e)),
            };
            config::write_template(&path).unwrap_or_else(|e| bail(e));
            println!("Created config at {}", path.display());
            println!("Edit it to set your default dampening factor, oracle, etc.");
        }
    }
}

/// Logs go to stderr so `--json` output stays clean.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Load statements from all sources: --input file, --statement inline args, or stdin.
fn load_statements(args: &TrainArgs) -> Vec<Statement> {
    let mut statements = Vec::new();

    if let Some(ref path) = args.input {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read input file {}: {e}", path.display())));
        statements = input::parse_statements(&content)
            .unwrap_or_else(|e| bail(format!("{}: {e}", path.display())));
    }

    for value in &args.inline_statements {
        statements.push(input::parse_line(value).unwrap_or_else(|e| bail(format!("--statement: {e}"))));
    }

    // From stdin (only if no file and no inline statements)
    if args.input.is_none() && statements.is_empty() {
        let mut stdin = io::stdin();
        if stdin.is_terminal() {
            bail(
                "No statements provided. Use --input <file>, --statement <source,claim,subject>, \
                 or pipe them via stdin.",
            );
        }
        let mut content = String::new();
        stdin
            .read_to_string(&mut content)
            .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")));
        statements = input::parse_statements(&content).unwrap_or_else(|e| bail(format!("stdin: {e}")));
    }

    statements
}

fn run_train(args: TrainArgs) {
    let path = match args.config.clone() {
        Some(path) => path,
        None => config::default_path().unwrap_or_else(|e| bail(e)),
    };
    let file = TruthfinderConfig::read(&path).unwrap_or_else(|e| bail(e));
    let settings = args.flags().or(file).resolve().unwrap_or_else(|e| bail(e));

    let statements = load_statements(&args);
    tracing::info!(
        statements = statements.len(),
        iterations = settings.options.iterations,
        initial_trust = settings.options.initial_trustworthiness,
        oracle = %settings.oracle,
        "training"
    );

    let oracle = CliOracle::build(settings.oracle, &statements);
    let result = train(oracle, settings.engine, &statements, &settings.options);

    if args.json {
        output::print_json(&result);
    } else {
        output::print_table(&result);
    }
}

fn run_demo(args: DemoArgs) {
    let statements: Vec<Statement> = DEMO_STATEMENTS
        .iter()
        .map(|&(source, claim, subject)| Statement::new(source, claim, subject))
        .collect();
    let engine_config = EngineConfig {
        dampening_factor: 0.8,
        influence_related: 0.6,
    };

    let options = TrainOptions {
        iterations: args.iterations,
        ..TrainOptions::default()
    };

    let oracle = CliOracle::build(OracleKind::Tfidf, &statements);
    let result = train(oracle, engine_config, &statements, &options);

    if args.json {
        output::print_json(&result);
        return;
    }

    let initial: Vec<_> = statements
        .iter()
        .map(|s| ScoredStatement::new(s, options.initial_trustworthiness, 0.0))
        .collect();
    println!("Initial state");
    output::print_statements(&initial);
    println!("\nEstimation result");
    output::print_statements(&result.statements);
    println!();
    output::print_table(&result);
}

fn train(
    oracle: CliOracle,
    engine: EngineConfig,
    statements: &[Statement],
    options: &TrainOptions,
) -> TrainResult {
    let finder = TruthFinder::new(oracle, engine).unwrap_or_else(|e| bail(e));
    tracing::info!(
        dampening_factor = finder.config().dampening_factor,
        influence_related = finder.config().influence_related,
        "engine ready"
    );
    let seeded_in_range = options.initial_trustworthiness > 0.0 && options.initial_trustworthiness < 1.0;
    finder.train_with(statements, options).unwrap_or_else(|e| match e {
        TruthError::Domain { .. } if seeded_in_range => bail(format!(
            "{e}\nIf a source's trustworthiness reached 1, try a lower --dampening or fewer --iterations."
        )),
        other => bail(other),
    })
}
