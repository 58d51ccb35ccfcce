//! labtest CLI
//!
//! Command-line drivers for the string queue (`qtest`) and the bit puzzles
//! (`btest`).

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use labtest::btest::{parse_arg, render_single, render_summary, render_total};
use labtest::{LabConfig, QtestSession};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "labtest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drivers for the lab queue and bit puzzles", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a queue command script (reads stdin when no file is given)
    Qtest {
        /// Script file
        script: Option<PathBuf>,

        /// Capacity of the removal buffer, overriding the config
        #[arg(long)]
        bufsize: Option<usize>,
    },

    /// Check the bit puzzles against their reference implementations
    Btest {
        /// Only check this puzzle (repeatable)
        #[arg(short = 'f', long = "function", value_name = "NAME")]
        functions: Vec<String>,

        /// First argument for a single explicit check
        #[arg(short = '1', value_name = "ARG", allow_hyphen_values = true)]
        arg1: Option<String>,

        /// Second argument for a single explicit check
        #[arg(short = '2', value_name = "ARG", allow_hyphen_values = true)]
        arg2: Option<String>,

        /// Third argument for a single explicit check
        #[arg(short = '3', value_name = "ARG", allow_hyphen_values = true)]
        arg3: Option<String>,

        /// Random seed, overriding the config
        #[arg(long)]
        seed: Option<u64>,

        /// Random tuples per puzzle, overriding the config
        #[arg(long)]
        trials: Option<usize>,

        /// Print only the total score
        #[arg(short = 'g', long)]
        grade: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Qtest { script, bufsize } => {
            run_qtest(cli.config.as_deref(), script.as_deref(), bufsize)
        }
        Commands::Btest {
            functions,
            arg1,
            arg2,
            arg3,
            seed,
            trials,
            grade,
        } => {
            let explicit = [arg1, arg2, arg3];
            run_btest(
                cli.config.as_deref(),
                functions,
                &explicit,
                seed,
                trials,
                grade,
            )
        }
        Commands::Completions { shell } => {
            run_completions(shell);
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "labtest=debug,lab_queue=debug,lab_bits=debug"
    } else {
        "labtest=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "labtest", &mut io::stdout());
}

fn run_qtest(
    config: Option<&Path>,
    script: Option<&Path>,
    bufsize: Option<usize>,
) -> Result<bool, String> {
    let config = LabConfig::load(config)?;
    let buffer_size = bufsize.unwrap_or(config.qtest.buffer_size);
    debug!("qtest buffer size {}", buffer_size);

    let stdout = io::stdout();
    let mut session = QtestSession::new(buffer_size, stdout.lock());
    let outcome = match script {
        Some(path) => {
            info!("Running queue script {}", path.display());
            let file = File::open(path)
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            session.run(BufReader::new(file))?
        }
        None => session.run(io::stdin().lock())?,
    };

    println!(
        "{} command(s), {} error(s)",
        outcome.commands, outcome.errors
    );
    Ok(outcome.passed())
}

fn run_btest(
    config: Option<&Path>,
    functions: Vec<String>,
    explicit: &[Option<String>; 3],
    seed: Option<u64>,
    trials: Option<usize>,
    grade: bool,
) -> Result<bool, String> {
    let config = LabConfig::load(config)?;
    let mut options = config.btest.check_options();
    if let Some(seed) = seed {
        options.seed = seed;
    }
    if let Some(trials) = trials {
        options.trials = trials;
    }
    let functions = if functions.is_empty() {
        config.btest.functions
    } else {
        functions
    };

    if explicit.iter().any(Option::is_some) {
        return run_explicit(&functions, explicit);
    }

    let summary = lab_bits::check_all(&functions, &options)?;
    if grade {
        println!("{}", render_total(&summary));
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(summary.all_passed())
}

/// btest -f NAME -1 A [-2 B] [-3 C]
fn run_explicit(functions: &[String], explicit: &[Option<String>; 3]) -> Result<bool, String> {
    let [name] = functions else {
        return Err("Explicit arguments need exactly one -f NAME".to_string());
    };
    let puzzle = lab_bits::find(name).ok_or_else(|| format!("No puzzle named '{}'", name))?;

    let mut args = [0i64; 3];
    for (i, slot) in explicit.iter().enumerate() {
        match slot {
            Some(text) if i < puzzle.arity() => args[i] = parse_arg(text)?,
            Some(_) => {
                return Err(format!(
                    "{} takes {} argument(s), got -{}",
                    puzzle.name,
                    puzzle.arity(),
                    i + 1
                ));
            }
            None if i < puzzle.arity() => {
                return Err(format!("{} needs argument -{}", puzzle.name, i + 1));
            }
            None => {}
        }
    }
    puzzle.validate_args(&args)?;

    let cx = lab_bits::check_args(puzzle, &args);
    println!("{}", render_single(puzzle, &args, cx.as_ref()));
    Ok(cx.is_none())
}
