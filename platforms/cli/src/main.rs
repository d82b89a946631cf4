mod bench;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use multitur::types::DEFAULT_MAX_STEPS;
use multitur::{
    MachineConfig, Outcome, Program, ProgramCatalog, ProgramLoader, RunResult, TapeInput,
    TuringMachine,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a rule set once and print the result on tape 0
    Run(RunArgs),
    /// Time repeated runs of a unary rule set and print CSV rows
    Bench(BenchArgs),
    /// List the built-in rule sets
    List,
}

#[derive(Args)]
struct RunArgs {
    /// A rule-set file, or the name of a built-in rule set
    #[clap(short, long)]
    program: String,

    /// The initial content of each tape, in tape order
    #[clap(short, long)]
    input: Vec<String>,

    /// The initial head position of each tape, in tape order
    #[clap(long = "head", allow_hyphen_values = true)]
    heads: Vec<isize>,

    /// Stop after this many steps
    #[clap(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Write the derivation log to this file
    #[clap(long)]
    trace_out: Option<PathBuf>,

    /// Print the derivation log
    #[clap(short = 'd', long)]
    debug: bool,
}

#[derive(Args)]
struct BenchArgs {
    /// A rule-set file, or the name of a built-in rule set
    #[clap(short, long)]
    program: String,

    /// The largest number of ones on tape 1
    #[clap(long, default_value_t = 40)]
    m_max: usize,

    /// The numbers of ones on tape 2
    #[clap(short, long, num_args = 1.., default_values_t = [0, 5, 10])]
    k: Vec<usize>,

    /// Timed runs per point
    #[clap(long, default_value_t = 15)]
    runs: usize,

    /// Untimed runs per point before timing
    #[clap(long, default_value_t = 3)]
    warmup: usize,

    /// Stop each run after this many steps
    #[clap(long, default_value_t = 400_000)]
    max_steps: usize,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Bench(args) => benchmark(args),
        Command::List => {
            for name in ProgramCatalog::names()? {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

/// Loads a rule set from a file if `source` names one, otherwise from the built-in catalog.
fn load_program(source: &str) -> Result<Arc<Program>> {
    let path = Path::new(source);
    let program = if path.exists() {
        ProgramLoader::load_program(path)
            .with_context(|| format!("failed to load rule set {}", path.display()))?
    } else {
        ProgramCatalog::get(source)
            .with_context(|| format!("'{}' is neither a file nor a built-in rule set", source))?
    };

    Ok(Arc::new(program))
}

/// Pairs the i-th content with the i-th head override.
fn tape_inputs(contents: &[String], heads: &[isize]) -> Vec<TapeInput> {
    (0..contents.len().max(heads.len()))
        .map(|i| TapeInput {
            content: contents.get(i).cloned(),
            head: heads.get(i).copied(),
        })
        .collect()
}

fn run(args: RunArgs) -> Result<()> {
    let program = load_program(&args.program)?;

    let mut config = MachineConfig::for_program(&program);
    config.trace = args.debug || args.trace_out.is_some();

    let mut machine = TuringMachine::new(program, config)?;
    machine
        .load(&tape_inputs(&args.input, &args.heads))
        .context("failed to load tape inputs")?;

    let result = machine.run(args.max_steps);

    if args.debug {
        print!("{}", machine.trace().render());
    }
    if let Some(path) = &args.trace_out {
        machine.trace().export(path)?;
        tracing::info!(path = %path.display(), "derivation log written");
    }

    for line in summary(&machine, &result) {
        println!("{}", line);
    }

    Ok(())
}

/// The lines printed after a run. A rejected run also names the symbols that had no rule.
fn summary(machine: &TuringMachine, result: &RunResult) -> Vec<String> {
    let mut lines = vec![format!("Outcome: {}", result.outcome)];
    if result.outcome == Outcome::Rejected {
        let symbols: Vec<String> = machine.symbols().iter().map(char::to_string).collect();
        lines.push(format!(
            "No transition for state '{}' with symbols ({})",
            machine.state(),
            symbols.join(", ")
        ));
    }
    lines.push(format!("Final state: {}", result.final_state));
    lines.push(format!("Steps: {}", result.steps_taken));
    lines.push(format!("Result: {}", machine.tapes()[0].trimmed()));
    lines
}

fn benchmark(args: BenchArgs) -> Result<()> {
    let program = load_program(&args.program)?;
    tracing::info!(
        program = %program.name,
        m_max = args.m_max,
        k = ?args.k,
        runs = args.runs,
        "starting benchmark"
    );

    let rows = bench::measure(
        &program,
        args.m_max,
        &args.k,
        args.runs,
        args.warmup,
        args.max_steps,
    )?;

    println!("{}", bench::Measurement::CSV_HEADER);
    for row in rows {
        println!("{}", row.to_csv());
    }

    Ok(())
}
