use clap::{Parser as ClapParser, Subcommand};
use std::io;
use std::path::PathBuf;
use suela::Environment;
use suela::cli::{self, CheckOptions, CheckResult, CliError, RunOptions, ScriptSource};

#[derive(ClapParser)]
#[command(name = "suela")]
#[command(about = "Suela - a small embeddable scripting language of function calls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run script files as one program (reads stdin if no file is given)
    Run {
        /// Script files, evaluated in order
        files: Vec<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Evaluate a script given on the command line
    Eval {
        /// The script text
        script: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Only validate syntax, don't execute
    Check {
        /// Script files (reads stdin if none is given)
        files: Vec<PathBuf>,

        /// Print the parsed tree as an S-expression
        #[arg(long)]
        ast: bool,
    },
}

fn main() {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level; warn by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            files,
            json,
            pretty,
        } => read_sources(files).and_then(|sources| run(sources, json, pretty)),
        Commands::Eval {
            script,
            json,
            pretty,
        } => run(vec![ScriptSource::new("<eval>", script)], json, pretty),
        Commands::Check { files, ast } => {
            read_sources(files).and_then(|sources| check(sources, ast))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_sources(files: Vec<PathBuf>) -> Result<Vec<ScriptSource>, CliError> {
    if files.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            return Err(CliError::NoInput);
        }
        return Ok(vec![ScriptSource::from_reader("<stdin>", io::stdin())?]);
    }
    files.iter().map(|path| ScriptSource::from_file(path)).collect()
}

fn run(sources: Vec<ScriptSource>, json: bool, pretty: bool) -> Result<(), CliError> {
    let options = RunOptions {
        sources,
        json,
        pretty,
    };
    let mut env = Environment::with_stdlib();
    let value = cli::execute_run(&options, &mut env)?;
    if json || !value.is_nil() {
        println!("{}", cli::format_output(&value, json, pretty)?);
    }
    Ok(())
}

fn check(sources: Vec<ScriptSource>, show_ast: bool) -> Result<(), CliError> {
    let options = CheckOptions { sources, show_ast };
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Trees(trees) => {
            for tree in trees {
                println!("{}", tree);
            }
        }
    }
    Ok(())
}
