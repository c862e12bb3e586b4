// src/bin/chainscript.rs
//! Command-line host: feeds a source file to a session and prints what it says

use std::path::PathBuf;
use std::process;

use chainscript::{parser, LedgerConfig, Session};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chainscript", version, about = "Block schema language and proof-of-work ledger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program against a fresh ledger
    Run(RunArgs),

    /// Lex and parse only; report diagnostics without executing
    Check {
        /// Source file
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Source file
    file: PathBuf,

    /// JSON config file (otherwise CHAINSCRIPT_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leading zeros required by mining
    #[arg(short, long)]
    difficulty: Option<usize>,

    /// Give up mining a block after this many nonces
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Export destination
    #[arg(long)]
    export_path: Option<PathBuf>,

    /// Export the ledger after the run
    #[arg(long)]
    export: bool,

    /// Print the chain snapshot as JSON after the transcript
    #[arg(long)]
    chain: bool,
}

fn main() {
    let filter = EnvFilter::try_from_env("CHAINSCRIPT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Command::Run(args) => do_run(args),
        Command::Check { file } => do_check(&file),
    };

    process::exit(code);
}

fn read_source(file: &PathBuf) -> Option<String> {
    match std::fs::read_to_string(file) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file.display(), e);
            None
        }
    }
}

fn load_config(args: &RunArgs) -> Result<LedgerConfig, chainscript::ConfigError> {
    let mut config = match &args.config {
        Some(path) => LedgerConfig::from_json_file(path)?,
        None => LedgerConfig::from_env()?,
    };

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(attempts) = args.max_attempts {
        config.max_mining_attempts = Some(attempts);
    }
    if let Some(path) = &args.export_path {
        config.export_path = path.clone();
    }

    Ok(config)
}

fn do_run(args: RunArgs) -> i32 {
    let Some(source) = read_source(&args.file) else {
        return 1;
    };

    let session = load_config(&args).and_then(Session::with_config);
    let mut session = match session {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let output = session.run(&source);
    print!("{}", output.transcript);

    if args.chain {
        match session.chain_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        }
    }

    if args.export {
        match session.export() {
            Ok(path) => eprintln!("exported to {}", path.display()),
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        }
    }

    0
}

fn do_check(file: &PathBuf) -> i32 {
    let Some(source) = read_source(file) else {
        return 1;
    };

    let report = parser::parse(&source);
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }

    if report.is_clean() {
        println!("ok: {} statements", report.statements.len());
        0
    } else {
        1
    }
}
