use clap::{Parser as ClapParser, Subcommand};
use rowql::cli::{self, CliError, RunOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "rowql")]
#[command(about = "rowql - SQL-like SELECT queries over JSON arrays of records")]
#[command(version)]
struct Cli {
    /// Log parsing and execution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query against JSON input
    Run {
        /// The query to execute
        query: String,

        /// JSON array input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Make AND bind tighter than OR
        #[arg(long)]
        standard_precedence: bool,
    },

    /// Only validate query syntax
    Check {
        /// The query to validate
        query: String,

        /// Make AND bind tighter than OR
        #[arg(long)]
        standard_precedence: bool,
    },

    /// Show the query grammar
    Grammar,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module("rowql", log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            query,
            input,
            pretty,
            standard_precedence,
        } => run_query(query, input, pretty, standard_precedence),
        Commands::Check {
            query,
            standard_precedence,
        } => cli::execute_check(&query, standard_precedence).map(|_| println!("Syntax is valid")),
        Commands::Grammar => {
            print!("{}", cli::grammar_reference());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_query(
    query: String,
    input: Option<String>,
    pretty: bool,
    standard_precedence: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RunOptions {
        query,
        input,
        standard_precedence,
    };

    let output = cli::execute_run(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
