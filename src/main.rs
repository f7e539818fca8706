//! docvet CLI entry point.

use clap::Parser;
use docvet::cli::{self, Cli, Commands, EXIT_ERROR};
use docvet::detect::Check;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Commands::Check(args) => cli::run_check(&Check::ALL, args),
        Commands::Enrichment(args) => cli::run_check(&[Check::Enrichment], args),
        Commands::Freshness(args) => cli::run_check(&[Check::Freshness], args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

/// Log to stderr at `warn`, or `debug` with `--verbose`. `RUST_LOG` wins.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
