//! operon-flank - main entry point

use clap::Parser;
use flank_cli::logging::{init_logging, LogConfig};
use flank_cli::{Cli, Settings};
use std::process;

fn main() {
    // Values from a local .env become visible to clap's env fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_config = LogConfig::from_env()
        .unwrap_or_else(|e| {
            eprintln!("Warning: ignoring logging environment: {:#}", e);
            LogConfig::default()
        })
        .with_verbosity(cli.verbose);

    // The run does not depend on logging being available
    let _ = init_logging(&log_config);

    let result = Settings::load(&cli).and_then(|settings| flank_cli::run(&settings));

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
