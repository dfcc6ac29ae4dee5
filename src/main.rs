use clap::Parser;
use tracing_subscriber::EnvFilter;

use ir_classifier::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ir_classifier=debug,info")
    } else {
        EnvFilter::new("ir_classifier=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Classify(args) => {
            cli::classify::run(args, cli.format)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format)?;
        }
    }

    Ok(())
}
