use clap::Parser;

mod cli;
mod commands;
mod config;

fn main() {
    if let Err(error) = run() {
        eprintln!("csv-survey error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::CliConfig::load(cli.config.as_deref())?;
    init_tracing(cli.quiet, cli.verbose, &config.log.level)?;

    tracing::debug!(?config, "configuration loaded");
    commands::dispatch(cli.command, &config)
}

/// Logs go to stderr so prompts and reports on stdout stay clean.
fn init_tracing(quiet: bool, verbose: bool, configured: &str) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured
    };

    let filter = match tracing_subscriber::EnvFilter::try_from_env("CSV_SURVEY_LOG") {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(level)
            .map_err(|error| anyhow::anyhow!("invalid log level '{level}': {error}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
