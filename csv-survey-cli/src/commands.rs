pub mod analyze;
pub mod run;
pub mod sample;

use crate::cli::Commands;
use crate::config::CliConfig;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, config: &CliConfig) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::handle(&args, config),
        Commands::Analyze(args) => analyze::handle(&args, config),
        Commands::Sample(args) => sample::handle(&args),
    }
}
