use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use csv_survey::StoreFormat;

/// Top-level CLI parser for the `csv-survey` binary.
#[derive(Debug, Parser)]
#[command(
    name = "csv-survey",
    version,
    about = "Run console surveys defined in CSV files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./csv-survey.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Take a survey and save the answers
    Run(RunArgs),

    /// Print statistics for previously saved responses
    Analyze(AnalyzeArgs),

    /// Write a sample survey file to start from
    Sample(SampleArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Survey definition (CSV)
    pub survey: PathBuf,

    /// Where to save responses (default: timestamped file in the output directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Response file format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Do not save responses
    #[arg(long)]
    pub no_save: bool,

    /// Do not print the analysis after the survey
    #[arg(long)]
    pub no_analysis: bool,

    /// Use plain line prompts even on a terminal
    #[arg(long)]
    pub plain: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Survey definition (CSV) the responses were collected with
    pub survey: PathBuf,

    /// One or more response files (.json or .csv)
    #[arg(required = true)]
    pub responses: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Where to write the sample survey
    #[arg(default_value = "sample_survey.csv")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for StoreFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
        }
    }
}
