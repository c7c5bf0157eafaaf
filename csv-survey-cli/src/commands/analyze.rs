use anyhow::Context;
use csv_survey::{ResponseStore, SurveyLoader, analyze};

use crate::cli::AnalyzeArgs;
use crate::config::CliConfig;

/// Handle `csv-survey analyze`.
pub fn handle(args: &AnalyzeArgs, config: &CliConfig) -> anyhow::Result<()> {
    let loaded = SurveyLoader::new(config.survey.clone())
        .load_path(&args.survey)
        .with_context(|| format!("failed to load survey '{}'", args.survey.display()))?;

    let collection = ResponseStore::load_many(&args.responses)
        .context("failed to load saved responses")?;

    let definition = &loaded.definition;
    println!("Survey: {}", definition.title());
    print!("{}", analyze(definition.questions(), &collection));
    Ok(())
}
