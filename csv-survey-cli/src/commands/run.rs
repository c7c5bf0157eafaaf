use std::io::IsTerminal;

use anyhow::Context;
use csv_survey::{
    LineBackend, ResponseCollection, ResponseStore, SessionOutcome, SessionSummary, StoreFormat,
    SurveyBackend, SurveyDefinition, SurveyError, SurveyLoader, SurveyRunner, analyze,
};
use csv_survey_dialoguer::DialoguerBackend;

use crate::cli::RunArgs;
use crate::config::CliConfig;

/// Handle `csv-survey run`.
///
/// An abandoned session is not an error: nothing is saved or analyzed and the
/// command still succeeds.
pub fn handle(args: &RunArgs, config: &CliConfig) -> anyhow::Result<()> {
    let loaded = SurveyLoader::new(config.survey.clone())
        .load_path(&args.survey)
        .with_context(|| format!("failed to load survey '{}'", args.survey.display()))?;
    let definition = &loaded.definition;

    let interactive = !args.plain && std::io::stdin().is_terminal();
    let outcome = if interactive {
        run_session(definition, DialoguerBackend::new())
    } else {
        run_session(definition, LineBackend::stdio())
    };
    let outcome = outcome.context("survey session failed")?;

    let set = match outcome {
        SessionOutcome::Completed(set) => set,
        SessionOutcome::Abandoned { .. } => return Ok(()),
    };

    println!();
    let title = definition.title();
    print!("{}", SessionSummary::new(&title, &set));

    let mut collection = ResponseCollection::new();
    collection.push(set)?;

    if !args.no_save {
        let format = args.format.map_or(config.output.format, StoreFormat::from);
        let store = ResponseStore::new(&config.output.directory, format);
        match store.persist(&definition.name, &collection, args.output.as_deref()) {
            Ok(path) => println!("\nResponses saved to: {}", path.display()),
            Err(error) => {
                tracing::error!(%error, "failed to save responses");
                eprintln!("Failed to save responses: {error}");
            }
        }
    }

    if !args.no_analysis {
        println!();
        print!("{}", analyze(definition.questions(), &collection));
    }
    Ok(())
}

fn run_session<B: SurveyBackend>(
    definition: &SurveyDefinition,
    backend: B,
) -> Result<SessionOutcome, SurveyError> {
    SurveyRunner::new(definition, backend).run()
}
