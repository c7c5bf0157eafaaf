//! Dialoguer backend implementation for SurveyBackend trait.

use csv_survey::runner::QUIT_SIGNAL;
use csv_survey::{
    Progress, QuestionKind, QuestionSpec, SessionOutcome, SurveyBackend, SurveyDefinition,
    SurveyError, ValidationError, instructions,
};
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Input, Select};
use thiserror::Error;

const RULE_WIDTH: usize = 60;

/// Extra last item of every selection list.
const QUIT_ITEM: &str = "Quit survey";

/// Error type for the Dialoguer backend.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the prompt (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

impl From<DialoguerError> for SurveyError {
    fn from(err: DialoguerError) -> Self {
        match err {
            DialoguerError::Cancelled => SurveyError::Cancelled,
            other => SurveyError::backend(other),
        }
    }
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

/// The raw answer for a selected list entry: the matching entry of
/// `answers`, or the quit signal for the trailing quit item.
fn selection_answer(answers: &[String], index: usize) -> String {
    answers
        .get(index)
        .cloned()
        .unwrap_or_else(|| QUIT_SIGNAL.to_string())
}

fn prompt_error(err: dialoguer::Error) -> DialoguerError {
    if is_cancelled(&err) {
        DialoguerError::Cancelled
    } else {
        DialoguerError::Dialoguer(err)
    }
}

/// Dialoguer backend for interactive terminal prompts.
///
/// Required multiple choice and yes/no questions are shown as selection
/// lists ending in a quit item; everything else is a line of text checked by
/// the survey runner.
#[derive(Debug, Default, Clone)]
pub struct DialoguerBackend {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerBackend {
    /// Create a new Dialoguer backend with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a backend with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Show `items` plus the quit item and return the raw answer for the
    /// choice, taken from the parallel `answers` list.
    fn ask_select(
        &self,
        prompt: &str,
        items: &[String],
        answers: &[String],
    ) -> Result<String, DialoguerError> {
        let theme = self.theme();
        let selection = Select::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .items(items)
            .item(QUIT_ITEM)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        match selection {
            Some(index) => Ok(selection_answer(answers, index)),
            None => Err(DialoguerError::Cancelled),
        }
    }

    fn ask_input(&self, prompt: &str, question: &QuestionSpec) -> Result<String, DialoguerError> {
        for line in instructions(question) {
            println!("{line}");
        }

        let theme = self.theme();
        Input::<String>::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)
    }
}

impl SurveyBackend for DialoguerBackend {
    fn begin(&mut self, definition: &SurveyDefinition) -> Result<(), SurveyError> {
        let rule = "=".repeat(RULE_WIDTH);
        println!("{rule}");
        println!("  {}", definition.title());
        println!("{rule}");
        if let Some(prelude) = &definition.prelude {
            println!("{prelude}");
        }
        println!("{}", "-".repeat(RULE_WIDTH));
        Ok(())
    }

    fn ask(&mut self, question: &QuestionSpec, progress: Progress) -> Result<String, SurveyError> {
        let prompt = format!(
            "[{}/{}] {}",
            progress.current,
            progress.total,
            question.text()
        );
        println!();

        let answer = match question.kind() {
            QuestionKind::MultipleChoice(choice) if question.is_required() => {
                // The runner resolves 1-based option numbers.
                let numbers: Vec<String> =
                    (1..=choice.options().len()).map(|n| n.to_string()).collect();
                self.ask_select(&prompt, choice.options(), &numbers)
            }
            QuestionKind::YesNo if question.is_required() => self.ask_select(
                &prompt,
                &["Yes".to_string(), "No".to_string()],
                &["yes".to_string(), "no".to_string()],
            ),
            _ => self.ask_input(&prompt, question),
        };
        Ok(answer?)
    }

    fn reject(
        &mut self,
        _question: &QuestionSpec,
        error: &ValidationError,
    ) -> Result<(), SurveyError> {
        println!("Error: {error}");
        Ok(())
    }

    fn finish(
        &mut self,
        definition: &SurveyDefinition,
        outcome: &SessionOutcome,
    ) -> Result<(), SurveyError> {
        println!();
        match outcome {
            SessionOutcome::Completed(_) => {
                if let Some(epilogue) = &definition.epilogue {
                    println!("{epilogue}");
                }
            }
            SessionOutcome::Abandoned { .. } => println!("Survey cancelled by user."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_creation() {
        let _backend = DialoguerBackend::new();
        let _plain = DialoguerBackend::plain();
    }

    #[test]
    fn error_types() {
        let err = DialoguerError::Cancelled;
        assert_eq!(err.to_string(), "Survey cancelled by user");
    }

    #[test]
    fn selection_maps_to_raw_answers() {
        let answers = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert_eq!(selection_answer(&answers, 0), "1");
        assert_eq!(selection_answer(&answers, 2), "3");
        // The trailing quit item sits right after the last answer.
        assert_eq!(selection_answer(&answers, 3), QUIT_SIGNAL);

        let yes_no = vec!["yes".to_string(), "no".to_string()];
        assert_eq!(selection_answer(&yes_no, 1), "no");
        assert_eq!(selection_answer(&yes_no, 2), QUIT_SIGNAL);
    }

    #[test]
    fn interrupted_prompt_is_cancellation() {
        let interrupted = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(is_cancelled(&interrupted));
        assert!(SurveyError::from(prompt_error(interrupted)).is_cancelled());

        let broken = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(!is_cancelled(&broken));
        assert!(matches!(
            SurveyError::from(prompt_error(broken)),
            SurveyError::Backend(_)
        ));
    }
}
