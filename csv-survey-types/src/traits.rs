use crate::{QuestionSpec, ResponseSet, SurveyDefinition, SurveyError, ValidationError};

/// Position of the current question, e.g. question 2 of 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the question being asked.
    pub current: usize,

    /// Number of questions in the survey.
    pub total: usize,
}

/// How a survey session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Every question was answered; the set is finalized and timestamped.
    Completed(ResponseSet),

    /// The user quit. The partial answers are discarded.
    Abandoned { answered: usize },
}

impl SessionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Trait for front-ends that talk to the person taking the survey.
///
/// A backend only presents text and reads raw lines. The question loop,
/// validation and the quit signal are owned by the survey runner, so every
/// backend gets the same behavior.
pub trait SurveyBackend {
    /// Show the survey banner and instructions before the first question.
    fn begin(&mut self, definition: &SurveyDefinition) -> Result<(), SurveyError>;

    /// Present one question and read a single line of raw input.
    ///
    /// Returns `SurveyError::Cancelled` if the user aborted the prompt and
    /// `SurveyError::InputClosed` if there is no more input.
    fn ask(&mut self, question: &QuestionSpec, progress: Progress) -> Result<String, SurveyError>;

    /// Tell the user why the last answer was not accepted.
    fn reject(
        &mut self,
        question: &QuestionSpec,
        error: &ValidationError,
    ) -> Result<(), SurveyError>;

    /// Show the closing message for a finished or abandoned session.
    fn finish(
        &mut self,
        definition: &SurveyDefinition,
        outcome: &SessionOutcome,
    ) -> Result<(), SurveyError>;
}
