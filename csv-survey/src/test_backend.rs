//! Test backend for running surveys without user interaction.
//!
//! `TestBackend` feeds a fixed script of raw answers to the runner and records
//! what it was asked, so tests can assert on prompts and rejections.
//!
//! # Example
//!
//! ```rust
//! use csv_survey::{SessionOutcome, SurveyLoader, SurveyRunner, TestBackend};
//!
//! let csv = "question_id,question_text,question_type\nname,Your name?,text\n";
//! let survey = SurveyLoader::default().load_str("demo", csv).unwrap().definition;
//!
//! let outcome = SurveyRunner::new(&survey, TestBackend::new(["Alice"]))
//!     .run()
//!     .unwrap();
//!
//! let SessionOutcome::Completed(answers) = outcome else { panic!() };
//! assert_eq!(answers.value("name").unwrap().to_string(), "Alice");
//! ```

use std::collections::VecDeque;

use crate::{
    Progress, QuestionSpec, SessionOutcome, SurveyBackend, SurveyDefinition, SurveyError,
    ValidationError,
};

/// A backend that answers from a pre-configured script.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    script: VecDeque<String>,
    cancel_when_exhausted: bool,
    asked: Vec<(String, Progress)>,
    rejections: Vec<(String, ValidationError)>,
    finished: Option<SessionOutcome>,
}

impl TestBackend {
    /// Create a backend that answers with `answers`, one per prompt.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Behave like a user pressing Ctrl+C once the script runs out, instead
    /// of reporting closed input.
    pub fn cancel_after_script(mut self) -> Self {
        self.cancel_when_exhausted = true;
        self
    }

    /// Question ids in the order they were asked (including repeats).
    pub fn asked(&self) -> &[(String, Progress)] {
        &self.asked
    }

    /// Rejected answers, keyed by question id.
    pub fn rejections(&self) -> &[(String, ValidationError)] {
        &self.rejections
    }

    /// The outcome passed to `finish`, if the session ended.
    pub fn finished(&self) -> Option<&SessionOutcome> {
        self.finished.as_ref()
    }

    /// Answers not consumed by the session.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SurveyBackend for TestBackend {
    fn begin(&mut self, _definition: &SurveyDefinition) -> Result<(), SurveyError> {
        Ok(())
    }

    fn ask(&mut self, question: &QuestionSpec, progress: Progress) -> Result<String, SurveyError> {
        self.asked.push((question.id().to_string(), progress));
        match self.script.pop_front() {
            Some(answer) => Ok(answer),
            None if self.cancel_when_exhausted => Err(SurveyError::Cancelled),
            None => Err(SurveyError::InputClosed),
        }
    }

    fn reject(
        &mut self,
        question: &QuestionSpec,
        error: &ValidationError,
    ) -> Result<(), SurveyError> {
        self.rejections
            .push((question.id().to_string(), error.clone()));
        Ok(())
    }

    fn finish(
        &mut self,
        _definition: &SurveyDefinition,
        outcome: &SessionOutcome,
    ) -> Result<(), SurveyError> {
        self.finished = Some(outcome.clone());
        Ok(())
    }
}
