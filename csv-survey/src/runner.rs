//! The question/answer loop for one survey session.

use crate::validate::validate_and_normalize;
use crate::{
    NormalizedResponse, Progress, QuestionKind, ResponseSet, SessionOutcome, SurveyBackend,
    SurveyDefinition, SurveyError,
};

/// Typing this (case-insensitive) at any prompt abandons the session.
pub const QUIT_SIGNAL: &str = "quit";

/// Where a runner is in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,

    /// Waiting for an acceptable answer to the question at this index.
    Asking(usize),

    Completed,

    Abandoned,
}

impl RunnerState {
    /// Check if the session has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

/// Drives a single session: asks every question in order, re-asking until
/// each answer validates, and produces the finished `ResponseSet`.
///
/// Questions are never skipped or reordered, except that an empty answer to
/// an optional non-text question leaves it unanswered.
pub struct SurveyRunner<'a, B> {
    definition: &'a SurveyDefinition,
    backend: B,
    state: RunnerState,
    responses: ResponseSet,
}

impl<'a, B: SurveyBackend> SurveyRunner<'a, B> {
    /// Create a runner for a survey; nothing is shown until the first step.
    pub fn new(definition: &'a SurveyDefinition, backend: B) -> Self {
        Self {
            definition,
            backend,
            state: RunnerState::NotStarted,
            responses: ResponseSet::new(),
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Answers recorded so far.
    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Run the session to completion or abandonment.
    ///
    /// Backend failures other than cancellation are returned as errors; the
    /// session cannot continue after them.
    pub fn run(&mut self) -> Result<SessionOutcome, SurveyError> {
        while !self.state.is_terminal() {
            self.step()?;
        }

        let outcome = match self.state {
            RunnerState::Completed => SessionOutcome::Completed(self.responses.clone()),
            _ => SessionOutcome::Abandoned {
                answered: self.responses.len(),
            },
        };
        self.backend.finish(self.definition, &outcome)?;
        Ok(outcome)
    }

    /// Advance the session by one action: show the banner, or read and check
    /// one answer. Returns the new state.
    pub fn step(&mut self) -> Result<RunnerState, SurveyError> {
        match self.state {
            RunnerState::NotStarted => {
                self.backend.begin(self.definition)?;
                if self.definition.is_empty() {
                    self.complete()?;
                } else {
                    self.state = RunnerState::Asking(0);
                }
            }
            RunnerState::Asking(index) => self.ask(index)?,
            RunnerState::Completed | RunnerState::Abandoned => {}
        }
        Ok(self.state)
    }

    fn ask(&mut self, index: usize) -> Result<(), SurveyError> {
        let definition = self.definition;
        let question = &definition.questions()[index];
        let progress = Progress {
            current: index + 1,
            total: definition.len(),
        };

        let raw = match self.backend.ask(question, progress) {
            Ok(raw) => raw,
            Err(SurveyError::Cancelled) => {
                self.abandon();
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if raw.trim().eq_ignore_ascii_case(QUIT_SIGNAL) {
            self.abandon();
            return Ok(());
        }

        if raw.trim().is_empty()
            && !question.is_required()
            && !matches!(question.kind(), QuestionKind::Text)
        {
            tracing::debug!(question_id = question.id(), "optional question skipped");
            return self.advance(index);
        }

        match validate_and_normalize(question, &raw) {
            Ok(value) => {
                tracing::debug!(question_id = question.id(), %value, "answer accepted");
                self.responses
                    .insert(NormalizedResponse::new(question, value))
                    .map_err(SurveyError::backend)?;
                self.advance(index)
            }
            Err(err) => {
                tracing::debug!(question_id = question.id(), reason = %err, "answer rejected");
                self.backend.reject(question, &err)
            }
        }
    }

    fn advance(&mut self, index: usize) -> Result<(), SurveyError> {
        if index + 1 < self.definition.len() {
            self.state = RunnerState::Asking(index + 1);
            Ok(())
        } else {
            self.complete()
        }
    }

    fn complete(&mut self) -> Result<(), SurveyError> {
        self.responses.complete().map_err(SurveyError::backend)?;
        self.state = RunnerState::Completed;
        tracing::info!(
            survey = %self.definition.name,
            answers = self.responses.len(),
            "survey completed"
        );
        Ok(())
    }

    fn abandon(&mut self) {
        self.responses.abandon();
        self.state = RunnerState::Abandoned;
        tracing::info!(
            survey = %self.definition.name,
            answered = self.responses.len(),
            "survey abandoned"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChoiceQuestion, NumberQuestion, QuestionSpec, ResponseValue, TestBackend, ValidationError,
    };

    fn definition() -> SurveyDefinition {
        SurveyDefinition::new(
            "runner",
            vec![
                QuestionSpec::new(
                    "q1",
                    "Rate us",
                    QuestionKind::Number(NumberQuestion::rating(1, 10)),
                    true,
                )
                .unwrap(),
                QuestionSpec::new(
                    "q2",
                    "Pick one",
                    QuestionKind::MultipleChoice(
                        ChoiceQuestion::new(vec!["A".into(), "B".into(), "C".into()]).unwrap(),
                    ),
                    true,
                )
                .unwrap(),
                QuestionSpec::new("q3", "Recommend?", QuestionKind::YesNo, true).unwrap(),
            ],
        )
    }

    #[test]
    fn steps_through_states() {
        let survey = definition();
        let mut runner = SurveyRunner::new(&survey, TestBackend::new(["5", "x", "2", "yes"]));

        assert_eq!(runner.state(), RunnerState::NotStarted);
        assert_eq!(runner.step().unwrap(), RunnerState::Asking(0));
        assert_eq!(runner.step().unwrap(), RunnerState::Asking(1));
        // Rejected answer keeps the same question.
        assert_eq!(runner.step().unwrap(), RunnerState::Asking(1));
        assert_eq!(runner.step().unwrap(), RunnerState::Asking(2));
        assert_eq!(runner.step().unwrap(), RunnerState::Completed);
        assert_eq!(runner.step().unwrap(), RunnerState::Completed);

        assert!(runner.responses().is_completed());
        assert_eq!(
            runner.backend().rejections(),
            [("q2".to_string(), ValidationError::InvalidChoice { count: 3 })]
        );
    }

    #[test]
    fn quit_is_case_insensitive() {
        let survey = definition();
        let mut runner = SurveyRunner::new(&survey, TestBackend::new(["7", " QUIT "]));

        let outcome = runner.run().unwrap();
        assert_eq!(outcome, SessionOutcome::Abandoned { answered: 1 });
        assert_eq!(runner.state(), RunnerState::Abandoned);
    }

    #[test]
    fn cancellation_abandons_the_session() {
        let survey = definition();
        let backend = TestBackend::new(["7"]).cancel_after_script();
        let outcome = SurveyRunner::new(&survey, backend).run().unwrap();
        assert_eq!(outcome, SessionOutcome::Abandoned { answered: 1 });
    }

    #[test]
    fn closed_input_is_an_error() {
        let survey = definition();
        let result = SurveyRunner::new(&survey, TestBackend::new(["7"])).run();
        assert!(matches!(result, Err(SurveyError::InputClosed)));
    }

    #[test]
    fn optional_non_text_question_can_be_skipped() {
        let survey = SurveyDefinition::new(
            "optional",
            vec![
                QuestionSpec::new(
                    "age",
                    "Age?",
                    QuestionKind::Number(NumberQuestion::free()),
                    false,
                )
                .unwrap(),
                QuestionSpec::new("notes", "Notes?", QuestionKind::Text, false).unwrap(),
            ],
        );

        let outcome = SurveyRunner::new(&survey, TestBackend::new(["", ""]))
            .run()
            .unwrap();
        let SessionOutcome::Completed(set) = outcome else {
            panic!("expected completion");
        };
        assert!(!set.contains("age"));
        assert_eq!(set.value("notes"), Some(&ResponseValue::Text(String::new())));
    }

    #[test]
    fn empty_survey_completes_immediately() {
        let survey = SurveyDefinition::new("empty", Vec::new());
        let outcome = SurveyRunner::new(&survey, TestBackend::new(Vec::<String>::new()))
            .run()
            .unwrap();
        assert!(outcome.is_completed());
    }
}
