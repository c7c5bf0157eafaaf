//! Plain line-oriented prompts over any reader/writer pair.
//!
//! Used when input is piped or no terminal is attached, where interactive
//! widgets are unavailable.

use std::io::{self, BufRead, Write};

use crate::validate::instructions;
use crate::{
    Progress, QuestionSpec, SessionOutcome, SurveyBackend, SurveyDefinition, SurveyError,
    ValidationError,
};

const RULE_WIDTH: usize = 60;

/// Backend that prints prompts to `W` and reads answers line by line from `R`.
#[derive(Debug)]
pub struct LineBackend<R, W> {
    input: R,
    output: W,
}

impl LineBackend<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout and read from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineBackend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_lines<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), SurveyError> {
        for line in lines {
            writeln!(self.output, "{line}").map_err(SurveyError::backend)?;
        }
        self.output.flush().map_err(SurveyError::backend)
    }
}

impl<R: BufRead, W: Write> SurveyBackend for LineBackend<R, W> {
    fn begin(&mut self, definition: &SurveyDefinition) -> Result<(), SurveyError> {
        let rule = "=".repeat(RULE_WIDTH);
        let title = format!("  {}", definition.title());
        self.write_lines([rule.as_str(), title.as_str(), rule.as_str()])?;
        if let Some(prelude) = &definition.prelude {
            self.write_lines(prelude.lines())?;
        }
        self.write_lines(["-".repeat(RULE_WIDTH).as_str(), ""])
    }

    fn ask(&mut self, question: &QuestionSpec, progress: Progress) -> Result<String, SurveyError> {
        let header = format!("[{}/{}] {}", progress.current, progress.total, question.text());
        let hints = instructions(question);
        self.write_lines(std::iter::once(header.as_str()).chain(hints.iter().map(String::as_str)))?;
        write!(self.output, "> ").map_err(SurveyError::backend)?;
        self.output.flush().map_err(SurveyError::backend)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(SurveyError::backend)?;
        if read == 0 {
            return Err(SurveyError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn reject(
        &mut self,
        _question: &QuestionSpec,
        error: &ValidationError,
    ) -> Result<(), SurveyError> {
        let message = format!("Error: {error}");
        self.write_lines([message.as_str(), ""])
    }

    fn finish(
        &mut self,
        definition: &SurveyDefinition,
        outcome: &SessionOutcome,
    ) -> Result<(), SurveyError> {
        match outcome {
            SessionOutcome::Completed(_) => {
                let rule = "=".repeat(RULE_WIDTH);
                let epilogue = definition.epilogue.as_deref().unwrap_or_default();
                self.write_lines(["", rule.as_str(), epilogue, rule.as_str()])
            }
            SessionOutcome::Abandoned { .. } => {
                self.write_lines(["", "Survey cancelled by user."])
            }
        }
    }
}
