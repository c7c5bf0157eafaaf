/// Error type for running a survey session.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// User cancelled the survey (Ctrl+C, Escape, etc.)
    #[error("Survey cancelled by user")]
    Cancelled,

    /// The input stream ended before the survey was finished.
    #[error("Input closed before the survey was finished")]
    InputClosed,

    /// Backend-specific failure (I/O, terminal errors, etc.)
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl SurveyError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this error represents user cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Why an answer was not accepted.
///
/// Rejections are never fatal: the runner shows the message and asks the
/// same question again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("This question is required. Please provide an answer.")]
    Empty,

    #[error("Please enter a valid number.")]
    NotANumber,

    #[error("Please enter a whole number between {min} and {max}.")]
    OutOfRange { min: i64, max: i64 },

    #[error("Invalid choice. Enter a number from 1 to {count} or the exact option text.")]
    InvalidChoice { count: usize },

    #[error("Please answer 'yes' or 'no' (or 'y' / 'n').")]
    InvalidYesNo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(SurveyError::Cancelled.to_string(), "Survey cancelled by user");
        assert_eq!(
            ValidationError::OutOfRange { min: 1, max: 10 }.to_string(),
            "Please enter a whole number between 1 and 10."
        );
        assert!(SurveyError::backend(anyhow::anyhow!("boom")).to_string().contains("boom"));
    }
}
