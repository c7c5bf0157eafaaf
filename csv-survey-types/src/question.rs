use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error raised when a question definition violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("question id must not be empty")]
    EmptyId,

    #[error("question text must not be empty")]
    EmptyText,

    #[error("multiple choice question needs at least one option")]
    NoOptions,
}

/// The value of a `question_type` column did not name a known type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown question type '{0}'")]
pub struct UnknownQuestionType(pub String);

/// The question type vocabulary used in survey files and stored responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Number,
    Rating,
    MultipleChoice,
    YesNo,
}

impl QuestionType {
    /// The name used in survey files, e.g. `multiple_choice`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Rating => "rating",
            Self::MultipleChoice => "multiple_choice",
            Self::YesNo => "yes_no",
        }
    }

    /// Human-readable label, e.g. `Multiple Choice`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Rating => "Rating",
            Self::MultipleChoice => "Multiple Choice",
            Self::YesNo => "Yes/No",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "rating" => Ok(Self::Rating),
            "multiple_choice" => Ok(Self::MultipleChoice),
            "yes_no" => Ok(Self::YesNo),
            _ => Err(UnknownQuestionType(s.trim().to_string())),
        }
    }
}

/// A single survey question.
///
/// Questions are immutable once constructed; a `SurveyDefinition` owns them
/// in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSpec {
    /// Key of this question's answer in a `ResponseSet`.
    id: String,

    /// The prompt text shown to the user.
    text: String,

    /// The kind of question (determines validation, rendering and statistics).
    kind: QuestionKind,

    /// Whether an answer must be given.
    required: bool,
}

impl QuestionSpec {
    /// Create a new question, checking that id and text are non-empty.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionKind,
        required: bool,
    ) -> Result<Self, SpecError> {
        let id = id.into().trim().to_string();
        let text = text.into().trim().to_string();

        if id.is_empty() {
            return Err(SpecError::EmptyId);
        }
        if text.is_empty() {
            return Err(SpecError::EmptyText);
        }

        Ok(Self {
            id,
            text,
            kind,
            required,
        })
    }

    /// Get the question id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Whether the question must be answered.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The file-level type tag of this question.
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }
}

/// The kind of question, determining validation and aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Free text input.
    Text,

    /// Numeric input, either free-form or a bounded integer rating.
    Number(NumberQuestion),

    /// Pick exactly one of a fixed list of options.
    MultipleChoice(ChoiceQuestion),

    /// Yes/no answer.
    YesNo,
}

impl QuestionKind {
    /// Build the kind for a type tag.
    ///
    /// `options` is only consulted for multiple choice questions; `rating_range`
    /// only for ratings.
    pub fn from_type(
        question_type: QuestionType,
        options: Vec<String>,
        rating_range: (i64, i64),
    ) -> Result<Self, SpecError> {
        Ok(match question_type {
            QuestionType::Text => Self::Text,
            QuestionType::Number => Self::Number(NumberQuestion::free()),
            QuestionType::Rating => {
                Self::Number(NumberQuestion::rating(rating_range.0, rating_range.1))
            }
            QuestionType::MultipleChoice => Self::MultipleChoice(ChoiceQuestion::new(options)?),
            QuestionType::YesNo => Self::YesNo,
        })
    }

    /// The file-level type tag for this kind.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text => QuestionType::Text,
            Self::Number(number) if number.is_rating() => QuestionType::Rating,
            Self::Number(_) => QuestionType::Number,
            Self::MultipleChoice(_) => QuestionType::MultipleChoice,
            Self::YesNo => QuestionType::YesNo,
        }
    }
}

/// How numeric answers are constrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberScale {
    /// Any finite number.
    Free,

    /// An integer within an inclusive range.
    Rating { min: i64, max: i64 },
}

/// Configuration for a numeric question.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberQuestion {
    pub scale: NumberScale,
}

impl NumberQuestion {
    /// A numeric question accepting any finite number.
    pub fn free() -> Self {
        Self {
            scale: NumberScale::Free,
        }
    }

    /// A rating question accepting integers in `min..=max`.
    pub fn rating(min: i64, max: i64) -> Self {
        Self {
            scale: NumberScale::Rating { min, max },
        }
    }

    /// Check if this is a rating-style question.
    pub fn is_rating(&self) -> bool {
        matches!(self.scale, NumberScale::Rating { .. })
    }
}

/// Configuration for a multiple choice question.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceQuestion {
    options: Vec<String>,
}

impl ChoiceQuestion {
    /// Create a choice question; there must be at least one option.
    pub fn new(options: Vec<String>) -> Result<Self, SpecError> {
        if options.is_empty() {
            return Err(SpecError::NoOptions);
        }
        Ok(Self { options })
    }

    /// Get the options in presentation order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Resolve a 1-based option number.
    pub fn by_number(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }

    /// Find an option by its exact (case-sensitive) text.
    pub fn by_text(&self, text: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.as_str() == text)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_parses_case_insensitively() {
        assert_eq!(
            " Multiple_Choice ".parse::<QuestionType>(),
            Ok(QuestionType::MultipleChoice)
        );
        assert_eq!("RATING".parse::<QuestionType>(), Ok(QuestionType::Rating));
        assert_eq!(
            "slider".parse::<QuestionType>(),
            Err(UnknownQuestionType("slider".to_string()))
        );
    }

    #[test]
    fn multiple_choice_without_options_is_rejected() {
        let result = QuestionKind::from_type(QuestionType::MultipleChoice, Vec::new(), (1, 10));
        assert_eq!(result, Err(SpecError::NoOptions));
    }

    #[test]
    fn empty_id_or_text_is_rejected() {
        assert_eq!(
            QuestionSpec::new("  ", "Rate us", QuestionKind::Text, true),
            Err(SpecError::EmptyId)
        );
        assert_eq!(
            QuestionSpec::new("q1", "", QuestionKind::Text, true),
            Err(SpecError::EmptyText)
        );
    }

    #[test]
    fn rating_kind_reports_rating_type() {
        let kind = QuestionKind::from_type(QuestionType::Rating, Vec::new(), (1, 10)).unwrap();
        assert_eq!(kind.question_type(), QuestionType::Rating);
        assert_eq!(
            kind,
            QuestionKind::Number(NumberQuestion {
                scale: NumberScale::Rating { min: 1, max: 10 }
            })
        );
    }

    #[test]
    fn choice_lookup_by_number_and_text() {
        let choice = ChoiceQuestion::new(vec!["A".into(), "B".into(), "C".into()]).unwrap();
        assert_eq!(choice.by_number(2), Some("B"));
        assert_eq!(choice.by_number(0), None);
        assert_eq!(choice.by_number(4), None);
        assert_eq!(choice.by_text("C"), Some("C"));
        assert_eq!(choice.by_text("c"), None);
    }
}
