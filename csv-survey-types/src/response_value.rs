use std::fmt;

use crate::{QuestionSpec, QuestionType};

/// A stored answer could not be read back for its question type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a valid {question_type} answer")]
pub struct StoredValueError {
    pub question_type: QuestionType,
    pub raw: String,
}

/// A validated, type-coerced answer value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// Free text (trimmed).
    Text(String),

    /// A numeric answer (number and rating questions).
    Number(f64),

    /// The selected option of a multiple choice question.
    Choice(String),

    /// A yes/no answer; `true` is "Yes".
    YesNo(bool),
}

impl ResponseValue {
    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as a yes/no flag.
    pub fn as_yes_no(&self) -> Option<bool> {
        match self {
            Self::YesNo(b) => Some(*b),
            _ => None,
        }
    }

    /// Rebuild a value from its stored (displayed) form.
    ///
    /// This is the inverse of the `Display` impl for values that were produced
    /// by a question of `question_type`.
    pub fn from_stored(question_type: QuestionType, raw: &str) -> Result<Self, StoredValueError> {
        let invalid = || StoredValueError {
            question_type,
            raw: raw.to_string(),
        };

        match question_type {
            QuestionType::Text => Ok(Self::Text(raw.to_string())),
            QuestionType::Number | QuestionType::Rating => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(invalid),
            QuestionType::MultipleChoice => Ok(Self::Choice(raw.to_string())),
            QuestionType::YesNo => match raw.trim() {
                "Yes" => Ok(Self::YesNo(true)),
                "No" => Ok(Self::YesNo(false)),
                _ => Err(invalid()),
            },
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Choice(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::YesNo(true) => f.write_str("Yes"),
            Self::YesNo(false) => f.write_str("No"),
        }
    }
}

/// An answer tied to the question that produced it.
///
/// Carries enough of the question (id, text, type) to be displayed and
/// persisted without the survey definition at hand.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub question_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub value: ResponseValue,
}

impl NormalizedResponse {
    /// Attach a value to the question it answers.
    pub fn new(question: &QuestionSpec, value: ResponseValue) -> Self {
        Self {
            question_id: question.id().to_string(),
            question_text: question.text().to_string(),
            question_type: question.question_type(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_canonical_forms() {
        assert_eq!(ResponseValue::YesNo(true).to_string(), "Yes");
        assert_eq!(ResponseValue::YesNo(false).to_string(), "No");
        assert_eq!(ResponseValue::Number(5.0).to_string(), "5");
        assert_eq!(ResponseValue::Number(7.25).to_string(), "7.25");
    }

    #[test]
    fn stored_values_read_back() {
        assert_eq!(
            ResponseValue::from_stored(QuestionType::Rating, "5"),
            Ok(ResponseValue::Number(5.0))
        );
        assert_eq!(
            ResponseValue::from_stored(QuestionType::YesNo, "No"),
            Ok(ResponseValue::YesNo(false))
        );
        assert_eq!(
            ResponseValue::from_stored(QuestionType::MultipleChoice, "B"),
            Ok(ResponseValue::Choice("B".to_string()))
        );
    }

    #[test]
    fn stored_values_reject_garbage() {
        assert!(ResponseValue::from_stored(QuestionType::Number, "abc").is_err());
        assert!(ResponseValue::from_stored(QuestionType::Number, "NaN").is_err());
        assert!(ResponseValue::from_stored(QuestionType::YesNo, "maybe").is_err());
    }
}
