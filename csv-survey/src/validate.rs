//! Answer validation and normalization.

use std::num::IntErrorKind;

use crate::{NumberScale, QuestionKind, QuestionSpec, ResponseValue, ValidationError};

/// Check a raw answer against its question and coerce it to a typed value.
///
/// Input is trimmed first. Multiple choice answers may be given as a 1-based
/// option number or as the exact option text; both resolve to the option text.
pub fn validate_and_normalize(
    question: &QuestionSpec,
    raw: &str,
) -> Result<ResponseValue, ValidationError> {
    let input = raw.trim();

    match question.kind() {
        QuestionKind::Text => {
            if input.is_empty() && question.is_required() {
                Err(ValidationError::Empty)
            } else {
                Ok(ResponseValue::Text(input.to_string()))
            }
        }

        QuestionKind::Number(number) => {
            if input.is_empty() {
                return Err(ValidationError::Empty);
            }
            match number.scale {
                NumberScale::Free => input
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(ResponseValue::Number)
                    .ok_or(ValidationError::NotANumber),
                NumberScale::Rating { min, max } => {
                    // Integers too large for i64 are still whole numbers.
                    let value = input.parse::<i64>().map_err(|err| match err.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            ValidationError::OutOfRange { min, max }
                        }
                        _ => ValidationError::NotANumber,
                    })?;
                    if (min..=max).contains(&value) {
                        Ok(ResponseValue::Number(value as f64))
                    } else {
                        Err(ValidationError::OutOfRange { min, max })
                    }
                }
            }
        }

        QuestionKind::MultipleChoice(choice) => {
            if input.is_empty() {
                return Err(ValidationError::Empty);
            }
            let invalid = ValidationError::InvalidChoice {
                count: choice.options().len(),
            };
            let selected = match input.parse::<usize>() {
                Ok(number) => choice.by_number(number).or_else(|| choice.by_text(input)),
                Err(_) => choice.by_text(input),
            };
            selected
                .map(|option| ResponseValue::Choice(option.to_string()))
                .ok_or(invalid)
        }

        QuestionKind::YesNo => match input.to_lowercase().as_str() {
            "" => Err(ValidationError::Empty),
            "y" | "yes" => Ok(ResponseValue::YesNo(true)),
            "n" | "no" => Ok(ResponseValue::YesNo(false)),
            _ => Err(ValidationError::InvalidYesNo),
        },
    }
}

/// Type-specific hint lines shown under the question text.
pub fn instructions(question: &QuestionSpec) -> Vec<String> {
    let mut lines = match question.kind() {
        QuestionKind::Text => vec!["Enter your response:".to_string()],
        QuestionKind::Number(number) => match number.scale {
            NumberScale::Free => vec!["Enter a number:".to_string()],
            NumberScale::Rating { min, max } => vec![format!(
                "Rate from {min} to {max} ({min} = lowest, {max} = highest):"
            )],
        },
        QuestionKind::MultipleChoice(choice) => {
            let mut lines = vec!["Options:".to_string()];
            lines.extend(
                choice
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(i, option)| format!("  {}. {option}", i + 1)),
            );
            lines.push("Enter the number or text of your choice:".to_string());
            lines
        }
        QuestionKind::YesNo => vec!["Answer with 'yes' or 'no':".to_string()],
    };

    if !question.is_required() {
        lines.push("(optional, press Enter to skip)".to_string());
    }
    lines
}
