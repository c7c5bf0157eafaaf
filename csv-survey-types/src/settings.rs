use serde::{Deserialize, Serialize};

const fn default_delimiter() -> char {
    '|'
}

const fn default_rating_range() -> (i64, i64) {
    (1, 10)
}

const fn default_required() -> bool {
    true
}

/// Settings that shape how a survey file is read and how answers are checked.
///
/// These are passed explicitly into the loader; nothing reads them from
/// global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySettings {
    /// Separator between options in the `options` column.
    #[serde(default = "default_delimiter")]
    pub option_delimiter: char,

    /// Inclusive bounds for rating questions.
    #[serde(default = "default_rating_range")]
    pub rating_range: (i64, i64),

    /// Value used when the `required` column is absent or unreadable.
    #[serde(default = "default_required")]
    pub required_default: bool,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            option_delimiter: default_delimiter(),
            rating_range: default_rating_range(),
            required_default: default_required(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let settings = SurveySettings::default();
        assert_eq!(settings.option_delimiter, '|');
        assert_eq!(settings.rating_range, (1, 10));
        assert!(settings.required_default);
    }
}
