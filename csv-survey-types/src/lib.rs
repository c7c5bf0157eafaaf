//! Core types for the csv-survey crates.
//!
//! This crate provides the foundational types for running surveys:
//! - `SurveyDefinition` - The loaded survey (name, questions, banners)
//! - `QuestionSpec` and `QuestionKind` - Individual questions and their types
//! - `ResponseValue` and `NormalizedResponse` - Validated answers
//! - `ResponseSet` and `ResponseCollection` - Session records used for analysis
//! - `SurveyBackend` trait - For implementing console (or scripted) front-ends

mod question;
pub use question::{
    ChoiceQuestion, NumberQuestion, NumberScale, QuestionKind, QuestionSpec, QuestionType,
    SpecError, UnknownQuestionType,
};

mod response_value;
pub use response_value::{NormalizedResponse, ResponseValue, StoredValueError};

mod responses;
pub use responses::{ResponseCollection, ResponseError, ResponseSet, SessionStatus};

mod settings;
pub use settings::SurveySettings;

mod survey_definition;
pub use survey_definition::SurveyDefinition;

mod error;
pub use error::{SurveyError, ValidationError};

mod traits;
pub use traits::{Progress, SessionOutcome, SurveyBackend};
