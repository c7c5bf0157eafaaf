//! # csv-survey
//!
//! Run console surveys defined in CSV files.
//!
//! A survey file has one question per row:
//!
//! ```text
//! question_id,question_text,question_type,options,required
//! q1,How satisfied are you?,rating,,true
//! q2,Which plan do you use?,multiple_choice,Free|Pro|Team,true
//! q3,Would you recommend us?,yes_no,,true
//! q4,Anything else?,text,,false
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use csv_survey::{ResponseCollection, SurveyLoader, SurveyRunner, SessionOutcome, analyze};
//!
//! let loaded = SurveyLoader::default().load_path("feedback.csv")?;
//! let outcome = SurveyRunner::new(&loaded.definition, backend).run()?;
//!
//! let mut collection = ResponseCollection::new();
//! if let SessionOutcome::Completed(set) = outcome {
//!     collection.push(set)?;
//! }
//! println!("{}", analyze(loaded.definition.questions(), &collection));
//! ```
//!
//! ## Backends
//!
//! Backends implement `SurveyBackend` and only deal with presenting text and
//! reading lines:
//! - `LineBackend` - plain prompts over any reader/writer pair (stdin/stdout)
//! - `TestBackend` - scripted answers for tests
//! - `csv-survey-dialoguer` - interactive terminal prompts via dialoguer

// Re-export all types from csv-survey-types
pub use csv_survey_types::*;

pub mod analysis;
pub mod loader;
pub mod runner;
pub mod store;
pub mod validate;

mod line_backend;
pub use line_backend::LineBackend;

// Test backend for running surveys without user interaction
mod test_backend;
pub use test_backend::TestBackend;

pub use analysis::{
    ChoiceCount, QuestionReport, QuestionStats, SessionSummary, SurveyReport, analyze, percentage,
};
pub use loader::{LoadError, LoadedSurvey, RowError, RowRejected, SurveyLoader, write_sample};
pub use runner::{RunnerState, SurveyRunner};
pub use store::{ResponseStore, StoreError, StoreFormat};
pub use validate::{instructions, validate_and_normalize};
