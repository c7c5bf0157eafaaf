//! # csv-survey-dialoguer
//!
//! Dialoguer backend for csv-survey.
//!
//! This crate provides interactive terminal prompts for survey sessions
//! using the `dialoguer` library. The survey runner still owns validation
//! and the quit signal; this backend only decides how each question looks.
//!
//! ## Example
//!
//! ```rust,ignore
//! use csv_survey::{SurveyLoader, SurveyRunner};
//! use csv_survey_dialoguer::DialoguerBackend;
//!
//! fn main() -> anyhow::Result<()> {
//!     let loaded = SurveyLoader::default().load_path("feedback.csv")?;
//!     let outcome = SurveyRunner::new(&loaded.definition, DialoguerBackend::new()).run()?;
//!     println!("completed: {}", outcome.is_completed());
//!     Ok(())
//! }
//! ```

mod backend;

pub use backend::{DialoguerBackend, DialoguerError};
