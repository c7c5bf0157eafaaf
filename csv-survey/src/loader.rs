//! Reads survey definitions from CSV files.
//!
//! Malformed rows are skipped with a warning; only file-level problems
//! (unreadable file, missing columns, no usable rows) abort the load.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{QuestionKind, QuestionSpec, QuestionType, SpecError, SurveyDefinition, SurveySettings};

const QUESTION_ID: &str = "question_id";
const QUESTION_TEXT: &str = "question_text";
const QUESTION_TYPE: &str = "question_type";
const OPTIONS: &str = "options";
const REQUIRED: &str = "required";

const DEFAULT_PRELUDE: &str =
    "Welcome! Please answer the following questions.\nType 'quit' at any time to exit the survey.";
const DEFAULT_EPILOGUE: &str = "Thank you for completing the survey!";

/// Failure that prevents a survey from being loaded at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read survey file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed survey file: {0}")]
    Csv(#[from] csv::Error),

    #[error("survey file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("survey file contains no valid questions ({rejected} rows rejected)")]
    NoQuestions { rejected: usize },
}

/// Why a single row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("missing question_id")]
    MissingId,

    #[error("missing question_text")]
    MissingText,

    #[error("unknown question type '{0}'")]
    UnknownType(String),

    #[error("multiple choice question has no options")]
    NoOptions,
}

impl From<SpecError> for RowError {
    fn from(err: SpecError) -> Self {
        match err {
            SpecError::EmptyId => Self::MissingId,
            SpecError::EmptyText => Self::MissingText,
            SpecError::NoOptions => Self::NoOptions,
        }
    }
}

/// A row that was skipped during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejected {
    /// Line number in the source file (the header is line 1).
    pub line: u64,
    pub question_id: Option<String>,
    pub reason: RowError,
}

impl fmt::Display for RowRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.question_id {
            Some(id) => write!(f, "line {} ('{id}'): {}", self.line, self.reason),
            None => write!(f, "line {}: {}", self.line, self.reason),
        }
    }
}

/// Result of a successful load: the survey plus any skipped rows.
#[derive(Debug, Clone)]
pub struct LoadedSurvey {
    pub definition: SurveyDefinition,
    pub warnings: Vec<RowRejected>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    text: usize,
    kind: usize,
    options: Option<usize>,
    required: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        let (id, text, kind) = (find(QUESTION_ID), find(QUESTION_TEXT), find(QUESTION_TYPE));
        match (id, text, kind) {
            (Some(id), Some(text), Some(kind)) => Ok(Self {
                id,
                text,
                kind,
                options: find(OPTIONS),
                required: find(REQUIRED),
            }),
            _ => {
                let missing = [(QUESTION_ID, id), (QUESTION_TEXT, text), (QUESTION_TYPE, kind)]
                    .into_iter()
                    .filter(|(_, pos)| pos.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(LoadError::MissingColumns(missing))
            }
        }
    }
}

/// Loads `SurveyDefinition`s from CSV text.
#[derive(Debug, Clone, Default)]
pub struct SurveyLoader {
    settings: SurveySettings,
}

impl SurveyLoader {
    /// Create a loader with the given settings.
    pub fn new(settings: SurveySettings) -> Self {
        Self { settings }
    }

    /// Load a survey file. The survey is named after the file stem.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedSurvey, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("survey");

        let loaded = self.load_reader(name, file)?;
        tracing::info!(
            path = %path.display(),
            questions = loaded.definition.len(),
            rejected = loaded.warnings.len(),
            "loaded survey"
        );
        Ok(loaded)
    }

    /// Load a survey from in-memory CSV text.
    pub fn load_str(&self, name: &str, content: &str) -> Result<LoadedSurvey, LoadError> {
        self.load_reader(name, content.as_bytes())
    }

    /// Load a survey from any reader producing UTF-8 CSV.
    pub fn load_reader<R: Read>(&self, name: &str, reader: R) -> Result<LoadedSurvey, LoadError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let columns = Columns::resolve(reader.headers()?)?;

        let mut questions = Vec::new();
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|pos| pos.line())
                .unwrap_or(index as u64 + 2);

            match self.parse_row(&record, columns) {
                Ok(question) => {
                    if !seen.insert(question.id().to_string()) {
                        tracing::warn!(
                            line,
                            question_id = question.id(),
                            "duplicate question id; later answers will replace earlier ones"
                        );
                    }
                    questions.push(question);
                }
                Err(reason) => {
                    let rejected = RowRejected {
                        line,
                        question_id: field(&record, Some(columns.id)).map(str::to_string),
                        reason,
                    };
                    tracing::warn!("skipping row: {rejected}");
                    warnings.push(rejected);
                }
            }
        }

        if questions.is_empty() {
            return Err(LoadError::NoQuestions {
                rejected: warnings.len(),
            });
        }

        let definition = SurveyDefinition::new(name, questions)
            .with_prelude(DEFAULT_PRELUDE)
            .with_epilogue(DEFAULT_EPILOGUE);

        Ok(LoadedSurvey {
            definition,
            warnings,
        })
    }

    fn parse_row(&self, record: &StringRecord, columns: Columns) -> Result<QuestionSpec, RowError> {
        let id = field(record, Some(columns.id)).ok_or(RowError::MissingId)?;
        let text = field(record, Some(columns.text)).ok_or(RowError::MissingText)?;

        let question_type = match field(record, Some(columns.kind)) {
            Some(raw) => raw
                .parse::<QuestionType>()
                .map_err(|err| RowError::UnknownType(err.0))?,
            None => QuestionType::Text,
        };

        let options = field(record, columns.options)
            .map(|raw| self.parse_options(raw))
            .unwrap_or_default();

        let required = field(record, columns.required)
            .and_then(parse_bool)
            .unwrap_or(self.settings.required_default);

        let kind = QuestionKind::from_type(question_type, options, self.settings.rating_range)?;
        Ok(QuestionSpec::new(id, text, kind, required)?)
    }

    fn parse_options(&self, raw: &str) -> Vec<String> {
        raw.split(self.settings.option_delimiter)
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Get a trimmed, non-empty field.
fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Write the sample survey used to try the tool out.
pub fn write_sample(path: impl AsRef<Path>) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record([QUESTION_ID, QUESTION_TEXT, QUESTION_TYPE, OPTIONS, REQUIRED])?;
    writer.write_record([
        "q1",
        "What is your overall satisfaction with our service?",
        "rating",
        "",
        "true",
    ])?;
    writer.write_record([
        "q2",
        "Which of the following best describes your experience?",
        "multiple_choice",
        "Excellent|Good|Fair|Poor",
        "true",
    ])?;
    writer.write_record([
        "q3",
        "Would you recommend our service to others?",
        "yes_no",
        "",
        "true",
    ])?;
    writer.write_record([
        "q4",
        "Please provide any additional comments or suggestions:",
        "text",
        "",
        "false",
    ])?;
    writer.flush()?;
    tracing::info!(path = %path.as_ref().display(), "wrote sample survey");
    Ok(())
}
