//! Persisting completed sessions and reading them back for analysis.
//!
//! Two formats are supported, both lossless for the stored fields
//! (question id, question text, normalized answer, question type):
//! - JSON: an array of sessions, each with its completion time and answers
//! - CSV: one row per answer, sessions numbered in a `session` column; a
//!   session without answers is kept as a single row with no question fields

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    NormalizedResponse, QuestionType, ResponseCollection, ResponseSet, ResponseValue,
    StoredValueError,
};

/// File format for stored responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    Csv,
}

impl StoreFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => Some(Self::Json),
            Some("csv") => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Error type for storing and loading responses.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON response file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV response file: {0}")]
    Csv(#[from] csv::Error),

    #[error("corrupt response file '{}': {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: StoredValueError,
    },

    #[error("cannot tell the format of '{}' (expected .json or .csv)", .0.display())]
    UnknownFormat(PathBuf),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    completed_at: DateTime<Utc>,
    responses: Vec<StoredResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredResponse {
    question_id: String,
    question: String,
    response: String,
    question_type: QuestionType,
}

/// One CSV line. `question_type` is empty only on the marker row of a
/// session that has no answers.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRow {
    session: usize,
    completed_at: DateTime<Utc>,
    question_id: String,
    question: String,
    response: String,
    question_type: Option<QuestionType>,
}

impl StoredRow {
    fn empty_session(session: usize, completed_at: DateTime<Utc>) -> Self {
        Self {
            session,
            completed_at,
            question_id: String::new(),
            question: String::new(),
            response: String::new(),
            question_type: None,
        }
    }
}

impl From<&NormalizedResponse> for StoredResponse {
    fn from(response: &NormalizedResponse) -> Self {
        Self {
            question_id: response.question_id.clone(),
            question: response.question_text.clone(),
            response: response.value.to_string(),
            question_type: response.question_type,
        }
    }
}

impl StoredResponse {
    fn restore(self, path: &Path) -> Result<NormalizedResponse, StoreError> {
        let value = ResponseValue::from_stored(self.question_type, &self.response).map_err(
            |source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            },
        )?;
        Ok(NormalizedResponse {
            question_id: self.question_id,
            question_text: self.question,
            question_type: self.question_type,
            value,
        })
    }
}

/// Writes response collections to disk and reads them back.
#[derive(Debug, Clone)]
pub struct ResponseStore {
    directory: PathBuf,
    format: StoreFormat,
}

impl ResponseStore {
    /// Store files in `directory` using `format` unless a path says otherwise.
    pub fn new(directory: impl Into<PathBuf>, format: StoreFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    /// The timestamped file name used when no explicit path is given.
    pub fn default_path(&self, survey_name: &str, at: DateTime<Local>) -> PathBuf {
        let stamp = at.format("%Y%m%d_%H%M%S");
        let ext = self.format.extension();
        let mut path = self
            .directory
            .join(format!("{survey_name}_responses_{stamp}.{ext}"));

        let mut suffix = 1;
        while path.exists() {
            path = self
                .directory
                .join(format!("{survey_name}_responses_{stamp}_{suffix}.{ext}"));
            suffix += 1;
        }
        path
    }

    /// Write a collection and return where it went.
    ///
    /// An explicit path wins over the generated name; its extension picks the
    /// format when it is `.json` or `.csv`. Failure leaves `collection` untouched.
    pub fn persist(
        &self,
        survey_name: &str,
        collection: &ResponseCollection,
        explicit: Option<&Path>,
    ) -> Result<PathBuf, StoreError> {
        let (path, format) = match explicit {
            Some(path) => (
                path.to_path_buf(),
                StoreFormat::from_path(path).unwrap_or(self.format),
            ),
            None => (self.default_path(survey_name, Local::now()), self.format),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        match format {
            StoreFormat::Json => write_json(&path, collection)?,
            StoreFormat::Csv => write_csv(&path, collection)?,
        }

        tracing::info!(
            path = %path.display(),
            sessions = collection.len(),
            "responses saved"
        );
        Ok(path)
    }

    /// Read a response file; the format comes from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<ResponseCollection, StoreError> {
        let path = path.as_ref();
        let format =
            StoreFormat::from_path(path).ok_or_else(|| StoreError::UnknownFormat(path.into()))?;

        let collection = match format {
            StoreFormat::Json => read_json(path)?,
            StoreFormat::Csv => read_csv(path)?,
        };

        tracing::debug!(
            path = %path.display(),
            sessions = collection.len(),
            "responses loaded"
        );
        Ok(collection)
    }

    /// Read several response files into one collection, in order.
    pub fn load_many<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> Result<ResponseCollection, StoreError> {
        let mut collection = ResponseCollection::new();
        for path in paths {
            collection.extend(Self::load(path)?);
        }
        Ok(collection)
    }
}

fn completed_at(set: &ResponseSet) -> DateTime<Utc> {
    set.completed_at().unwrap_or_else(Utc::now)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_json(path: &Path, collection: &ResponseCollection) -> Result<(), StoreError> {
    let sessions: Vec<StoredSession> = collection
        .iter()
        .map(|set| StoredSession {
            completed_at: completed_at(set),
            responses: set.iter().map(StoredResponse::from).collect(),
        })
        .collect();

    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &sessions)?;
    writer.flush().map_err(io_error(path))
}

fn write_csv(path: &Path, collection: &ResponseCollection) -> Result<(), StoreError> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = csv::Writer::from_writer(file);

    for (index, set) in collection.iter().enumerate() {
        let session = index + 1;
        let completed_at = completed_at(set);
        if set.is_empty() {
            writer.serialize(StoredRow::empty_session(session, completed_at))?;
        }
        for response in set {
            let stored = StoredResponse::from(response);
            writer.serialize(StoredRow {
                session,
                completed_at,
                question_id: stored.question_id,
                question: stored.question,
                response: stored.response,
                question_type: Some(stored.question_type),
            })?;
        }
    }

    writer.flush().map_err(io_error(path))
}

fn read_json(path: &Path) -> Result<ResponseCollection, StoreError> {
    let file = File::open(path).map_err(io_error(path))?;
    let sessions: Vec<StoredSession> = serde_json::from_reader(BufReader::new(file))?;

    let mut collection = ResponseCollection::new();
    for session in sessions {
        let responses = session
            .responses
            .into_iter()
            .map(|stored| stored.restore(path))
            .collect::<Result<Vec<_>, _>>()?;
        collection.restore(responses, session.completed_at);
    }
    Ok(collection)
}

fn read_csv(path: &Path) -> Result<ResponseCollection, StoreError> {
    let file = File::open(path).map_err(io_error(path))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut sessions: BTreeMap<usize, (DateTime<Utc>, Vec<NormalizedResponse>)> = BTreeMap::new();
    for row in reader.deserialize::<StoredRow>() {
        let row = row?;
        let (_, responses) = sessions
            .entry(row.session)
            .or_insert_with(|| (row.completed_at, Vec::new()));

        let Some(question_type) = row.question_type else {
            continue;
        };
        let response = StoredResponse {
            question_id: row.question_id,
            question: row.question,
            response: row.response,
            question_type,
        }
        .restore(path)?;
        responses.push(response);
    }

    let mut collection = ResponseCollection::new();
    for (completed_at, responses) in sessions.into_values() {
        collection.restore(responses, completed_at);
    }
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn response(id: &str, question_type: QuestionType, value: ResponseValue) -> NormalizedResponse {
        NormalizedResponse {
            question_id: id.to_string(),
            question_text: format!("Question {id}, with comma"),
            question_type,
            value,
        }
    }

    fn collection() -> ResponseCollection {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut collection = ResponseCollection::new();
        for rating in [5.0, 7.0] {
            let set = ResponseSet::restored(
                vec![
                    response("q1", QuestionType::Rating, ResponseValue::Number(rating)),
                    response("q2", QuestionType::MultipleChoice, ResponseValue::Choice("B".into())),
                    response("q3", QuestionType::YesNo, ResponseValue::YesNo(rating > 6.0)),
                    response("q4", QuestionType::Number, ResponseValue::Number(-0.125)),
                    response("q5", QuestionType::Text, ResponseValue::Text("said \"hi\"\nbye".into())),
                ],
                at,
            );
            collection.push(set).unwrap();
        }
        collection
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResponseStore::new(dir.path(), StoreFormat::Json);
        let original = collection();

        let path = store.persist("feedback", &original, None).unwrap();
        assert_eq!(path.extension().unwrap(), "json");

        let loaded = ResponseStore::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResponseStore::new(dir.path(), StoreFormat::Json);
        let original = collection();

        let explicit = dir.path().join("nested").join("answers.csv");
        let path = store.persist("feedback", &original, Some(&explicit)).unwrap();
        assert_eq!(path, explicit);

        let loaded = ResponseStore::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn sessions_without_answers_survive_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();

        let mut original = ResponseCollection::new();
        original.restore(Vec::new(), at);
        original.restore(
            vec![response("age", QuestionType::Number, ResponseValue::Number(30.0))],
            at,
        );
        original.restore(Vec::new(), at);

        for name in ["skipped.csv", "skipped.json"] {
            let store = ResponseStore::new(dir.path(), StoreFormat::Json);
            let path = store
                .persist("s", &original, Some(&dir.path().join(name)))
                .unwrap();

            let loaded = ResponseStore::load(&path).unwrap();
            assert_eq!(loaded, original);
            let sizes: Vec<_> = loaded.iter().map(ResponseSet::len).collect();
            assert_eq!(sizes, vec![0, 1, 0]);
        }
    }

    #[test]
    fn default_names_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResponseStore::new(dir.path(), StoreFormat::Csv);
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let first = store.default_path("feedback", at);
        assert_eq!(
            first.file_name().unwrap(),
            "feedback_responses_20240102_030405.csv"
        );
        std::fs::write(&first, "").unwrap();

        let second = store.default_path("feedback", at);
        assert_eq!(
            second.file_name().unwrap(),
            "feedback_responses_20240102_030405_1.csv"
        );
    }

    #[test]
    fn load_many_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResponseStore::new(dir.path(), StoreFormat::Json);
        let a = store
            .persist("s", &collection(), Some(&dir.path().join("a.json")))
            .unwrap();
        let b = store
            .persist("s", &collection(), Some(&dir.path().join("b.csv")))
            .unwrap();

        let loaded = ResponseStore::load_many([a, b]).unwrap();
        assert_eq!(loaded.len(), 4);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let store = ResponseStore::new(dir.path(), StoreFormat::Json);
        let original = collection();
        let result = store.persist("s", &original, Some(&blocker.join("out.json")));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn corrupt_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"[{"completed_at":"2024-05-01T12:30:00Z","responses":[
                {"question_id":"q1","question":"Rate","response":"lots","question_type":"rating"}]}]"#,
        )
        .unwrap();

        assert!(matches!(
            ResponseStore::load(&path),
            Err(StoreError::Corrupt { .. })
        ));
        assert!(matches!(
            ResponseStore::load(dir.path().join("bad.txt")),
            Err(StoreError::UnknownFormat(_))
        ));
    }
}
