use chrono::{DateTime, Utc};

use crate::{NormalizedResponse, ResponseValue};

/// Error type for response set and collection operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("response set is already {0:?} and cannot be changed")]
    Finalized(SessionStatus),

    #[error("only completed response sets can be added to a collection (got {0:?})")]
    NotCompleted(SessionStatus),
}

/// Lifecycle of a single survey session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// The answers from one survey session.
///
/// Answers are kept in the order they were given. Recording a second answer
/// for the same question id replaces the first one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSet {
    responses: Vec<NormalizedResponse>,
    status: SessionStatus,
    completed_at: Option<DateTime<Utc>>,
}

impl ResponseSet {
    /// Start an empty, in-progress session.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            status: SessionStatus::InProgress,
            completed_at: None,
        }
    }

    /// Rebuild a completed session from persisted answers.
    pub fn restored(responses: Vec<NormalizedResponse>, completed_at: DateTime<Utc>) -> Self {
        let mut set = Self::new();
        for response in responses {
            set.upsert(response);
        }
        set.status = SessionStatus::Completed;
        set.completed_at = Some(completed_at);
        set
    }

    /// Record an answer.
    pub fn insert(&mut self, response: NormalizedResponse) -> Result<(), ResponseError> {
        if self.status != SessionStatus::InProgress {
            return Err(ResponseError::Finalized(self.status));
        }
        self.upsert(response);
        Ok(())
    }

    fn upsert(&mut self, response: NormalizedResponse) {
        match self
            .responses
            .iter_mut()
            .find(|existing| existing.question_id == response.question_id)
        {
            Some(existing) => *existing = response,
            None => self.responses.push(response),
        }
    }

    /// Mark the session completed and stamp the completion time.
    pub fn complete(&mut self) -> Result<(), ResponseError> {
        self.complete_at(Utc::now())
    }

    /// Mark the session completed at the given time.
    pub fn complete_at(&mut self, at: DateTime<Utc>) -> Result<(), ResponseError> {
        if self.status != SessionStatus::InProgress {
            return Err(ResponseError::Finalized(self.status));
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
        Ok(())
    }

    /// Mark the session abandoned. Abandoned sets are never persisted.
    pub fn abandon(&mut self) {
        if self.status == SessionStatus::InProgress {
            self.status = SessionStatus::Abandoned;
        }
    }

    /// Get the answer for a question id.
    pub fn get(&self, question_id: &str) -> Option<&NormalizedResponse> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }

    /// Get the answer value for a question id.
    pub fn value(&self, question_id: &str) -> Option<&ResponseValue> {
        self.get(question_id).map(|r| &r.value)
    }

    /// Check if a question has been answered.
    pub fn contains(&self, question_id: &str) -> bool {
        self.get(question_id).is_some()
    }

    /// Iterate over the answers in the order they were given.
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedResponse> {
        self.responses.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

impl Default for ResponseSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ResponseSet {
    type Item = &'a NormalizedResponse;
    type IntoIter = std::slice::Iter<'a, NormalizedResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}

/// An append-only sequence of completed sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseCollection {
    sets: Vec<ResponseSet>,
}

impl ResponseCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { sets: Vec::new() }
    }

    /// Append a completed session.
    pub fn push(&mut self, set: ResponseSet) -> Result<(), ResponseError> {
        if !set.is_completed() {
            return Err(ResponseError::NotCompleted(set.status()));
        }
        self.sets.push(set);
        Ok(())
    }

    /// Append a session read back from storage. Restored sessions are
    /// completed by construction, so this cannot fail.
    pub fn restore(&mut self, responses: Vec<NormalizedResponse>, completed_at: DateTime<Utc>) {
        self.sets.push(ResponseSet::restored(responses, completed_at));
    }

    /// Append every session of another collection.
    pub fn extend(&mut self, other: ResponseCollection) {
        self.sets.extend(other.sets);
    }

    /// Iterate over sessions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResponseSet> {
        self.sets.iter()
    }

    /// All answer values for one question, in collection order.
    pub fn values_for<'a>(
        &'a self,
        question_id: &'a str,
    ) -> impl Iterator<Item = &'a ResponseValue> + 'a {
        self.sets.iter().filter_map(move |set| set.value(question_id))
    }

    /// Get the number of sessions.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResponseCollection {
    type Item = &'a ResponseSet;
    type IntoIter = std::slice::Iter<'a, ResponseSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

impl IntoIterator for ResponseCollection {
    type Item = ResponseSet;
    type IntoIter = std::vec::IntoIter<ResponseSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionType;

    fn answer(id: &str, value: ResponseValue) -> NormalizedResponse {
        NormalizedResponse {
            question_id: id.to_string(),
            question_text: format!("Question {id}"),
            question_type: QuestionType::Text,
            value,
        }
    }

    #[test]
    fn insert_and_get() {
        let mut set = ResponseSet::new();
        set.insert(answer("q1", ResponseValue::Number(5.0))).unwrap();
        set.insert(answer("q2", ResponseValue::Choice("B".into())))
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.value("q1"), Some(&ResponseValue::Number(5.0)));
        assert_eq!(set.value("q3"), None);
    }

    #[test]
    fn duplicate_id_replaces_in_place() {
        let mut set = ResponseSet::new();
        set.insert(answer("q1", ResponseValue::Text("first".into())))
            .unwrap();
        set.insert(answer("q2", ResponseValue::Text("other".into())))
            .unwrap();
        set.insert(answer("q1", ResponseValue::Text("second".into())))
            .unwrap();

        let ids: Vec<_> = set.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2"]);
        assert_eq!(set.value("q1"), Some(&ResponseValue::Text("second".into())));
    }

    #[test]
    fn finalized_set_rejects_answers() {
        let mut set = ResponseSet::new();
        set.complete().unwrap();
        assert!(set.completed_at().is_some());

        let result = set.insert(answer("q1", ResponseValue::YesNo(true)));
        assert_eq!(result, Err(ResponseError::Finalized(SessionStatus::Completed)));
    }

    #[test]
    fn collection_only_accepts_completed_sets() {
        let mut collection = ResponseCollection::new();

        let mut abandoned = ResponseSet::new();
        abandoned.abandon();
        assert_eq!(
            collection.push(abandoned),
            Err(ResponseError::NotCompleted(SessionStatus::Abandoned))
        );
        assert!(collection.is_empty());

        let mut done = ResponseSet::new();
        done.insert(answer("q1", ResponseValue::Number(3.0))).unwrap();
        done.complete().unwrap();
        collection.push(done).unwrap();

        let values: Vec<_> = collection.values_for("q1").collect();
        assert_eq!(values, vec![&ResponseValue::Number(3.0)]);
    }

    #[test]
    fn restored_sessions_are_completed() {
        let at = "2024-05-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let mut collection = ResponseCollection::new();
        collection.restore(vec![answer("q1", ResponseValue::YesNo(false))], at);
        collection.restore(Vec::new(), at);

        assert_eq!(collection.len(), 2);
        let sets: Vec<_> = collection.iter().collect();
        assert!(sets.iter().all(|set| set.is_completed()));
        assert_eq!(sets[0].completed_at(), Some(at));
        assert!(sets[1].is_empty());
    }
}
