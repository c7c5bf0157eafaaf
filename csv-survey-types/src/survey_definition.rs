use crate::QuestionSpec;

/// A loaded survey: its name, questions and the banners around them.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyDefinition {
    /// Short name, usually the stem of the survey file.
    pub name: String,

    /// Optional message shown before the first question.
    pub prelude: Option<String>,

    /// All questions in presentation order.
    pub questions: Vec<QuestionSpec>,

    /// Optional message shown after the survey completes.
    pub epilogue: Option<String>,
}

impl SurveyDefinition {
    /// Create a new survey definition with the given questions.
    pub fn new(name: impl Into<String>, questions: Vec<QuestionSpec>) -> Self {
        Self {
            name: name.into(),
            prelude: None,
            questions,
            epilogue: None,
        }
    }

    /// Set the prelude message.
    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Set the epilogue message.
    pub fn with_epilogue(mut self, epilogue: impl Into<String>) -> Self {
        self.epilogue = Some(epilogue.into());
        self
    }

    /// Title-cased display name, e.g. `customer_feedback` -> `Customer Feedback`.
    pub fn title(&self) -> String {
        self.name
            .split(['_', '-', ' '])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get the questions.
    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    /// Find a question by id (the first one, if ids repeat).
    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
