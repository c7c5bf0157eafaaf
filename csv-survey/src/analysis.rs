//! Aggregate statistics over collected sessions.

use std::fmt;

use crate::{
    QuestionKind, QuestionSpec, QuestionType, ResponseCollection, ResponseSet, ResponseValue,
};

const RULE_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 40;

/// How often one option was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceCount {
    pub option: String,
    pub count: usize,
}

/// Statistics for one question across a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionStats {
    /// Nobody answered this question.
    NoResponses,

    /// Number and rating questions.
    Numeric {
        count: usize,
        mean: f64,
        min: f64,
        max: f64,
    },

    /// Multiple choice questions, most frequent option first.
    Distribution { total: usize, counts: Vec<ChoiceCount> },

    /// Yes/no questions.
    YesNo { yes: usize, no: usize },

    /// Text questions: every answer in collection order.
    Text(Vec<String>),
}

/// Percentage of `part` in `total`, 0 for an empty total.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// The analysis result for a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReport {
    pub question_id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub stats: QuestionStats,
}

/// The analysis result for a whole survey.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyReport {
    pub sessions: usize,
    pub questions: Vec<QuestionReport>,
}

impl SurveyReport {
    /// Find the report for a question id.
    pub fn question(&self, id: &str) -> Option<&QuestionReport> {
        self.questions.iter().find(|q| q.question_id == id)
    }
}

/// Compute per-question statistics, in presentation order.
///
/// Answers whose value does not fit the question's type (e.g. text stored
/// for a rating) are left out of that question's statistics.
pub fn analyze(questions: &[QuestionSpec], collection: &ResponseCollection) -> SurveyReport {
    SurveyReport {
        sessions: collection.len(),
        questions: questions
            .iter()
            .map(|question| QuestionReport {
                question_id: question.id().to_string(),
                text: question.text().to_string(),
                question_type: question.question_type(),
                stats: question_stats(question, collection),
            })
            .collect(),
    }
}

fn question_stats(question: &QuestionSpec, collection: &ResponseCollection) -> QuestionStats {
    let values = collection.values_for(question.id());

    match question.kind() {
        QuestionKind::Number(_) => {
            let numbers: Vec<f64> = values.filter_map(|v| v.as_number()).collect();
            if numbers.is_empty() {
                return QuestionStats::NoResponses;
            }
            let count = numbers.len();
            let mean = numbers.iter().sum::<f64>() / count as f64;
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            QuestionStats::Numeric {
                count,
                mean,
                min,
                max,
            }
        }

        QuestionKind::MultipleChoice(_) => {
            let mut counts: Vec<ChoiceCount> = Vec::new();
            for option in values.filter_map(|v| match v {
                ResponseValue::Choice(option) => Some(option),
                _ => None,
            }) {
                match counts.iter_mut().find(|c| c.option == *option) {
                    Some(entry) => entry.count += 1,
                    None => counts.push(ChoiceCount {
                        option: option.to_string(),
                        count: 1,
                    }),
                }
            }
            if counts.is_empty() {
                return QuestionStats::NoResponses;
            }
            // Stable sort: ties keep first-seen order.
            counts.sort_by(|a, b| b.count.cmp(&a.count));
            let total = counts.iter().map(|c| c.count).sum();
            QuestionStats::Distribution { total, counts }
        }

        QuestionKind::YesNo => {
            let (yes, no) = values
                .filter_map(|v| v.as_yes_no())
                .fold((0, 0), |(yes, no), answer| {
                    if answer { (yes + 1, no) } else { (yes, no + 1) }
                });
            if yes + no == 0 {
                QuestionStats::NoResponses
            } else {
                QuestionStats::YesNo { yes, no }
            }
        }

        QuestionKind::Text => {
            let answers: Vec<String> = values
                .filter_map(|v| match v {
                    ResponseValue::Text(text) => Some(text.clone()),
                    _ => None,
                })
                .collect();
            if answers.is_empty() {
                QuestionStats::NoResponses
            } else {
                QuestionStats::Text(answers)
            }
        }
    }
}

impl fmt::Display for QuestionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Question: {}", self.text)?;
        writeln!(f, "Type: {}", self.question_type.label())?;

        match &self.stats {
            QuestionStats::NoResponses => writeln!(f, "No responses collected.")?,
            QuestionStats::Numeric {
                count,
                mean,
                min,
                max,
            } => {
                writeln!(f, "Responses: {count}")?;
                writeln!(f, "Average: {mean:.2}")?;
                writeln!(f, "Highest: {max}")?;
                writeln!(f, "Lowest: {min}")?;
            }
            QuestionStats::Distribution { total, counts } => {
                writeln!(f, "Response distribution:")?;
                for entry in counts {
                    writeln!(
                        f,
                        "  {}: {} ({:.1}%)",
                        entry.option,
                        entry.count,
                        percentage(entry.count, *total)
                    )?;
                }
            }
            QuestionStats::YesNo { yes, no } => {
                let total = yes + no;
                writeln!(f, "  Yes: {yes} ({:.1}%)", percentage(*yes, total))?;
                writeln!(f, "  No: {no} ({:.1}%)", percentage(*no, total))?;
            }
            QuestionStats::Text(answers) => {
                writeln!(f, "Responses:")?;
                for (i, answer) in answers.iter().enumerate() {
                    writeln!(f, "  {}. {answer}", i + 1)?;
                }
            }
        }

        writeln!(f, "{}", "-".repeat(SECTION_WIDTH))
    }
}

impl fmt::Display for SurveyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "  SURVEY ANALYSIS")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total responses: {}", self.sessions)?;

        if self.sessions == 0 {
            return writeln!(f, "No responses to analyze.");
        }

        for question in &self.questions {
            writeln!(f)?;
            write!(f, "{question}")?;
        }
        Ok(())
    }
}

/// The answers of one finished session, rendered through `Display`.
#[derive(Debug, Clone, Copy)]
pub struct SessionSummary<'a> {
    title: &'a str,
    set: &'a ResponseSet,
}

impl<'a> SessionSummary<'a> {
    pub fn new(title: &'a str, set: &'a ResponseSet) -> Self {
        Self { title, set }
    }
}

impl fmt::Display for SessionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "  SURVEY SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Survey: {}", self.title)?;
        if let Some(at) = self.set.completed_at() {
            let local = at.with_timezone(&chrono::Local);
            writeln!(f, "Completed: {}", local.format("%Y-%m-%d %H:%M:%S"))?;
        }
        writeln!(f, "Questions answered: {}", self.set.len())?;

        for response in self.set {
            writeln!(f)?;
            writeln!(f, "{}", response.question_text)?;
            writeln!(f, "Response: {}", response.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NormalizedResponse, NumberQuestion};
    use pretty_assertions::assert_eq;

    fn numeric() -> QuestionSpec {
        QuestionSpec::new("q1", "Rate us", QuestionKind::Number(NumberQuestion::rating(1, 10)), true)
            .unwrap()
    }

    fn session(answers: &[(&QuestionSpec, ResponseValue)]) -> ResponseSet {
        let mut set = ResponseSet::new();
        for (question, value) in answers {
            set.insert(NormalizedResponse::new(question, value.clone()))
                .unwrap();
        }
        set.complete().unwrap();
        set
    }

    #[test]
    fn numeric_stats_skip_non_numeric_values() {
        let q = numeric();
        let mut collection = ResponseCollection::new();
        for value in [
            ResponseValue::Number(4.0),
            ResponseValue::Text("n/a".into()),
            ResponseValue::Number(8.0),
        ] {
            collection.push(session(&[(&q, value)])).unwrap();
        }

        let report = analyze(std::slice::from_ref(&q), &collection);
        assert_eq!(report.sessions, 3);
        assert_eq!(
            report.questions[0].stats,
            QuestionStats::Numeric {
                count: 2,
                mean: 6.0,
                min: 4.0,
                max: 8.0
            }
        );
    }

    #[test]
    fn distribution_sorts_by_frequency_then_first_seen() {
        let q = QuestionSpec::new(
            "q2",
            "Pick one",
            QuestionKind::MultipleChoice(
                crate::ChoiceQuestion::new(vec!["A".into(), "B".into(), "C".into()]).unwrap(),
            ),
            true,
        )
        .unwrap();

        let mut collection = ResponseCollection::new();
        for pick in ["C", "A", "B", "A", "C", "A"] {
            collection
                .push(session(&[(&q, ResponseValue::Choice(pick.into()))]))
                .unwrap();
        }

        let report = analyze(std::slice::from_ref(&q), &collection);
        let QuestionStats::Distribution { total, counts } = &report.questions[0].stats else {
            panic!("expected distribution");
        };
        assert_eq!(*total, 6);
        let order: Vec<_> = counts.iter().map(|c| (c.option.as_str(), c.count)).collect();
        assert_eq!(order, vec![("A", 3), ("C", 2), ("B", 1)]);
        assert_eq!(percentage(counts[0].count, *total), 50.0);
    }

    #[test]
    fn yes_no_counts_and_text_lists() {
        let yes_no = QuestionSpec::new("q3", "Recommend?", QuestionKind::YesNo, true).unwrap();
        let text = QuestionSpec::new("q4", "Comments", QuestionKind::Text, false).unwrap();

        let mut collection = ResponseCollection::new();
        collection
            .push(session(&[
                (&yes_no, ResponseValue::YesNo(true)),
                (&text, ResponseValue::Text("Great".into())),
            ]))
            .unwrap();
        collection
            .push(session(&[
                (&yes_no, ResponseValue::YesNo(false)),
                (&text, ResponseValue::Text("Slow".into())),
            ]))
            .unwrap();
        collection
            .push(session(&[(&yes_no, ResponseValue::YesNo(true))]))
            .unwrap();

        let report = analyze(&[yes_no, text], &collection);
        assert_eq!(report.questions[0].stats, QuestionStats::YesNo { yes: 2, no: 1 });
        assert_eq!(
            report.questions[1].stats,
            QuestionStats::Text(vec!["Great".into(), "Slow".into()])
        );

        let rendered = report.to_string();
        assert!(rendered.contains("  Yes: 2 (66.7%)"));
        assert!(rendered.contains("  No: 1 (33.3%)"));
        assert!(rendered.contains("  2. Slow"));
    }

    #[test]
    fn unanswered_question_reports_no_responses() {
        let q = numeric();
        let other = QuestionSpec::new("other", "Other", QuestionKind::Text, true).unwrap();
        let mut collection = ResponseCollection::new();
        collection
            .push(session(&[(&other, ResponseValue::Text("x".into()))]))
            .unwrap();

        let report = analyze(std::slice::from_ref(&q), &collection);
        assert_eq!(report.questions[0].stats, QuestionStats::NoResponses);
        assert!(report.to_string().contains("No responses collected."));
    }

    #[test]
    fn summary_lists_answers() {
        let q = numeric();
        let set = session(&[(&q, ResponseValue::Number(9.0))]);
        let text = SessionSummary::new("Feedback", &set).to_string();
        assert!(text.contains("Survey: Feedback"));
        assert!(text.contains("Questions answered: 1"));
        assert!(text.contains("Rate us\nResponse: 9"));
    }
}
