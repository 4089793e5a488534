//! Learning Package Data Model
//!
//! The artifacts produced by the generation chain: a curriculum, per-module
//! markdown content, a multiple-choice assessment, and graded feedback. The
//! structural checks that the controller runs on collaborator payloads live
//! here next to the types they inspect.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One unit of the learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Module {
    /// The title of the module. Content is keyed by this exact string.
    pub title: String,
    /// A brief one-sentence description of the module's content.
    pub description: String,
}

/// The structured learning path for a topic. Immutable once stored for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Curriculum {
    /// The overall title of the learning course.
    pub title: String,
    /// The learning modules, typically between 3 and 7.
    pub modules: Vec<Module>,
}

impl Curriculum {
    /// Module titles in curriculum order.
    pub fn module_titles(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|module| module.title.as_str())
    }

    /// Structural check on a collaborator payload.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("curriculum has an empty title".to_string());
        }
        if self.modules.is_empty() {
            return Err("curriculum has no modules".to_string());
        }
        let mut seen = HashMap::new();
        for module in &self.modules {
            if module.title.trim().is_empty() {
                return Err("curriculum contains a module with an empty title".to_string());
            }
            if seen.insert(module.title.as_str(), ()).is_some() {
                return Err(format!("duplicate module title: \"{}\"", module.title));
            }
        }
        Ok(())
    }
}

/// Markdown bodies for every module of a curriculum.
///
/// The module ordering is carried explicitly alongside the mapping, so
/// consumers never depend on the iteration order of a generic map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSet {
    order: Vec<String>,
    markdown: HashMap<String, String>,
}

impl ContentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) the markdown body for a module title, keeping
    /// first-insertion order.
    pub fn insert(&mut self, title: impl Into<String>, body: impl Into<String>) {
        let title = title.into();
        if !self.markdown.contains_key(&title) {
            self.order.push(title.clone());
        }
        self.markdown.insert(title, body.into());
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.markdown.get(title).map(String::as_str)
    }

    /// Module titles in insertion order.
    pub fn module_titles(&self) -> &[String] {
        &self.order
    }

    /// `(title, markdown)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().filter_map(|title| {
            self.markdown
                .get(title)
                .map(|body| (title.as_str(), body.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Checks that this set covers exactly the curriculum's module titles,
    /// no more and no fewer.
    pub fn validate_against(&self, curriculum: &Curriculum) -> Result<(), String> {
        for module in &curriculum.modules {
            if !self.markdown.contains_key(&module.title) {
                return Err(format!("missing content for module \"{}\"", module.title));
            }
        }
        if self.markdown.len() != curriculum.modules.len() {
            let expected: Vec<&str> = curriculum.module_titles().collect();
            let stray = self
                .order
                .iter()
                .find(|title| !expected.contains(&title.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(format!("content for unknown module \"{stray}\""));
        }
        Ok(())
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// The question text.
    pub question: String,
    /// The possible answers, typically 4.
    pub options: Vec<String>,
    /// Index of the correct option, when the collaborator reports it. Never
    /// exposed through a snapshot until feedback has been computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
}

/// The quiz produced for a curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Assessment {
    /// The title of the assessment quiz.
    pub title: String,
    /// The multiple-choice questions.
    pub questions: Vec<Question>,
}

impl Assessment {
    /// Structural check on a collaborator payload.
    pub fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("assessment has no questions".to_string());
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(format!("question {index} has fewer than two options"));
            }
            if let Some(correct) = question.correct_index {
                if correct >= question.options.len() {
                    return Err(format!(
                        "question {index} marks option {correct} correct but has only {} options",
                        question.options.len()
                    ));
                }
            }
        }
        Ok(())
    }

    /// A copy with all correct-answer metadata stripped, safe to hand to the
    /// user-facing read path.
    pub fn redacted(&self) -> Assessment {
        Assessment {
            title: self.title.clone(),
            questions: self
                .questions
                .iter()
                .map(|question| Question {
                    question: question.question.clone(),
                    options: question.options.clone(),
                    correct_index: None,
                })
                .collect(),
        }
    }

    /// Question indices not covered by `answers`, in ascending order.
    pub fn unanswered(&self, answers: &UserAnswers) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|index| !answers.contains_key(index))
            .collect()
    }
}

/// Question index to the chosen option text, supplied once and in full.
pub type UserAnswers = BTreeMap<usize, String>;

/// Graded result for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionFeedback {
    pub is_correct: bool,
    /// The text of the correct option.
    pub correct_answer: String,
    /// Why the correct answer is correct.
    pub explanation: String,
    /// A study suggestion when the answer was wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Graded feedback for a full set of answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Feedback {
    /// Score in percent, `0.0..=100.0`.
    pub overall_score: f32,
    /// One entry per assessment question, in question order.
    pub per_question: Vec<QuestionFeedback>,
}

impl Feedback {
    /// Structural check: the grading must cover exactly the assessment's
    /// questions.
    pub fn validate_against(&self, assessment: &Assessment) -> Result<(), String> {
        if self.per_question.len() != assessment.questions.len() {
            return Err(format!(
                "feedback covers {} questions, assessment has {}",
                self.per_question.len(),
                assessment.questions.len()
            ));
        }
        if !(0.0..=100.0).contains(&self.overall_score) {
            return Err(format!("overall score {} out of range", self.overall_score));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_curriculum() -> Curriculum {
        Curriculum {
            title: "Quantum Computing: A Guided Course".to_string(),
            modules: vec![
                Module {
                    title: "Qubits".to_string(),
                    description: "What a qubit is.".to_string(),
                },
                Module {
                    title: "Gates".to_string(),
                    description: "Manipulating qubits.".to_string(),
                },
                Module {
                    title: "Algorithms".to_string(),
                    description: "Putting gates to work.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn curriculum_validation_rejects_empty_and_duplicate_modules() {
        let mut curriculum = sample_curriculum();
        assert!(curriculum.validate().is_ok());

        curriculum.modules.clear();
        assert!(curriculum.validate().is_err());

        let mut duplicated = sample_curriculum();
        duplicated.modules[1].title = "Qubits".to_string();
        let err = duplicated.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn content_set_keeps_insertion_order() {
        let mut content = ContentSet::new();
        content.insert("Gates", "# Gates");
        content.insert("Qubits", "# Qubits");
        content.insert("Gates", "# Gates, revised");

        assert_eq!(content.module_titles(), ["Gates", "Qubits"]);
        assert_eq!(content.get("Gates"), Some("# Gates, revised"));
        assert_eq!(content.len(), 2);
    }

    #[test]
    fn content_must_cover_exactly_the_curriculum() {
        let curriculum = sample_curriculum();

        let mut partial = ContentSet::new();
        partial.insert("Qubits", "...");
        partial.insert("Gates", "...");
        let err = partial.validate_against(&curriculum).unwrap_err();
        assert!(err.contains("Algorithms"));

        let mut stray = ContentSet::new();
        for title in ["Qubits", "Gates", "Algorithms", "History"] {
            stray.insert(title, "...");
        }
        let err = stray.validate_against(&curriculum).unwrap_err();
        assert!(err.contains("History"));

        let mut exact = ContentSet::new();
        for title in ["Qubits", "Gates", "Algorithms"] {
            exact.insert(title, "...");
        }
        assert!(exact.validate_against(&curriculum).is_ok());
    }

    #[test]
    fn assessment_validation_checks_options_and_correct_index() {
        let mut assessment = Assessment {
            title: "Checkpoint".to_string(),
            questions: vec![Question {
                question: "Pick one".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                correct_index: Some(1),
            }],
        };
        assert!(assessment.validate().is_ok());

        assessment.questions[0].correct_index = Some(2);
        assert!(assessment.validate().is_err());

        assessment.questions.clear();
        assert!(assessment.validate().is_err());
    }

    #[test]
    fn redaction_strips_correct_answers() {
        let assessment = Assessment {
            title: "Checkpoint".to_string(),
            questions: vec![Question {
                question: "Pick one".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                correct_index: Some(0),
            }],
        };
        let redacted = assessment.redacted();
        assert_eq!(redacted.questions[0].correct_index, None);

        let json = serde_json::to_string(&redacted).unwrap();
        assert!(!json.contains("correct_index"));
    }

    #[test]
    fn unanswered_lists_missing_indices() {
        let assessment = Assessment {
            title: "Checkpoint".to_string(),
            questions: (0..5)
                .map(|i| Question {
                    question: format!("Q{i}"),
                    options: vec!["A".to_string(), "B".to_string()],
                    correct_index: None,
                })
                .collect(),
        };
        let mut answers = UserAnswers::new();
        answers.insert(0, "A".to_string());
        answers.insert(3, "B".to_string());
        assert_eq!(assessment.unanswered(&answers), vec![1, 2, 4]);
    }

    #[test]
    fn feedback_arity_must_match_the_assessment() {
        let assessment = Assessment {
            title: "Checkpoint".to_string(),
            questions: (0..2)
                .map(|i| Question {
                    question: format!("Q{i}"),
                    options: vec!["A".to_string(), "B".to_string()],
                    correct_index: Some(0),
                })
                .collect(),
        };
        let feedback = Feedback {
            overall_score: 50.0,
            per_question: vec![QuestionFeedback {
                is_correct: true,
                correct_answer: "A".to_string(),
                explanation: "A is right.".to_string(),
                suggestion: None,
            }],
        };
        assert!(feedback.validate_against(&assessment).is_err());
    }
}
