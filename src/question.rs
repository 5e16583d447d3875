use std::collections::HashSet;
use std::fmt;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 3;

const QUESTIONS_JSON: &str = include_str!("../data/questions.json");

/// A single multiple-choice question from the fixed question bank.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    /// Stable 1-based identifier. Narration and selection effects key off this value.
    pub id: u32,
    /// Prompt text, beginning with its ordinal marker ("1. ...").
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// The option that scores a point. Always a member of `options`.
    pub correct_option: String,
}

impl Question {
    /// Prompt text without the leading ordinal marker, used for speech output.
    pub fn spoken_prompt(&self) -> &str {
        strip_ordinal(&self.prompt)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_option == answer
    }

    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|candidate| candidate == option)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.prompt, self.options.join(" | "))
    }
}

/// Removes a leading "12." style marker and the whitespace after it.
/// Text without a marker is returned unchanged.
pub fn strip_ordinal(text: &str) -> &str {
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return text;
    }

    match text[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

#[derive(Debug, serde::Deserialize)]
struct QuestionList {
    questions: Vec<Question>,
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question bank must contain at least one question")]
    Empty,
    #[error("question {id} has {found} options but exactly {expected} are required")]
    OptionCount {
        id: u32,
        expected: usize,
        found: usize,
    },
    #[error("question {id} lists option {option:?} more than once")]
    DuplicateOption { id: u32, option: String },
    #[error("question {id} marks {option:?} as correct but it is not one of its options")]
    MissingCorrectOption { id: u32, option: String },
    #[error("question id {id} is used more than once")]
    DuplicateId { id: u32 },
}

impl PartialEq for QuestionBankError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Parse(_), Self::Parse(_)) => true,
            (Self::Empty, Self::Empty) => true,
            (
                Self::OptionCount {
                    id: left,
                    expected: left_expected,
                    found: left_found,
                },
                Self::OptionCount {
                    id: right,
                    expected: right_expected,
                    found: right_found,
                },
            ) => left == right && left_expected == right_expected && left_found == right_found,
            (
                Self::DuplicateOption {
                    id: left,
                    option: left_option,
                },
                Self::DuplicateOption {
                    id: right,
                    option: right_option,
                },
            ) => left == right && left_option == right_option,
            (
                Self::MissingCorrectOption {
                    id: left,
                    option: left_option,
                },
                Self::MissingCorrectOption {
                    id: right,
                    option: right_option,
                },
            ) => left == right && left_option == right_option,
            (Self::DuplicateId { id: left }, Self::DuplicateId { id: right }) => left == right,
            _ => false,
        }
    }
}

impl Eq for QuestionBankError {}

/// Ordered, validated set of questions. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank after checking every question is well formed.
    ///
    /// # Errors
    /// Returns the first [`QuestionBankError`] found, in question order.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        let mut ids = HashSet::new();
        for question in &questions {
            validate(question)?;
            if !ids.insert(question.id) {
                return Err(QuestionBankError::DuplicateId { id: question.id });
            }
        }

        Ok(Self { questions })
    }

    pub fn from_json(source: &str) -> Result<Self, QuestionBankError> {
        let list: QuestionList = serde_json::from_str(source)?;
        Self::new(list.questions)
    }

    /// The four-question fixture compiled into the crate.
    pub fn builtin() -> Result<Self, QuestionBankError> {
        Self::from_json(QUESTIONS_JSON)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn validate(question: &Question) -> Result<(), QuestionBankError> {
    if question.options.len() != OPTION_COUNT {
        return Err(QuestionBankError::OptionCount {
            id: question.id,
            expected: OPTION_COUNT,
            found: question.options.len(),
        });
    }

    let mut seen = HashSet::new();
    for option in &question.options {
        if !seen.insert(option.as_str()) {
            return Err(QuestionBankError::DuplicateOption {
                id: question.id,
                option: option.clone(),
            });
        }
    }

    if question.option_index(&question.correct_option).is_none() {
        return Err(QuestionBankError::MissingCorrectOption {
            id: question.id,
            option: question.correct_option.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, options: &[&str], correct: &str) -> Question {
        Question {
            id,
            prompt: format!("{}. Sample prompt?", id),
            options: options.iter().map(|option| option.to_string()).collect(),
            correct_option: correct.to_string(),
        }
    }

    #[test]
    fn builtin_bank_has_four_questions() {
        let bank = QuestionBank::builtin().expect("fixture should load");

        assert_eq!(bank.len(), 4);
        let ids: Vec<u32> = bank.questions().iter().map(|question| question.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(bank.questions()[0].correct_option, "Meow-Meow");
        assert_eq!(bank.questions()[3].options[2], "One Hundred");
    }

    #[test]
    fn spoken_prompt_drops_ordinal() {
        let bank = QuestionBank::builtin().expect("fixture should load");

        assert_eq!(
            bank.questions()[1].spoken_prompt(),
            "What would you probably find in your fridge?"
        );
    }

    #[test]
    fn strip_ordinal_leaves_plain_text_alone() {
        assert_eq!(strip_ordinal("What color?"), "What color?");
        assert_eq!(strip_ordinal("12. Twelve"), "Twelve");
        assert_eq!(strip_ordinal("42 is the answer"), "42 is the answer");
        assert_eq!(strip_ordinal(""), "");
    }

    #[test]
    fn rejects_missing_correct_option() {
        let error = QuestionBank::new(vec![question(1, &["a", "b", "c"], "d")])
            .expect_err("correct option must be listed");

        assert_eq!(
            error,
            QuestionBankError::MissingCorrectOption {
                id: 1,
                option: "d".to_string(),
            }
        );
    }

    #[test]
    fn rejects_wrong_option_count() {
        let error = QuestionBank::new(vec![question(2, &["a", "b"], "a")])
            .expect_err("two options are not enough");

        assert!(matches!(
            error,
            QuestionBankError::OptionCount {
                id: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn rejects_duplicate_options_and_ids() {
        let duplicate_option = QuestionBank::new(vec![question(1, &["a", "a", "b"], "a")])
            .expect_err("options must be distinct");
        assert!(matches!(
            duplicate_option,
            QuestionBankError::DuplicateOption { id: 1, .. }
        ));

        let duplicate_id = QuestionBank::new(vec![
            question(1, &["a", "b", "c"], "a"),
            question(1, &["d", "e", "f"], "d"),
        ])
        .expect_err("ids must be unique");
        assert_eq!(duplicate_id, QuestionBankError::DuplicateId { id: 1 });
    }

    #[test]
    fn rejects_empty_and_malformed_sources() {
        assert_eq!(
            QuestionBank::new(Vec::new()).expect_err("empty bank"),
            QuestionBankError::Empty
        );
        assert!(matches!(
            QuestionBank::from_json("{ \"questions\": 3 }").expect_err("bad json"),
            QuestionBankError::Parse(_)
        ));
    }
}
