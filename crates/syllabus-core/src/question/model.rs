//! Assessment question models.

use serde::{Deserialize, Serialize};

use crate::error::CatalogResult;
use crate::validation::Checks;

const MAX_TEXT_LEN: usize = 1000;

/// A question that assesses one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    pub difficulty: Difficulty,
    pub concept_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    TrueFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::ShortAnswer => "short_answer",
            Self::TrueFalse => "true_false",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "multiple_choice" => Some(Self::MultipleChoice),
            "short_answer" => Some(Self::ShortAnswer),
            "true_false" => Some(Self::TrueFalse),
            _ => None,
        }
    }
}

impl Question {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut checks = Checks::new();
        checks
            .length("questionId", &self.question_id, 1, 64)
            .length("text", &self.text, 1, MAX_TEXT_LEN)
            .length("answer", &self.answer, 1, MAX_TEXT_LEN)
            .business_id("conceptId", &self.concept_id);

        match self.question_type {
            QuestionType::MultipleChoice => {
                if self.options.len() < 2 {
                    checks.fail("options", "multiple choice questions need at least 2 options");
                } else if !self.options.iter().any(|o| o == &self.answer) {
                    checks.fail("answer", "must be one of the options");
                }
            }
            QuestionType::TrueFalse => {
                if !matches!(self.answer.to_lowercase().as_str(), "true" | "false") {
                    checks.fail("answer", "must be 'true' or 'false'");
                }
            }
            QuestionType::ShortAnswer => {}
        }
        checks.finish()
    }
}

/// Payload for `PUT /questions/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub text: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Re-point the ASSESSES edge at another concept.
    pub concept_id: Option<String>,
}

impl UpdateQuestionRequest {
    pub fn apply(&self, current: &Question) -> CatalogResult<Question> {
        let mut updated = current.clone();
        if let Some(text) = &self.text {
            updated.text = text.clone();
        }
        if let Some(options) = &self.options {
            updated.options = options.clone();
        }
        if let Some(answer) = &self.answer {
            updated.answer = answer.clone();
        }
        if let Some(difficulty) = self.difficulty {
            updated.difficulty = difficulty;
        }
        if let Some(concept_id) = &self.concept_id {
            updated.concept_id = concept_id.trim().to_string();
        }
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq() -> Question {
        Question {
            question_id: "q-1".to_string(),
            text: "Solve 2x = 6".to_string(),
            question_type: QuestionType::MultipleChoice,
            options: vec!["2".into(), "3".into(), "4".into()],
            answer: "3".to_string(),
            difficulty: Difficulty::Easy,
            concept_id: "ATM001".to_string(),
        }
    }

    #[test]
    fn test_multiple_choice_answer_in_options() {
        mcq().validate().unwrap();

        let mut bad = mcq();
        bad.answer = "5".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_true_false_answer() {
        let mut q = mcq();
        q.question_type = QuestionType::TrueFalse;
        q.options.clear();
        q.answer = "maybe".to_string();
        assert!(q.validate().is_err());
        q.answer = "True".to_string();
        q.validate().unwrap();
    }

    #[test]
    fn test_update_keeps_invariants() {
        let update = UpdateQuestionRequest {
            options: Some(vec!["only".into()]),
            ..Default::default()
        };
        assert!(update.apply(&mcq()).is_err());
    }

    #[test]
    fn test_update_moves_question_to_concept() {
        let mut detached = mcq();
        detached.concept_id.clear();

        let plain = UpdateQuestionRequest {
            text: Some("Solve 3x = 9".into()),
            ..Default::default()
        };
        assert!(plain.apply(&detached).is_err());

        let repair = UpdateQuestionRequest {
            text: Some("Solve 3x = 9".into()),
            concept_id: Some("ATM002".into()),
            ..Default::default()
        };
        let updated = repair.apply(&detached).unwrap();
        assert_eq!(updated.concept_id, "ATM002");
        assert_eq!(updated.text, "Solve 3x = 9");
    }
}
