//! Assessment questions.

pub mod model;

pub use model::{Difficulty, Question, QuestionType, UpdateQuestionRequest};
