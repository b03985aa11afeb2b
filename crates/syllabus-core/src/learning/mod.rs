//! Per-user learning paths.

pub mod model;

pub use model::{
    CreateLearningPathRequest, LearningPath, LearningPathStep, PathStatus,
    UpdateLearningPathRequest,
};
