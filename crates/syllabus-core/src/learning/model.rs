//! Learning path models.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::validation::{Checks, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// A per-user plan of study steps toward a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub id: String,
    pub user_id: String,
    pub goal: String,
    pub status: PathStatus,
    pub steps: Vec<LearningPathStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathStep {
    pub step_number: u32,
    pub concept_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Processing,
    Completed,
    Failed,
}

impl PathStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }

    /// Transition to `next`. Re-applying the current status is a no-op.
    pub fn transition(self, next: PathStatus) -> CatalogResult<PathStatus> {
        if self == next || !self.is_terminal() {
            Ok(next)
        } else {
            Err(CatalogError::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl LearningPath {
    /// Steps sorted by `stepNumber`.
    pub fn sort_steps(&mut self) {
        self.steps.sort_by_key(|s| s.step_number);
    }
}

/// Payload for `POST /learning-paths`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLearningPathRequest {
    pub goal: String,
    #[serde(default)]
    pub status: Option<PathStatus>,
    #[serde(default)]
    pub steps: Vec<LearningPathStep>,
}

impl CreateLearningPathRequest {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut checks = Checks::new();
        checks.length("goal", &self.goal, 1, MAX_NAME_LEN);
        validate_steps(&mut checks, &self.steps);
        checks.finish()
    }

    pub fn into_path(self, user_id: &str) -> LearningPath {
        let now = Utc::now();
        let mut path = LearningPath {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            goal: self.goal.trim().to_string(),
            status: self.status.unwrap_or(PathStatus::Processing),
            steps: self.steps,
            created_at: now,
            updated_at: now,
        };
        path.sort_steps();
        path
    }
}

/// Payload for `PUT /learning-paths/{id}`. `steps` replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLearningPathRequest {
    pub goal: Option<String>,
    pub status: Option<PathStatus>,
    pub steps: Option<Vec<LearningPathStep>>,
}

impl UpdateLearningPathRequest {
    pub fn apply(&self, current: &LearningPath) -> CatalogResult<LearningPath> {
        let mut checks = Checks::new();
        if let Some(goal) = &self.goal {
            checks.length("goal", goal, 1, MAX_NAME_LEN);
        }
        if let Some(steps) = &self.steps {
            validate_steps(&mut checks, steps);
        }
        checks.finish()?;

        let mut updated = current.clone();
        if let Some(status) = self.status {
            updated.status = current.status.transition(status)?;
        }
        if let Some(goal) = &self.goal {
            updated.goal = goal.trim().to_string();
        }
        if let Some(steps) = &self.steps {
            updated.steps = steps.clone();
        }
        updated.sort_steps();
        updated.updated_at = Utc::now();
        Ok(updated)
    }
}

fn validate_steps(checks: &mut Checks, steps: &[LearningPathStep]) {
    let mut numbers = HashSet::new();
    for (i, step) in steps.iter().enumerate() {
        let field = format!("steps[{}]", i);
        if step.step_number == 0 {
            checks.fail(&format!("{field}.stepNumber"), "must be >= 1");
        } else if !numbers.insert(step.step_number) {
            checks.fail(&format!("{field}.stepNumber"), "duplicate step number");
        }
        checks
            .business_id(&format!("{field}.conceptId"), &step.concept_id)
            .length(&format!("{field}.title"), &step.title, 1, MAX_NAME_LEN)
            .optional_length(
                &format!("{field}.description"),
                step.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: u32, concept: &str) -> LearningPathStep {
        LearningPathStep {
            step_number: n,
            concept_id: concept.to_string(),
            title: format!("Step {}", n),
            description: None,
        }
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            PathStatus::Processing.transition(PathStatus::Completed).unwrap(),
            PathStatus::Completed
        );
        assert_eq!(
            PathStatus::Completed.transition(PathStatus::Completed).unwrap(),
            PathStatus::Completed
        );
        assert!(PathStatus::Completed.transition(PathStatus::Processing).is_err());
        assert!(PathStatus::Failed.transition(PathStatus::Completed).is_err());
    }

    #[test]
    fn test_create_defaults_to_processing() {
        let req: CreateLearningPathRequest =
            serde_json::from_str(r#"{"goal":"Pass algebra"}"#).unwrap();
        req.validate().unwrap();
        let path = req.into_path("user-1");
        assert_eq!(path.status, PathStatus::Processing);
        assert!(path.steps.is_empty());
    }

    #[test]
    fn test_update_replaces_and_orders_steps() {
        let path = CreateLearningPathRequest {
            goal: "Pass algebra".into(),
            status: None,
            steps: vec![],
        }
        .into_path("user-1");

        let update = UpdateLearningPathRequest {
            goal: None,
            status: Some(PathStatus::Completed),
            steps: Some(vec![step(3, "ATM003"), step(1, "ATM001"), step(2, "ATM002")]),
        };
        let updated = update.apply(&path).unwrap();
        assert_eq!(updated.status, PathStatus::Completed);
        let numbers: Vec<_> = updated.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_step_numbers_rejected() {
        let req = CreateLearningPathRequest {
            goal: "Geometry".into(),
            status: None,
            steps: vec![step(1, "ATM001"), step(1, "ATM002")],
        };
        assert!(matches!(req.validate(), Err(CatalogError::Validation(_))));
    }
}
