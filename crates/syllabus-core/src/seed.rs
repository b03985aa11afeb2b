//! Flat seed documents loaded next to the concept hierarchy.
//!
//! Each document is a JSON file in the data directory:
//! - `grades-topics.json`: grades, their topics and SAME_AS links
//! - `prerequisites.json`: HAS_PREREQUISITE pairs
//! - `resources.json`: resources with the topic they explain
//! - `questions.json`: questions with the concept they assess

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::question::Question;
use crate::resource::Resource;

pub const HIERARCHY_FILE: &str = "concepts-hierarchy.json";
pub const GRADES_FILE: &str = "grades-topics.json";
pub const PREREQUISITES_FILE: &str = "prerequisites.json";
pub const RESOURCES_FILE: &str = "resources.json";
pub const QUESTIONS_FILE: &str = "questions.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub topics: Vec<TopicSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical concept this topic duplicates, by id or by name.
    #[serde(default)]
    pub same_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteSeed {
    pub concept_id: String,
    pub prerequisite_id: String,
}

/// Read a JSON seed document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CatalogResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CatalogError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_grades(dir: &Path) -> CatalogResult<Vec<GradeSeed>> {
    load_json(&dir.join(GRADES_FILE))
}

pub fn load_prerequisites(dir: &Path) -> CatalogResult<Vec<PrerequisiteSeed>> {
    load_json(&dir.join(PREREQUISITES_FILE))
}

pub fn load_resources(dir: &Path) -> CatalogResult<Vec<Resource>> {
    let resources: Vec<Resource> = load_json(&dir.join(RESOURCES_FILE))?;
    for resource in &resources {
        resource.validate()?;
    }
    Ok(resources)
}

pub fn load_questions(dir: &Path) -> CatalogResult<Vec<Question>> {
    let questions: Vec<Question> = load_json(&dir.join(QUESTIONS_FILE))?;
    for question in &questions {
        question.validate()?;
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_grades() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(GRADES_FILE),
            r#"[{"id":"GRD010","name":"Grade 10","topics":[
                {"id":"TOP001","name":"Linear equations","sameAs":"MOL001"}]}]"#,
        )
        .unwrap();

        let grades = load_grades(dir.path()).unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].topics[0].same_as.as_deref(), Some("MOL001"));
    }

    #[test]
    fn test_invalid_resource_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(RESOURCES_FILE),
            r#"[{"resourceId":"r1","title":"Bad","type":"video","url":"nope","price":0,"grade":9}]"#,
        )
        .unwrap();

        assert!(matches!(
            load_resources(dir.path()),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prerequisites(dir.path()).unwrap_err();
        assert!(err.to_string().contains(PREREQUISITES_FILE));
    }
}
