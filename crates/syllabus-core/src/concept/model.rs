//! Concept domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::validation::{Checks, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// A node in the curriculum knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Concept {
    pub fn new(id: impl Into<String>, name: impl Into<String>, concept_type: ConceptType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            concept_type,
            description: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Concept layer. The first five form the CONTAINS hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConceptType {
    Subject,
    Matter,
    Molecule,
    Atom,
    Particle,
    Grade,
    Topic,
}

impl ConceptType {
    pub const ALL: [ConceptType; 7] = [
        Self::Subject,
        Self::Matter,
        Self::Molecule,
        Self::Atom,
        Self::Particle,
        Self::Grade,
        Self::Topic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "Subject",
            Self::Matter => "Matter",
            Self::Molecule => "Molecule",
            Self::Atom => "Atom",
            Self::Particle => "Particle",
            Self::Grade => "Grade",
            Self::Topic => "Topic",
        }
    }

    /// The only type a CONTAINS child of this type may have.
    pub fn child_type(&self) -> Option<ConceptType> {
        match self {
            Self::Subject => Some(Self::Matter),
            Self::Matter => Some(Self::Molecule),
            Self::Molecule => Some(Self::Atom),
            Self::Atom => Some(Self::Particle),
            Self::Grade => Some(Self::Topic),
            Self::Particle | Self::Topic => None,
        }
    }

    pub fn can_contain(&self, child: ConceptType) -> bool {
        self.child_type() == Some(child)
    }

    /// Hierarchy layers below Subject; each needs exactly one CONTAINS parent.
    pub fn requires_parent(&self) -> bool {
        matches!(self, Self::Matter | Self::Molecule | Self::Atom | Self::Particle)
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConceptType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| CatalogError::validation("type", format!("unknown concept type '{}'", s)))
    }
}

/// Payload for `POST /concepts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConceptRequest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
    pub description: Option<String>,
    /// Optional CONTAINS parent; must be of the layer directly above.
    pub parent_id: Option<String>,
}

impl CreateConceptRequest {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut checks = Checks::new();
        checks
            .business_id("id", &self.id)
            .length("name", &self.name, 1, MAX_NAME_LEN)
            .optional_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        if let Some(parent) = &self.parent_id {
            checks.business_id("parentId", parent);
        }
        checks.finish()
    }

    pub fn into_concept(self) -> Concept {
        Concept {
            id: self.id,
            name: self.name.trim().to_string(),
            concept_type: self.concept_type,
            description: self.description,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Payload for `PUT /concepts/{id}`. The business key and type are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConceptRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateConceptRequest {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut checks = Checks::new();
        if let Some(name) = &self.name {
            checks.length("name", name, 1, MAX_NAME_LEN);
        }
        checks.optional_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        checks.finish()
    }

    pub fn apply(&self, concept: &mut Concept) {
        if let Some(name) = &self.name {
            concept.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            concept.description = Some(description.clone());
        }
        concept.updated_at = Some(Utc::now());
    }
}

/// Payload for `POST /concepts/{id}/prerequisites`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPrerequisiteRequest {
    pub prerequisite_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_rules() {
        assert!(ConceptType::Subject.can_contain(ConceptType::Matter));
        assert!(ConceptType::Atom.can_contain(ConceptType::Particle));
        assert!(!ConceptType::Molecule.can_contain(ConceptType::Particle));
        assert_eq!(ConceptType::Particle.child_type(), None);
        assert!(ConceptType::Grade.can_contain(ConceptType::Topic));
    }

    #[test]
    fn test_parse_type_case_insensitive() {
        assert_eq!("atom".parse::<ConceptType>().unwrap(), ConceptType::Atom);
        assert_eq!(" Subject ".parse::<ConceptType>().unwrap(), ConceptType::Subject);
        assert!("Electron".parse::<ConceptType>().is_err());
    }

    #[test]
    fn test_concept_wire_format() {
        let concept = Concept::new("OLM001", "Ordinary Level Mathematics", ConceptType::Subject);
        let json = serde_json::to_value(&concept).unwrap();
        assert_eq!(json["id"], "OLM001");
        assert_eq!(json["type"], "Subject");
        assert!(json["createdAt"].is_string());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let json = r#"{"id":"atm9","name":"","type":"Atom"}"#;
        let req: CreateConceptRequest = serde_json::from_str(json).unwrap();
        match req.validate().unwrap_err() {
            CatalogError::Validation(fields) => assert_eq!(fields.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_create_request_rejects_unknown_type() {
        let json = r#"{"id":"ATM009","name":"Sets","type":"Electron"}"#;
        assert!(serde_json::from_str::<CreateConceptRequest>(json).is_err());
    }

    #[test]
    fn test_update_applies_fields() {
        let mut concept = Concept::new("ATM001", "Sets", ConceptType::Atom);
        let req = UpdateConceptRequest {
            name: Some("  Set Theory ".to_string()),
            description: None,
        };
        req.validate().unwrap();
        req.apply(&mut concept);
        assert_eq!(concept.name, "Set Theory");
        assert!(concept.updated_at.is_some());
    }
}
