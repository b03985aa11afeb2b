//! Learning resource models.

use serde::{Deserialize, Serialize};

use crate::error::CatalogResult;
use crate::validation::{Checks, MAX_NAME_LEN};

pub const MIN_GRADE: i64 = 1;
pub const MAX_GRADE: i64 = 13;

/// A study resource that explains a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub resource_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub url: String,
    pub price: f64,
    pub grade: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Video,
    Article,
    Pdf,
    Exercise,
    Quiz,
    Book,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Article => "article",
            Self::Pdf => "pdf",
            Self::Exercise => "exercise",
            Self::Quiz => "quiz",
            Self::Book => "book",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "video" => Some(Self::Video),
            "article" => Some(Self::Article),
            "pdf" => Some(Self::Pdf),
            "exercise" => Some(Self::Exercise),
            "quiz" => Some(Self::Quiz),
            "book" => Some(Self::Book),
            _ => None,
        }
    }
}

impl Resource {
    pub fn validate(&self) -> CatalogResult<()> {
        let mut checks = Checks::new();
        checks
            .length("resourceId", &self.resource_id, 1, 64)
            .length("title", &self.title, 1, MAX_NAME_LEN)
            .http_url("url", &self.url)
            .non_negative("price", self.price)
            .range_i64("grade", self.grade, MIN_GRADE, MAX_GRADE);
        if let Some(topic) = &self.topic_id {
            checks.business_id("topicId", topic);
        }
        checks.finish()
    }
}

/// Payload for `PUT /resources/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub grade: Option<i64>,
    pub topic_id: Option<String>,
}

impl UpdateResourceRequest {
    /// Apply onto a copy of `current` and validate the result.
    pub fn apply(&self, current: &Resource) -> CatalogResult<Resource> {
        let mut updated = current.clone();
        if let Some(title) = &self.title {
            updated.title = title.trim().to_string();
        }
        if let Some(t) = self.resource_type {
            updated.resource_type = t;
        }
        if let Some(url) = &self.url {
            updated.url = url.clone();
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if let Some(grade) = self.grade {
            updated.grade = grade;
        }
        if let Some(topic) = &self.topic_id {
            updated.topic_id = Some(topic.clone());
        }
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Resource {
        Resource {
            resource_id: "res-algebra-1".to_string(),
            title: "Solving linear equations".to_string(),
            resource_type: ResourceType::Video,
            url: "https://example.com/v/linear".to_string(),
            price: 0.0,
            grade: 9,
            topic_id: Some("TOP001".to_string()),
        }
    }

    #[test]
    fn test_valid_resource() {
        sample().validate().unwrap();
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["resourceId"], "res-algebra-1");
        assert_eq!(json["type"], "video");
        assert_eq!(json["topicId"], "TOP001");
    }

    #[test]
    fn test_update_revalidates() {
        let update = UpdateResourceRequest {
            grade: Some(20),
            ..Default::default()
        };
        assert!(update.apply(&sample()).is_err());

        let update = UpdateResourceRequest {
            price: Some(4.5),
            resource_type: Some(ResourceType::Book),
            ..Default::default()
        };
        let updated = update.apply(&sample()).unwrap();
        assert_eq!(updated.price, 4.5);
        assert_eq!(updated.resource_type, ResourceType::Book);
    }
}
