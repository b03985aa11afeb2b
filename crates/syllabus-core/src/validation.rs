//! Field-level validation for request payloads.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// Business key format for catalog entities, e.g. `PAR001`.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}[0-9]{3}$").expect("static regex"));

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collects field errors so a payload reports every problem at once.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Trimmed length must be within `min..=max` characters.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len < min {
            if min == 1 {
                self.fail(field, "must not be empty");
            } else {
                self.fail(field, format!("must be at least {} characters", min));
            }
        } else if len > max {
            self.fail(field, format!("must be at most {} characters", max));
        }
        self
    }

    pub fn optional_length(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.fail(field, format!("must be at most {} characters", max));
            }
        }
        self
    }

    pub fn business_id(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_business_id(value) {
            self.fail(field, "must match the pattern AAA000 (three capitals, three digits)");
        }
        self
    }

    /// Absolute http/https URL.
    pub fn http_url(&mut self, field: &str, value: &str) -> &mut Self {
        match url::Url::parse(value) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
            Ok(_) => {
                self.fail(field, "must use the http or https scheme");
            }
            Err(_) => {
                self.fail(field, "must be a valid URL");
            }
        }
        self
    }

    pub fn range_i64(&mut self, field: &str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.fail(field, format!("must be between {} and {}", min, max));
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: f64) -> &mut Self {
        if !value.is_finite() || value < 0.0 {
            self.fail(field, "must be a non-negative number");
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> CatalogResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self.errors))
        }
    }
}

/// Whether `value` is a well-formed business key.
pub fn is_business_id(value: &str) -> bool {
    ID_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_id() {
        assert!(is_business_id("PAR001"));
        assert!(is_business_id("OLM001"));
        assert!(!is_business_id("par001"));
        assert!(!is_business_id("PA001"));
        assert!(!is_business_id("PAR0001"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut checks = Checks::new();
        checks
            .length("name", "   ", 1, MAX_NAME_LEN)
            .http_url("url", "ftp://example.com/file")
            .range_i64("grade", 14, 1, 13)
            .non_negative("price", -1.0);

        let err = checks.finish().unwrap_err();
        match err {
            CatalogError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["name", "url", "grade", "price"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_url() {
        let mut checks = Checks::new();
        checks.http_url("url", "https://example.com/videos/algebra");
        assert!(checks.is_empty());

        let mut checks = Checks::new();
        checks.http_url("url", "not a url");
        assert!(!checks.is_empty());
    }

    #[test]
    fn test_length_upper_bound() {
        let mut checks = Checks::new();
        checks.length("name", &"x".repeat(MAX_NAME_LEN + 1), 1, MAX_NAME_LEN);
        assert!(checks.finish().is_err());
    }
}
