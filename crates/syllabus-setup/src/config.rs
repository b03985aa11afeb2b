//! Setup configuration read from the environment.

use std::path::PathBuf;

use serde::Serialize;
use syllabus_core::seed::HIERARCHY_FILE;
use syllabus_graph::GraphConfig;

use crate::error::{SetupError, SetupResult};

pub const DEFAULT_ROOT_ID: &str = "OLM001";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Effective settings for a setup run.
#[derive(Debug, Clone, Serialize)]
pub struct SetupConfig {
    #[serde(skip)]
    pub graph: GraphConfig,
    pub drop_existing_data: bool,
    pub seed_data: bool,
    pub continue_on_error: bool,
    pub verbose: bool,
    pub data_dir: PathBuf,
    /// Overrides `<data_dir>/concepts-hierarchy.json`.
    pub hierarchy_path: Option<PathBuf>,
    pub root_id: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            drop_existing_data: false,
            seed_data: true,
            continue_on_error: false,
            verbose: false,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            hierarchy_path: None,
            root_id: DEFAULT_ROOT_ID.to_string(),
        }
    }
}

impl SetupConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> SetupResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> SetupResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(uri) = lookup("NEO4J_URI") {
            config.graph.uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USERNAME") {
            config.graph.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            config.graph.password = password;
        }
        if let Some(database) = lookup("NEO4J_DATABASE") {
            config.graph.database = database;
        }
        if let Some(dir) = lookup("SYLLABUS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(root) = lookup("SYLLABUS_ROOT_ID") {
            config.root_id = root;
        }

        let flag = |key: &str, default: bool| -> SetupResult<bool> {
            match lookup(key) {
                Some(raw) => parse_bool(&raw)
                    .ok_or_else(|| SetupError::Config(format!("{} must be a boolean, got '{}'", key, raw))),
                None => Ok(default),
            }
        };
        config.drop_existing_data = flag("DROP_EXISTING_DATA", config.drop_existing_data)?;
        config.seed_data = flag("SEED_DATA", config.seed_data)?;
        config.continue_on_error = flag("CONTINUE_ON_ERROR", config.continue_on_error)?;
        config.verbose = flag("VERBOSE", config.verbose)?;

        Ok(config)
    }

    pub fn hierarchy_file(&self) -> PathBuf {
        self.hierarchy_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(HIERARCHY_FILE))
    }
}

/// Accepts true/false, 1/0, yes/no, on/off in any case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SetupConfig::from_lookup(|_| None).unwrap();
        assert!(!config.drop_existing_data);
        assert!(config.seed_data);
        assert!(!config.continue_on_error);
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
        assert_eq!(config.hierarchy_file(), PathBuf::from("data/concepts-hierarchy.json"));
    }

    #[test]
    fn test_reads_environment() {
        let config = SetupConfig::from_lookup(lookup_from(&[
            ("NEO4J_URI", "bolt://graph:7687"),
            ("NEO4J_USERNAME", "admin"),
            ("DROP_EXISTING_DATA", "YES"),
            ("SEED_DATA", "0"),
            ("CONTINUE_ON_ERROR", "true"),
            ("SYLLABUS_DATA_DIR", "/srv/curriculum"),
        ]))
        .unwrap();

        assert_eq!(config.graph.uri, "bolt://graph:7687");
        assert_eq!(config.graph.user, "admin");
        assert!(config.drop_existing_data);
        assert!(!config.seed_data);
        assert!(config.continue_on_error);
        assert_eq!(config.data_dir, PathBuf::from("/srv/curriculum"));
    }

    #[test]
    fn test_rejects_bad_flag() {
        let err = SetupConfig::from_lookup(lookup_from(&[("VERBOSE", "loud")])).unwrap_err();
        assert!(err.to_string().contains("VERBOSE"));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("On"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
