//! Script registry, dependency ordering and sequential execution.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{SetupError, SetupResult};
use crate::script::{SetupContext, SetupScript};

/// What to run and how to react to failures.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Requested scripts; empty means every registered script.
    pub scripts: Vec<String>,
    pub continue_on_error: bool,
}

/// Outcome of one script.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptResult {
    pub name: String,
    pub success: bool,
    #[serde(rename = "durationMs", serialize_with = "as_millis")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionSummary {
    pub results: Vec<ScriptResult>,
    /// Scripts left unrun after an aborting failure.
    pub skipped: Vec<String>,
    #[serde(rename = "totalDurationMs", serialize_with = "as_millis")]
    pub total_duration: Duration,
}

impl ExecutionSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped.is_empty()
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Registry of setup scripts in registration order.
#[derive(Default)]
pub struct SetupRunner {
    scripts: Vec<Box<dyn SetupScript>>,
    index: HashMap<String, usize>,
}

impl SetupRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, script: Box<dyn SetupScript>) -> SetupResult<()> {
        let name = script.name().to_string();
        if self.index.contains_key(&name) {
            return Err(SetupError::DuplicateScript(name));
        }
        self.index.insert(name, self.scripts.len());
        self.scripts.push(script);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn SetupScript> {
        self.index.get(name).map(|&i| self.scripts[i].as_ref())
    }

    pub fn scripts(&self) -> impl Iterator<Item = &dyn SetupScript> {
        self.scripts.iter().map(|s| s.as_ref())
    }

    /// Expand `requested` so every dependency precedes its dependents.
    ///
    /// Depth-first, dependencies first, duplicates dropped at their first
    /// position. An empty request expands every registered script.
    pub fn resolve(&self, requested: &[String]) -> SetupResult<Vec<String>> {
        let roots: Vec<String> = if requested.is_empty() {
            self.scripts.iter().map(|s| s.name().to_string()).collect()
        } else {
            requested.to_vec()
        };

        let mut order = Vec::new();
        let mut done = HashSet::new();
        let mut visiting = Vec::new();
        for name in &roots {
            if !self.index.contains_key(name) {
                return Err(SetupError::UnknownScript(name.clone()));
            }
            self.visit(name, &mut order, &mut done, &mut visiting)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        order: &mut Vec<String>,
        done: &mut HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> SetupResult<()> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = visiting.iter().position(|v| v == name) {
            let mut cycle = visiting[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(SetupError::DependencyCycle(cycle));
        }

        let script = self
            .get(name)
            .ok_or_else(|| SetupError::UnknownScript(name.to_string()))?;

        visiting.push(name.to_string());
        for dep in script.depends_on() {
            if !self.index.contains_key(*dep) {
                return Err(SetupError::UnknownDependency {
                    script: name.to_string(),
                    dependency: dep.to_string(),
                });
            }
            self.visit(dep, order, done, visiting)?;
        }
        visiting.pop();

        done.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }

    /// Run the resolved scripts one after another.
    ///
    /// The store must answer a health check first. Without
    /// `continue_on_error` the first failure stops the run and the rest are
    /// reported as skipped. Nothing is rolled back.
    pub async fn execute(&self, ctx: &SetupContext, options: &ExecuteOptions) -> SetupResult<ExecutionSummary> {
        let order = self.resolve(&options.scripts)?;
        info!(scripts = ?order, continue_on_error = options.continue_on_error, "Starting setup run");

        ctx.store
            .health_check()
            .await
            .map_err(|e| SetupError::Connection(format!("{:#}", e)))?;

        let started = Instant::now();
        let mut results = Vec::with_capacity(order.len());
        let mut skipped = Vec::new();

        for (i, name) in order.iter().enumerate() {
            let script = self
                .get(name)
                .ok_or_else(|| SetupError::UnknownScript(name.clone()))?;

            debug!(script = %name, "Running setup script");
            let script_started = Instant::now();
            let outcome = script.run(ctx).await;
            let duration = script_started.elapsed();

            match outcome {
                Ok(()) => {
                    info!(script = %name, elapsed_ms = duration.as_millis() as u64, "Script succeeded");
                    results.push(ScriptResult {
                        name: name.clone(),
                        success: true,
                        duration,
                        error: None,
                    });
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    error!(script = %name, error = %message, "Script failed");
                    results.push(ScriptResult {
                        name: name.clone(),
                        success: false,
                        duration,
                        error: Some(message),
                    });
                    if !options.continue_on_error {
                        skipped = order[i + 1..].to_vec();
                        if !skipped.is_empty() {
                            warn!(skipped = ?skipped, "Aborting setup run");
                        }
                        break;
                    }
                }
            }
        }

        let summary = ExecutionSummary {
            results,
            skipped,
            total_duration: started.elapsed(),
        };
        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            skipped = summary.skipped.len(),
            "Setup run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use syllabus_graph::MemoryStore;

    use crate::config::SetupConfig;

    struct Stub {
        name: &'static str,
        deps: &'static [&'static str],
        fail: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SetupScript for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn depends_on(&self) -> &[&'static str] {
            self.deps
        }

        async fn run(&self, _ctx: &SetupContext) -> Result<()> {
            self.log.lock().unwrap().push(self.name.to_string());
            if self.fail {
                bail!("{} exploded", self.name);
            }
            Ok(())
        }
    }

    fn runner(specs: &[(&'static str, &'static [&'static str], bool)]) -> (SetupRunner, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runner = SetupRunner::new();
        for &(name, deps, fail) in specs {
            runner
                .register(Box::new(Stub {
                    name,
                    deps,
                    fail,
                    log: log.clone(),
                }))
                .unwrap();
        }
        (runner, log)
    }

    fn ctx() -> SetupContext {
        SetupContext::new(Arc::new(MemoryStore::new()), SetupConfig::default())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dependency_runs_first() {
        let (runner, _) = runner(&[("a", &[], false), ("b", &["a"], false)]);
        assert_eq!(runner.resolve(&names(&["b"])).unwrap(), names(&["a", "b"]));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let (runner, _) = runner(&[
            ("a", &[], false),
            ("b", &["a"], false),
            ("c", &["a", "b"], false),
        ]);
        assert_eq!(
            runner.resolve(&names(&["c", "a", "b"])).unwrap(),
            names(&["a", "b", "c"])
        );
    }

    #[test]
    fn test_empty_request_expands_all() {
        let (runner, _) = runner(&[("b", &["a"], false), ("a", &[], false)]);
        assert_eq!(runner.resolve(&[]).unwrap(), names(&["a", "b"]));
    }

    #[test]
    fn test_cycle_detected() {
        let (runner, _) = runner(&[
            ("a", &["c"], false),
            ("b", &["a"], false),
            ("c", &["b"], false),
        ]);
        match runner.resolve(&names(&["a"])).unwrap_err() {
            SetupError::DependencyCycle(path) => assert_eq!(path, names(&["a", "c", "b", "a"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_scripts() {
        let (runner, _) = runner(&[("a", &["ghost"], false)]);
        assert!(matches!(
            runner.resolve(&names(&["zzz"])),
            Err(SetupError::UnknownScript(_))
        ));
        assert!(matches!(
            runner.resolve(&names(&["a"])),
            Err(SetupError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let (mut runner, log) = runner(&[("a", &[], false)]);
        let again = Stub { name: "a", deps: &[], fail: false, log };
        assert!(matches!(
            runner.register(Box::new(again)),
            Err(SetupError::DuplicateScript(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_stops_run() {
        let (runner, log) = runner(&[
            ("a", &[], false),
            ("b", &["a"], true),
            ("c", &["b"], false),
        ]);
        let summary = runner
            .execute(&ctx(), &ExecuteOptions { scripts: names(&["c"]), continue_on_error: false })
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), names(&["a", "b"]));
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped, names(&["c"]));
        assert!(summary.results[1].error.as_deref().unwrap().contains("b exploded"));
        assert!(!summary.is_success());
    }

    #[tokio::test]
    async fn test_continue_on_error_runs_everything() {
        let (runner, log) = runner(&[
            ("a", &[], true),
            ("b", &[], false),
            ("c", &[], false),
        ]);
        let summary = runner
            .execute(&ctx(), &ExecuteOptions { scripts: vec![], continue_on_error: true })
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), names(&["a", "b", "c"]));
        assert_eq!(summary.results.len(), 3);
        assert_eq!(summary.failed(), 1);
        assert!(summary.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_fatal() {
        let (runner, log) = runner(&[("a", &[], false)]);
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let ctx = SetupContext::new(store, SetupConfig::default());

        let err = runner.execute(&ctx, &ExecuteOptions::default()).await.unwrap_err();
        assert!(matches!(err, SetupError::Connection(_)));
        assert!(log.lock().unwrap().is_empty());
    }
}
