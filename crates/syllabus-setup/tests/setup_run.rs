//! Full setup runs against the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;

use syllabus_core::ConceptType;
use syllabus_graph::{validate_graph, CatalogStore, MemoryStore};
use syllabus_setup::{builtin_runner, ExecuteOptions, SetupConfig, SetupContext};

fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn context(store: Arc<MemoryStore>, config: SetupConfig) -> SetupContext {
    SetupContext::new(store, config)
}

#[tokio::test]
async fn test_bundled_data_loads_cleanly() {
    let store = Arc::new(MemoryStore::new());
    let config = SetupConfig {
        data_dir: bundled_data_dir(),
        ..SetupConfig::default()
    };
    let runner = builtin_runner().unwrap();

    let summary = runner
        .execute(&context(store.clone(), config), &ExecuteOptions::default())
        .await
        .unwrap();
    for result in &summary.results {
        assert!(result.success, "{} failed: {:?}", result.name, result.error);
    }
    assert_eq!(summary.results.len(), 8);

    let root = store.get_concept("OLM001").await.unwrap().unwrap();
    assert_eq!(root.name, "Ordinary Level Mathematics");
    assert_eq!(root.concept_type, ConceptType::Subject);

    let children = store.get_children("MOL001").await.unwrap();
    assert!(!children.is_empty());
    assert!(children.iter().all(|c| c.concept_type == ConceptType::Atom));

    let prereqs = store.get_prerequisites("ATM002").await.unwrap();
    assert_eq!(prereqs.len(), 1);
    assert_eq!(prereqs[0].id, "ATM001");

    assert_eq!(store.list_resources(Some("TOP001")).await.unwrap().len(), 1);
    assert_eq!(store.list_questions(Some("ATM002")).await.unwrap().len(), 1);

    let report = validate_graph(store.as_ref(), "OLM001").await.unwrap();
    assert!(report.is_healthy(), "{:?}", report.issues());
    assert_eq!(report.tree_size, 25);
    assert_eq!(report.max_depth, 4);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let config = SetupConfig {
        data_dir: bundled_data_dir(),
        ..SetupConfig::default()
    };
    let runner = builtin_runner().unwrap();
    let ctx = context(store.clone(), config);

    runner.execute(&ctx, &ExecuteOptions::default()).await.unwrap();
    let concepts = store.count_concepts().await.unwrap();
    let contains = store.count_contains().await.unwrap();

    let again = runner.execute(&ctx, &ExecuteOptions::default()).await.unwrap();
    assert!(again.is_success());
    assert_eq!(store.count_concepts().await.unwrap(), concepts);
    assert_eq!(store.count_contains().await.unwrap(), contains);
}

#[tokio::test]
async fn test_seeding_disabled_only_imports_hierarchy() {
    let store = Arc::new(MemoryStore::new());
    let config = SetupConfig {
        data_dir: bundled_data_dir(),
        seed_data: false,
        ..SetupConfig::default()
    };
    let runner = builtin_runner().unwrap();
    let summary = runner
        .execute(&context(store.clone(), config), &ExecuteOptions::default())
        .await
        .unwrap();

    assert!(summary.is_success());
    assert_eq!(store.count_concepts().await.unwrap(), 25);
    assert!(store.list_resources(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_drop_existing_clears_previous_data() {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_concept(&syllabus_core::Concept::new("OLD001", "Stale", ConceptType::Subject))
        .await
        .unwrap();

    let config = SetupConfig {
        data_dir: bundled_data_dir(),
        drop_existing_data: true,
        seed_data: false,
        ..SetupConfig::default()
    };
    let runner = builtin_runner().unwrap();
    runner
        .execute(
            &context(store.clone(), config),
            &ExecuteOptions {
                scripts: vec!["import-concepts-graph".to_string()],
                continue_on_error: false,
            },
        )
        .await
        .unwrap();

    assert!(store.get_concept("OLD001").await.unwrap().is_none());
    assert!(store.get_concept("OLM001").await.unwrap().is_some());
}

#[tokio::test]
async fn test_missing_seed_file_respects_error_policy() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        bundled_data_dir().join("concepts-hierarchy.json"),
        dir.path().join("concepts-hierarchy.json"),
    )
    .unwrap();
    // grades and the remaining seed files are absent
    std::fs::write(dir.path().join("prerequisites.json"), "[]").unwrap();
    std::fs::write(dir.path().join("questions.json"), "[]").unwrap();

    let runner = builtin_runner().unwrap();
    let config = SetupConfig {
        data_dir: dir.path().to_path_buf(),
        ..SetupConfig::default()
    };

    let stopped = runner
        .execute(&context(Arc::new(MemoryStore::new()), config.clone()), &ExecuteOptions::default())
        .await
        .unwrap();
    assert_eq!(stopped.failed(), 1);
    assert_eq!(stopped.results.last().unwrap().name, "seed-grades-topics");
    assert_eq!(stopped.skipped.len(), 4);

    let everything = runner
        .execute(
            &context(Arc::new(MemoryStore::new()), config),
            &ExecuteOptions {
                scripts: vec![],
                continue_on_error: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(everything.results.len(), 8);
    let failed: Vec<_> = everything
        .results
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(failed, vec!["seed-grades-topics", "seed-resources"]);
}
