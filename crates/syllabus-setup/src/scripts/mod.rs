//! Built-in setup scripts.

mod concepts;
mod schema;
mod seed;

pub use concepts::{ImportConceptsGraph, ValidateGraph};
pub use schema::{CreateConstraints, DropExistingData};
pub use seed::{SeedGradesTopics, SeedPrerequisites, SeedQuestions, SeedResources};

use crate::error::SetupResult;
use crate::runner::SetupRunner;

/// Runner holding every built-in script in its canonical order.
pub fn builtin_runner() -> SetupResult<SetupRunner> {
    let mut runner = SetupRunner::new();
    runner.register(Box::new(CreateConstraints))?;
    runner.register(Box::new(DropExistingData))?;
    runner.register(Box::new(ImportConceptsGraph))?;
    runner.register(Box::new(SeedGradesTopics))?;
    runner.register(Box::new(SeedPrerequisites))?;
    runner.register(Box::new(SeedResources))?;
    runner.register(Box::new(SeedQuestions))?;
    runner.register(Box::new(ValidateGraph))?;
    Ok(runner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_resolves() {
        let runner = builtin_runner().unwrap();
        let order = runner.resolve(&[]).unwrap();
        assert_eq!(
            order,
            vec![
                "create-constraints",
                "drop-existing-data",
                "import-concepts-graph",
                "seed-grades-topics",
                "seed-prerequisites",
                "seed-resources",
                "seed-questions",
                "validate-graph",
            ]
        );
    }

    #[test]
    fn test_single_seed_pulls_in_import() {
        let runner = builtin_runner().unwrap();
        let order = runner.resolve(&["seed-resources".to_string()]).unwrap();
        assert_eq!(
            order,
            vec![
                "create-constraints",
                "drop-existing-data",
                "import-concepts-graph",
                "seed-grades-topics",
                "seed-resources",
            ]
        );
    }
}
