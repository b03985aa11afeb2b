//! # Syllabus Graph
//!
//! Neo4j storage for the curriculum knowledge graph.
//!
//! Provides the connection client, the `CatalogStore` abstraction with a
//! Neo4j and an in-memory backend, the hierarchy importer, checked edge
//! creation and the graph validator.

pub mod client;
pub mod import;
pub mod memory;
pub mod neo4j_store;
pub mod relations;
pub mod schema;
pub mod store;
pub mod validate;

pub use client::{GraphClient, GraphConfig};
pub use import::{import_hierarchy, ImportReport};
pub use memory::MemoryStore;
pub use neo4j_store::Neo4jStore;
pub use store::CatalogStore;
pub use validate::{validate_graph, ValidationReport};
