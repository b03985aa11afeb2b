//! Syllabus Core Library
//!
//! Domain models, request validation and hierarchy handling for the
//! curriculum knowledge graph.

pub mod concept;
pub mod error;
pub mod learning;
pub mod question;
pub mod resource;
pub mod seed;
pub mod validation;

pub use concept::model::{Concept, ConceptType};
pub use error::{CatalogError, CatalogResult};
