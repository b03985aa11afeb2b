//! Learning resources linked to topics.

pub mod model;

pub use model::{Resource, ResourceType, UpdateResourceRequest};
