//! Route handlers.

pub mod concepts;
pub mod health;
pub mod learning_paths;
pub mod questions;
pub mod resources;
