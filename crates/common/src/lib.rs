//! Shared types used across the catalog crates.

pub mod pagination;
pub mod types;

pub use pagination::{Page, PageRequest};
pub use types::{EntityId, ParseEntityIdError};
