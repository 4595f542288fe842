//! Common types and traits shared across `layerfix` crates.
//!
//! This crate provides the core abstractions that are shared between
//! `layerfix-core` and document format crates, preventing circular dependencies.

pub mod kinds;
pub mod node;

// Re-export commonly used types
pub use kinds::{ProviderKind, StorageKind};
pub use node::{
    DATASOURCE_FIELD, FieldNotFound, LAYER_NAME_FIELD, LayerDescription, LayerNode, TYPE_ATTRIBUTE,
};
