//! `layerfix-core` is the core library for `layerfix`, providing the recovery logic a
//! project loader runs when one or more referenced layers cannot be opened.
//!
//! This crate includes:
//! - **Classifier**: derives a layer's storage kind and provider kind from its description.
//! - **Data Source Accessor**: reads and rewrites the layer's data source field.
//! - **Reporter**: summarizes a batch of bad layers for logs and prompts.
//! - **Repair Workflow**: asks how to proceed, locates replacements for file-based
//!   layers and hands repaired layers back to the loader.
//! - **File Filters**: the registry of raster and vector file formats offered to the picker.

pub mod classify;
pub mod datasource;
pub mod error;
pub mod filters;
pub mod repair;
pub mod report;
pub mod types;
pub mod utils;

pub use layerfix_core_common::{LayerDescription, LayerNode, ProviderKind, StorageKind};
