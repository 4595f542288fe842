//! QGIS project (`.qgs`) support for `layerfix`.
//!
//! This crate reads a project file into an owned element tree, exposes every
//! `<maplayer>` element as a [`LayerDescription`](layerfix_core_common::LayerDescription),
//! decides which layers fail to load and writes the repaired project back out.
//!
//! # Examples
//!
//! ```
//! use layerfix_qgs::ProjectDocument;
//!
//! let xml = r#"<qgis version="3.34">
//!   <projectlayers>
//!     <maplayer type="raster">
//!       <datasource>/data/dem.tif</datasource>
//!       <layername>dem</layername>
//!     </maplayer>
//!   </projectlayers>
//! </qgis>"#;
//!
//! let doc: ProjectDocument = xml.parse().unwrap();
//! assert_eq!(doc.layers().len(), 1);
//! ```

mod document;
mod element;
mod error;
mod loader;

pub use document::{MAP_LAYER_ELEMENT, PROJECT_ROOT_ELEMENT, ProjectDocument};
pub use element::Element;
pub use error::{ProjectError, Result};
pub use loader::ProjectLoader;
