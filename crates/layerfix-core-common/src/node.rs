//! Narrow key-based access to a serialized layer description.
//!
//! Project documents store each layer as a tree node. The repair logic never
//! walks that tree itself; it reads one attribute and a couple of named child
//! fields through [`LayerDescription`], which document format crates implement.

use std::collections::BTreeMap;

use thiserror::Error;

/// Attribute carrying the layer's storage kind (`"raster"` / `"vector"`).
pub const TYPE_ATTRIBUTE: &str = "type";

/// Child field carrying the layer's data source string.
pub const DATASOURCE_FIELD: &str = "datasource";

/// Child field carrying the layer's display name.
pub const LAYER_NAME_FIELD: &str = "layername";

/// The named child field does not exist on the description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' not found on layer description")]
pub struct FieldNotFound {
    /// The field that was looked up
    pub field: String,
}

/// Key-based view of a single layer description node.
///
/// Reads tolerate absence and return `None`. Writes only replace the text of
/// a field that already exists; they never create one.
pub trait LayerDescription {
    /// Returns the value of the named attribute on the layer node.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Returns the text content of the named child field.
    ///
    /// `Some("")` means the field exists but is empty.
    fn child_text(&self, field: &str) -> Option<&str>;

    /// Overwrites the text content of an existing child field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldNotFound`] if the field does not exist. The description
    /// is left untouched in that case.
    fn set_child_text(&mut self, field: &str, value: &str) -> Result<(), FieldNotFound>;
}

impl<T: LayerDescription + ?Sized> LayerDescription for &mut T {
    fn attribute(&self, name: &str) -> Option<&str> {
        (**self).attribute(name)
    }

    fn child_text(&self, field: &str) -> Option<&str> {
        (**self).child_text(field)
    }

    fn set_child_text(&mut self, field: &str, value: &str) -> Result<(), FieldNotFound> {
        (**self).set_child_text(field, value)
    }
}

/// An owned, in-memory layer description.
///
/// Useful for callers that keep layer metadata outside a document tree.
///
/// # Examples
///
/// ```
/// use layerfix_core_common::{LayerDescription, LayerNode};
///
/// let mut layer = LayerNode::new()
///     .with_attribute("type", "raster")
///     .with_field("datasource", "/data/old.tif");
///
/// layer.set_child_text("datasource", "/data/new.tif").unwrap();
/// assert_eq!(layer.child_text("datasource"), Some("/data/new.tif"));
/// assert!(layer.set_child_text("provider", "gdal").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerNode {
    attributes: BTreeMap<String, String>,
    fields: BTreeMap<String, String>,
}

impl LayerNode {
    /// Creates an empty description with no attributes and no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Adds a child field, replacing any previous value.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.insert(field.into(), text.into());
        self
    }
}

impl LayerDescription for LayerNode {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn child_text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    fn set_child_text(&mut self, field: &str, value: &str) -> Result<(), FieldNotFound> {
        let text = self.fields.get_mut(field).ok_or_else(|| FieldNotFound {
            field: field.to_string(),
        })?;
        value.clone_into(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_none() {
        let layer = LayerNode::new().with_attribute(TYPE_ATTRIBUTE, "vector");
        assert_eq!(layer.child_text(DATASOURCE_FIELD), None);
        assert_eq!(layer.attribute(TYPE_ATTRIBUTE), Some("vector"));
    }

    #[test]
    fn test_empty_field_is_distinct_from_missing() {
        let layer = LayerNode::new().with_field(DATASOURCE_FIELD, "");
        assert_eq!(layer.child_text(DATASOURCE_FIELD), Some(""));
    }

    #[test]
    fn test_set_missing_field_leaves_node_untouched() {
        let mut layer = LayerNode::new().with_attribute(TYPE_ATTRIBUTE, "raster");
        let before = layer.clone();

        let err = layer.set_child_text(DATASOURCE_FIELD, "/tmp/x.tif").unwrap_err();
        assert_eq!(err.field, DATASOURCE_FIELD);
        assert_eq!(layer, before);
    }

    fn rename_source<L: LayerDescription>(mut layer: L, value: &str) {
        layer.set_child_text(DATASOURCE_FIELD, value).unwrap();
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut layer = LayerNode::new().with_field(DATASOURCE_FIELD, "a.shp");
        rename_source(&mut layer, "b.shp");
        assert_eq!(layer.child_text(DATASOURCE_FIELD), Some("b.shp"));
    }
}
