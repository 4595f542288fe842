//! Reading and rewriting a layer's data source.
//!
//! Reads tolerate a missing field. Writes require the field to exist: a
//! project that was saved once always serialized a data source, even if empty.

use layerfix_core_common::{DATASOURCE_FIELD, LayerDescription};
use log::debug;

use crate::error::AccessError;

/// Returns the layer's data source string.
///
/// Returns `None` when the description has no data source field, and
/// `Some("")` when the field exists but is empty.
#[must_use]
pub fn read_data_source<L: LayerDescription + ?Sized>(desc: &L) -> Option<&str> {
    let source = desc.child_text(DATASOURCE_FIELD);
    if source.is_none() {
        debug!("cannot find datasource node");
    }
    source
}

/// Overwrites the layer's data source in place.
///
/// # Errors
///
/// Returns [`AccessError::FieldMissing`] if the description has no data
/// source field. The description is not modified in that case.
///
/// # Examples
///
/// ```
/// use layerfix_core::LayerNode;
/// use layerfix_core::datasource::{read_data_source, write_data_source};
///
/// let mut layer = LayerNode::new().with_field("datasource", "/data/old.tif");
/// write_data_source(&mut layer, "/data/new.tif").unwrap();
/// assert_eq!(read_data_source(&layer), Some("/data/new.tif"));
///
/// let mut bare = LayerNode::new();
/// assert!(write_data_source(&mut bare, "/data/new.tif").is_err());
/// ```
pub fn write_data_source<L: LayerDescription + ?Sized>(
    desc: &mut L,
    new_value: &str,
) -> Result<(), AccessError> {
    let previous = desc.child_text(DATASOURCE_FIELD).map(str::to_owned);
    desc.set_child_text(DATASOURCE_FIELD, new_value)?;
    debug!(
        "datasource changed from {} to {new_value}",
        previous.as_deref().unwrap_or_default()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfix_core_common::{LayerNode, TYPE_ATTRIBUTE};

    #[test]
    fn test_round_trip() {
        let mut layer = LayerNode::new()
            .with_attribute(TYPE_ATTRIBUTE, "raster")
            .with_field(DATASOURCE_FIELD, "/data/old.tif");

        write_data_source(&mut layer, "/data/new.tif").unwrap();
        assert_eq!(read_data_source(&layer), Some("/data/new.tif"));
    }

    #[test]
    fn test_write_into_empty_field() {
        let mut layer = LayerNode::new().with_field(DATASOURCE_FIELD, "");
        assert_eq!(read_data_source(&layer), Some(""));

        write_data_source(&mut layer, "roads.gpkg|layername=roads").unwrap();
        assert_eq!(read_data_source(&layer), Some("roads.gpkg|layername=roads"));
    }

    #[test]
    fn test_write_missing_field_fails_without_mutation() {
        let mut layer = LayerNode::new().with_attribute(TYPE_ATTRIBUTE, "vector");
        let before = layer.clone();

        let err = write_data_source(&mut layer, "/data/new.shp").unwrap_err();
        assert_eq!(
            err,
            AccessError::FieldMissing {
                field: DATASOURCE_FIELD.to_string()
            }
        );
        assert_eq!(layer, before);
        assert_eq!(read_data_source(&layer), None);
    }
}
