//! Classification of layer references.
//!
//! Both functions are pure reads of the description's current field values.
//! They never mutate the description and never fail: a missing or garbled
//! `type` attribute is a representable outcome, not an error.
//!
//! # Examples
//!
//! ```
//! use layerfix_core::classify::{classify_provider, classify_storage};
//! use layerfix_core::{LayerNode, ProviderKind, StorageKind};
//!
//! let layer = LayerNode::new()
//!     .with_attribute("type", "vector")
//!     .with_field("datasource", "dbname='gis' host=db.example.com table=roads");
//!
//! assert_eq!(classify_storage(&layer), StorageKind::Vector);
//! // `host=` wins over `dbname=`
//! assert_eq!(classify_provider(&layer), ProviderKind::Url);
//! ```

use layerfix_core_common::{LayerDescription, ProviderKind, StorageKind, TYPE_ATTRIBUTE};
use log::debug;

use crate::datasource::read_data_source;
use crate::error::ClassificationError;

/// Marker of a network service connection in a vector data source.
pub const URL_MARKER: &str = "host=";

/// Marker of a database connection in a vector data source.
pub const DATABASE_MARKER: &str = "dbname=";

/// Determines the storage kind, explaining why it could not when the kind is bogus.
///
/// # Errors
///
/// Returns a [`ClassificationError`] when the `type` attribute is missing or
/// holds anything other than exactly `"raster"` or `"vector"`.
pub fn try_classify_storage<L: LayerDescription + ?Sized>(
    desc: &L,
) -> Result<StorageKind, ClassificationError> {
    let Some(value) = desc.attribute(TYPE_ATTRIBUTE) else {
        return Err(ClassificationError::MissingAttribute {
            attribute: TYPE_ATTRIBUTE.to_string(),
        });
    };

    match StorageKind::from_attribute(Some(value)) {
        StorageKind::Bogus => Err(ClassificationError::Unrecognized {
            attribute: TYPE_ATTRIBUTE.to_string(),
            value: value.to_string(),
        }),
        kind => Ok(kind),
    }
}

/// Determines whether a layer is raster, vector or neither.
#[must_use]
pub fn classify_storage<L: LayerDescription + ?Sized>(desc: &L) -> StorageKind {
    match try_classify_storage(desc) {
        Ok(kind) => {
            debug!("is a {kind}");
            kind
        },
        Err(err) => {
            debug!("{err}");
            StorageKind::Bogus
        },
    }
}

/// Determines how a layer's data is accessed.
///
/// Rasters are always file-backed. Vectors are classified by substring tests
/// on the data source, checked in this order: `host=` means [`ProviderKind::Url`],
/// then `dbname=` means [`ProviderKind::Database`], otherwise the layer is a
/// file. A bogus storage kind yields [`ProviderKind::Unknown`].
#[must_use]
pub fn classify_provider<L: LayerDescription + ?Sized>(desc: &L) -> ProviderKind {
    match classify_storage(desc) {
        StorageKind::Vector => {
            let source = read_data_source(desc).unwrap_or_default();
            debug!("datasource is {source}");
            provider_for_vector_source(source)
        },
        StorageKind::Raster => ProviderKind::File,
        StorageKind::Bogus => {
            debug!("unknown storage kind, provider cannot be determined");
            ProviderKind::Unknown
        },
    }
}

/// Applies the vector data source rules. The `host=` check must stay first.
fn provider_for_vector_source(source: &str) -> ProviderKind {
    if source.contains(URL_MARKER) {
        ProviderKind::Url
    } else if source.contains(DATABASE_MARKER) {
        ProviderKind::Database
    } else {
        ProviderKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfix_core_common::{DATASOURCE_FIELD, LayerNode};
    use proptest::prelude::*;

    fn layer(kind: Option<&str>, source: Option<&str>) -> LayerNode {
        let mut node = LayerNode::new();
        if let Some(kind) = kind {
            node = node.with_attribute(TYPE_ATTRIBUTE, kind);
        }
        if let Some(source) = source {
            node = node.with_field(DATASOURCE_FIELD, source);
        }
        node
    }

    #[test]
    fn test_missing_type_is_bogus() {
        let desc = layer(None, Some("/data/roads.shp"));
        assert_eq!(classify_storage(&desc), StorageKind::Bogus);
        assert_eq!(
            try_classify_storage(&desc),
            Err(ClassificationError::MissingAttribute {
                attribute: "type".to_string()
            })
        );
        assert_eq!(classify_provider(&desc), ProviderKind::Unknown);
    }

    #[test]
    fn test_unrecognized_type_is_bogus() {
        let desc = layer(Some("plugin"), None);
        assert_eq!(
            try_classify_storage(&desc),
            Err(ClassificationError::Unrecognized {
                attribute: "type".to_string(),
                value: "plugin".to_string()
            })
        );
        assert_eq!(classify_provider(&desc), ProviderKind::Unknown);
    }

    #[test]
    fn test_vector_sources() {
        let cases = [
            ("/data/roads.shp", ProviderKind::File),
            ("dbname='gis' table=\"public\".\"roads\"", ProviderKind::Database),
            ("host=localhost port=5432", ProviderKind::Url),
            ("dbname=foo host=bar", ProviderKind::Url),
            ("", ProviderKind::File),
        ];
        for (source, expected) in cases {
            let desc = layer(Some("vector"), Some(source));
            assert_eq!(classify_provider(&desc), expected, "source: {source}");
        }
    }

    #[test]
    fn test_vector_without_source_is_file() {
        let desc = layer(Some("vector"), None);
        assert_eq!(classify_provider(&desc), ProviderKind::File);
    }

    #[test]
    fn test_classification_does_not_mutate() {
        let desc = layer(Some("vector"), Some("host=a dbname=b"));
        let before = desc.clone();
        let _ = classify_provider(&desc);
        let _ = classify_provider(&desc);
        assert_eq!(desc, before);
    }

    proptest! {
        #[test]
        fn prop_other_type_values_are_bogus(value in "\\PC*") {
            prop_assume!(value != "raster" && value != "vector");
            let desc = layer(Some(&value), Some("/data/x.tif"));
            prop_assert_eq!(classify_storage(&desc), StorageKind::Bogus);
            prop_assert_eq!(classify_provider(&desc), ProviderKind::Unknown);
        }

        #[test]
        fn prop_host_precedes_dbname(prefix in "\\PC*", middle in "\\PC*", suffix in "\\PC*") {
            let source = format!("{prefix}dbname={middle}host={suffix}");
            let desc = layer(Some("vector"), Some(&source));
            prop_assert_eq!(classify_provider(&desc), ProviderKind::Url);
        }

        #[test]
        fn prop_raster_is_always_file(source in proptest::option::of("\\PC*")) {
            let desc = layer(Some("raster"), source.as_deref());
            prop_assert_eq!(classify_provider(&desc), ProviderKind::File);
        }
    }
}
