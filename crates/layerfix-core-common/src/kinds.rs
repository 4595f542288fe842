//! Storage and provider kinds for project layer references.
//!
//! A layer's storage kind says whether its data is gridded (raster) or made of
//! discrete features (vector). Its provider kind says how that data is reached:
//! a local file, a database connection or a network service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage kind of a layer, read from the layer's `type` attribute.
///
/// Anything other than the exact values `"raster"` or `"vector"` (including a
/// missing attribute) is [`StorageKind::Bogus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Gridded data such as `GeoTIFF`.
    Raster,
    /// Discrete features such as a Shapefile or a `PostGIS` table.
    Vector,
    /// Missing or unrecognized `type` attribute.
    Bogus,
}

impl StorageKind {
    /// Parses the raw attribute value. Matching is exact and case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerfix_core_common::StorageKind;
    ///
    /// assert_eq!(StorageKind::from_attribute(Some("raster")), StorageKind::Raster);
    /// assert_eq!(StorageKind::from_attribute(Some("Vector")), StorageKind::Bogus);
    /// assert_eq!(StorageKind::from_attribute(None), StorageKind::Bogus);
    /// ```
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("raster") => StorageKind::Raster,
            Some("vector") => StorageKind::Vector,
            _ => StorageKind::Bogus,
        }
    }

    /// Returns `true` for raster and vector layers.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, StorageKind::Bogus)
    }

    /// Returns the string representation of this storage kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Raster => "raster",
            StorageKind::Vector => "vector",
            StorageKind::Bogus => "unknown",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a layer's data is physically accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// A file on a local or mounted file system.
    File,
    /// A database connection (`dbname=` in the source).
    Database,
    /// A network service (`host=` in the source).
    Url,
    /// The storage kind could not be determined.
    Unknown,
}

impl ProviderKind {
    /// Returns `true` if a replacement can be located with a file picker.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerfix_core_common::ProviderKind;
    ///
    /// assert!(ProviderKind::File.is_file_based());
    /// assert!(!ProviderKind::Database.is_file_based());
    /// ```
    #[must_use]
    pub fn is_file_based(&self) -> bool {
        matches!(self, ProviderKind::File)
    }

    /// Returns the string representation of this provider kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::File => "file",
            ProviderKind::Database => "database",
            ProviderKind::Url => "url",
            ProviderKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
