//! Registry of file formats offered when locating a missing layer.
//!
//! This module provides a static registry of raster and vector file formats with
//! their glob extensions. The registry is modeled after GDAL's driver list and is
//! used to build the Qt-style filter expressions handed to file pickers.
//!
//! # Examples
//!
//! ```
//! use layerfix_core::StorageKind;
//! use layerfix_core::filters::{file_filter, find_format};
//!
//! let gtiff = find_format("gtiff").expect("GTiff format should exist");
//! assert_eq!(gtiff.kind, StorageKind::Raster);
//!
//! let filter = file_filter(StorageKind::Vector);
//! assert!(filter.contains("ESRI Shapefile (*.shp *.SHP)"));
//! assert!(filter.ends_with("All files (*)"));
//! ```

use std::path::Path;

use layerfix_core_common::StorageKind;

/// Separator between entries of a filter expression.
pub const FILTER_SEPARATOR: &str = ";;";

/// Catch-all filter entry appended to every expression.
pub const ALL_FILES_FILTER: &str = "All files (*)";

/// A file format that a layer's data source may point at.
///
/// # Examples
///
/// ```
/// use layerfix_core::StorageKind;
/// use layerfix_core::filters::FileFormat;
///
/// let format = FileFormat::new("GTiff", "GeoTIFF", StorageKind::Raster, &["tif", "tiff"]);
/// assert_eq!(format.filter_entry(), "GeoTIFF (*.tif *.TIF *.tiff *.TIFF)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFormat {
    /// Short name used for identification (e.g., `"GTiff"`).
    pub short_name: &'static str,
    /// Long descriptive name shown in filter lists (e.g., `"GeoTIFF"`).
    pub long_name: &'static str,
    /// Whether the format holds raster or vector data.
    pub kind: StorageKind,
    /// File extensions without the leading dot, in lower case.
    pub extensions: &'static [&'static str],
}

impl FileFormat {
    /// Creates a new format definition.
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        kind: StorageKind,
        extensions: &'static [&'static str],
    ) -> Self {
        Self {
            short_name,
            long_name,
            kind,
            extensions,
        }
    }

    /// Formats this entry as `"Long name (*.ext *.EXT ...)"`.
    ///
    /// Both lower and upper case globs are listed because pickers on
    /// case-sensitive file systems match literally.
    #[must_use]
    pub fn filter_entry(&self) -> String {
        let globs: Vec<String> = self
            .extensions
            .iter()
            .flat_map(|ext| [format!("*.{ext}"), format!("*.{}", ext.to_uppercase())])
            .collect();
        format!("{} ({})", self.long_name, globs.join(" "))
    }

    /// Returns `true` if `path` ends with one of this format's extensions.
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Returns the complete registry of known file formats.
#[must_use]
pub fn get_formats() -> Vec<FileFormat> {
    use StorageKind::{Raster, Vector};

    vec![
        // Rasters
        FileFormat::new("GTiff", "GeoTIFF", Raster, &["tif", "tiff"]),
        FileFormat::new("HFA", "Erdas Imagine Images", Raster, &["img"]),
        FileFormat::new("JP2OpenJPEG", "JPEG-2000", Raster, &["jp2", "j2k"]),
        FileFormat::new("AAIGrid", "Arc/Info ASCII Grid", Raster, &["asc"]),
        FileFormat::new("ECW", "ERDAS Compressed Wavelets", Raster, &["ecw"]),
        FileFormat::new("VRT", "Virtual Raster", Raster, &["vrt"]),
        FileFormat::new("PNG", "Portable Network Graphics", Raster, &["png"]),
        FileFormat::new("JPEG", "JPEG JFIF", Raster, &["jpg", "jpeg"]),
        FileFormat::new("netCDF", "Network Common Data Format", Raster, &["nc"]),
        FileFormat::new("EHdr", "ESRI .hdr Labelled", Raster, &["bil"]),
        // Vectors
        FileFormat::new("ESRI Shapefile", "ESRI Shapefile", Vector, &["shp"]),
        FileFormat::new("GPKG", "GeoPackage", Vector, &["gpkg"]),
        FileFormat::new("GeoJSON", "GeoJSON", Vector, &["geojson", "json"]),
        FileFormat::new("KML", "Keyhole Markup Language", Vector, &["kml", "kmz"]),
        FileFormat::new("GML", "Geography Markup Language", Vector, &["gml"]),
        FileFormat::new("GPX", "GPS Exchange Format", Vector, &["gpx"]),
        FileFormat::new("CSV", "Comma Separated Value", Vector, &["csv"]),
        FileFormat::new("FlatGeobuf", "FlatGeobuf", Vector, &["fgb"]),
        FileFormat::new("MapInfo File", "MapInfo TAB and MIF/MID", Vector, &["tab", "mif"]),
        FileFormat::new("DXF", "AutoCAD DXF", Vector, &["dxf"]),
        FileFormat::new("SQLite", "SQLite/SpatiaLite", Vector, &["sqlite", "db"]),
    ]
}

/// Returns the formats holding the given kind of data, in registry order.
///
/// A bogus storage kind has no formats.
#[must_use]
pub fn formats_for(kind: StorageKind) -> Vec<FileFormat> {
    if !kind.is_known() {
        return Vec::new();
    }
    get_formats().into_iter().filter(|f| f.kind == kind).collect()
}

/// Builds the picker filter expression for a storage kind.
///
/// Entries are joined with `;;` and always end with [`ALL_FILES_FILTER`].
#[must_use]
pub fn file_filter(kind: StorageKind) -> String {
    let mut entries: Vec<String> = formats_for(kind)
        .iter()
        .map(FileFormat::filter_entry)
        .collect();
    entries.push(ALL_FILES_FILTER.to_string());
    entries.join(FILTER_SEPARATOR)
}

/// Finds a format by its short name (case-insensitive).
#[must_use]
pub fn find_format(name: &str) -> Option<FileFormat> {
    get_formats()
        .into_iter()
        .find(|f| f.short_name.eq_ignore_ascii_case(name))
}

/// Finds the format a path most likely belongs to, by extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use layerfix_core::filters::format_for_path;
///
/// let format = format_for_path(Path::new("/data/ROADS.SHP")).unwrap();
/// assert_eq!(format.short_name, "ESRI Shapefile");
/// assert!(format_for_path(Path::new("/data/readme")).is_none());
/// ```
#[must_use]
pub fn format_for_path(path: &Path) -> Option<FileFormat> {
    get_formats().into_iter().find(|f| f.matches_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_format_case_insensitive() {
        let format = find_format("gpkg");
        assert!(format.is_some());
        assert_eq!(format.unwrap().short_name, "GPKG");
    }

    #[test]
    fn test_formats_split_by_kind() {
        let rasters = formats_for(StorageKind::Raster);
        let vectors = formats_for(StorageKind::Vector);
        assert!(rasters.iter().all(|f| f.kind == StorageKind::Raster));
        assert!(vectors.iter().all(|f| f.kind == StorageKind::Vector));
        assert_eq!(rasters.len() + vectors.len(), get_formats().len());
        assert!(formats_for(StorageKind::Bogus).is_empty());
    }

    #[test]
    fn test_raster_filter_excludes_vectors() {
        let filter = file_filter(StorageKind::Raster);
        assert!(filter.starts_with("GeoTIFF (*.tif *.TIF *.tiff *.TIFF)"));
        assert!(!filter.contains("*.shp"));
    }

    #[test]
    fn test_bogus_filter_is_catch_all() {
        assert_eq!(file_filter(StorageKind::Bogus), ALL_FILES_FILTER);
    }

    #[test]
    fn test_short_names_unique() {
        let mut names: Vec<_> = get_formats().iter().map(|f| f.short_name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
