//! Helpers for picking apart file-based data source strings.
//!
//! File-backed sources may carry provider options after a `|`, as in
//! `/data/roads.gpkg|layername=roads`. Only the part before the first `|` is a path.

use std::path::{Path, PathBuf};

/// Separator between a file path and provider options in a data source.
pub const OPTION_SEPARATOR: char = '|';

/// Extension trait for treating a data source string as a file reference.
///
/// # Examples
///
/// ```
/// use layerfix_core::utils::DataSourceExt;
///
/// let source = "/data/roads.gpkg|layername=roads";
/// assert_eq!(source.file_part(), "/data/roads.gpkg");
/// assert_eq!(source.file_name_hint(), "roads.gpkg");
/// ```
pub trait DataSourceExt {
    /// The path part of the source, without provider options.
    fn file_part(&self) -> &str;

    /// Base file name of the path part, or an empty string if there is none.
    fn file_name_hint(&self) -> String;

    /// The path part made absolute against the current directory.
    ///
    /// Falls back to the path as written if it cannot be made absolute.
    fn absolute_file_path(&self) -> PathBuf;
}

impl DataSourceExt for str {
    fn file_part(&self) -> &str {
        self.split(OPTION_SEPARATOR).next().unwrap_or_default()
    }

    fn file_name_hint(&self) -> String {
        Path::new(self.file_part())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn absolute_file_path(&self) -> PathBuf {
        let path = Path::new(self.file_part());
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
