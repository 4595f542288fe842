//! Picker answering from a JSON replacement file.
//!
//! The file is a single JSON object. Keys are either a layer's full original
//! data source or just its file name; values are the replacement paths:
//!
//! ```json
//! {
//!   "roads.shp": "/mnt/archive/roads.shp",
//!   "/srv/gis/elevation/dem.tif": "../rasters/dem.tif"
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use layerfix_core::error::ConfigError;
use layerfix_core::repair::FilePicker;
use layerfix_core::types::{PickRequest, PickResult};
use serde::Deserialize;
use tracing::debug;

/// Replacement paths keyed by original source or file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReplacementMap {
    entries: HashMap<String, String>,
}

impl ReplacementMap {
    /// Loads a replacement file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Replacements`] if the file cannot be read or is
    /// not a JSON object of strings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let replacements_error = |reason: String| ConfigError::Replacements {
            path: path.to_path_buf(),
            reason,
        };
        let json = fs::read_to_string(path).map_err(|e| replacements_error(e.to_string()))?;
        let map: Self =
            serde_json::from_str(&json).map_err(|e| replacements_error(e.to_string()))?;
        debug!("Loaded {} replacement(s) from {}", map.len(), path.display());
        Ok(map)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the replacement for a request; the full source wins over the file name.
    #[must_use]
    pub fn lookup(&self, request: &PickRequest) -> Option<&str> {
        self.entries
            .get(&request.original_source)
            .or_else(|| self.entries.get(&request.seed_filename))
            .map(String::as_str)
    }
}

impl FilePicker for ReplacementMap {
    fn pick_file(&mut self, request: &PickRequest) -> PickResult {
        match self.lookup(request) {
            Some(path) => PickResult::Selected(path.to_string()),
            None => {
                debug!("No replacement for {}", request.original_source);
                PickResult::None
            },
        }
    }
}
