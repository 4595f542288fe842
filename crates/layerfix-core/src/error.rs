//! Error types for bad-layer classification and repair.
//!
//! Nothing in the repair workflow is fatal: every error below is a value the
//! caller can log, show or act on. The workflow turns accessor and reload
//! failures into per-layer outcomes and keeps going.

use std::path::PathBuf;

use layerfix_core_common::{FieldNotFound, ProviderKind};
use thiserror::Error;

/// Main error type for `layerfix` operations.
///
/// It uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum LayerFixError {
    /// Reading or writing a field on a layer description failed
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The layer's storage kind could not be determined
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    /// The loader could not open a layer
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The user stopped the repair workflow
    #[error(transparent)]
    Workflow(#[from] WorkflowSignal),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised by the data source accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The description has no field to write into
    #[error("Layer description has no '{field}' field")]
    FieldMissing {
        /// The missing field name
        field: String,
    },
}

impl From<FieldNotFound> for AccessError {
    fn from(err: FieldNotFound) -> Self {
        AccessError::FieldMissing { field: err.field }
    }
}

/// Reasons a layer's storage kind resolved to `Bogus`.
///
/// These are diagnostics only. Classification never fails; it falls back to
/// `StorageKind::Bogus` and `ProviderKind::Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The storage kind attribute is absent
    #[error("Cannot find '{attribute}' attribute")]
    MissingAttribute {
        /// The attribute name
        attribute: String,
    },

    /// The storage kind attribute holds something other than `raster` or `vector`
    #[error("Unknown '{attribute}' attribute value '{value}'")]
    Unrecognized {
        /// The attribute name
        attribute: String,
        /// The value found
        value: String,
    },
}

/// Errors reported by the loader when (re)opening a layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The file the layer points at does not exist
    #[error("Data source '{data_source}' not found at '{path}'")]
    SourceNotFound {
        /// The layer's data source string
        data_source: String,
        /// The resolved file path that was probed
        path: PathBuf,
    },

    /// The layer has no data source to open
    #[error("Layer has no data source")]
    MissingSource,

    /// The loader cannot open this kind of layer
    #[error("Cannot open {provider} layers")]
    UnsupportedProvider {
        /// The layer's provider kind
        provider: ProviderKind,
    },
}

/// Configuration errors.
///
/// These errors occur when options or configuration are invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Options conflict with each other
    #[error("Conflicting options: {options}")]
    ConflictingOptions {
        /// Description of the conflicting options
        options: String,
    },

    /// A replacement map file could not be loaded
    #[error("Failed to load replacements from '{path}': {reason}")]
    Replacements {
        /// The replacement file
        path: PathBuf,
        /// Why loading failed
        reason: String,
    },
}

/// Control-flow outcomes chosen by the user.
///
/// These are not failures of the workflow. They are surfaced as errors so a
/// caller can propagate them with `?` when it wants to treat them as such.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowSignal {
    /// The user cancelled the search for the remaining layers
    #[error("Search cancelled with {remaining} layer(s) left unprocessed")]
    PickerCancelled {
        /// Layers that were never offered to the picker
        remaining: usize,
    },

    /// The user aborted the whole batch
    #[error("Repair of {layers} bad layer(s) aborted")]
    BatchAborted {
        /// Size of the aborted batch
        layers: usize,
    },
}

/// Type alias for Results using `LayerFixError`.
pub type Result<T> = std::result::Result<T, LayerFixError>;

impl LayerFixError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Access(e) => format!("Cannot update layer: {e}"),
            Self::Classification(e) => format!("Cannot classify layer: {e}"),
            Self::Load(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Workflow(e) => e.to_string(),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Load(e) => e.recovery_suggestion(),
            Self::Workflow(WorkflowSignal::BatchAborted { .. }) => Some(
                "The project was left unchanged. Run repair again to locate the layers."
                    .to_string(),
            ),
            Self::Workflow(WorkflowSignal::PickerCancelled { .. }) => {
                Some("Run repair again to locate the remaining layers.".to_string())
            },
            _ => None,
        }
    }

    /// Check if this error is potentially recoverable.
    ///
    /// Recoverable errors might be fixed by retrying after the user takes some action.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Load(_) | Self::Workflow(_))
    }
}

impl LoadError {
    fn user_message(&self) -> String {
        match self {
            Self::SourceNotFound { path, .. } => format!("File not found: {}", path.display()),
            Self::MissingSource | Self::UnsupportedProvider { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::SourceNotFound { .. } => {
                Some("Run 'layerfix repair' to point the layer at the moved file.".to_string())
            },
            Self::MissingSource => None,
            Self::UnsupportedProvider { .. } => {
                Some("Database and service layers must be fixed in the project itself.".to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_converts() {
        let err: AccessError = FieldNotFound {
            field: "datasource".to_string(),
        }
        .into();
        assert_eq!(
            err,
            AccessError::FieldMissing {
                field: "datasource".to_string()
            }
        );
        assert_eq!(err.to_string(), "Layer description has no 'datasource' field");
    }

    #[test]
    fn test_aborted_has_suggestion() {
        let err = LayerFixError::from(WorkflowSignal::BatchAborted { layers: 3 });
        assert_eq!(err.to_string(), "Repair of 3 bad layer(s) aborted");
        assert!(err.recovery_suggestion().is_some());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_user_message() {
        let err = LayerFixError::from(LoadError::SourceNotFound {
            data_source: "roads.shp|layername=roads".to_string(),
            path: PathBuf::from("/data/roads.shp"),
        });
        assert_eq!(err.user_message(), "File not found: /data/roads.shp");
    }
}
