//! Deciding which project layers fail to open.

use std::path::{Path, PathBuf};

use layerfix_core::ProviderKind;
use layerfix_core::classify::classify_provider;
use layerfix_core::datasource::read_data_source;
use layerfix_core::error::LoadError;
use layerfix_core::repair::LayerReloader;
use layerfix_core::utils::DataSourceExt;
use layerfix_core_common::LayerDescription;
use log::debug;

use crate::document::ProjectDocument;
use crate::element::Element;

/// Opens project layers against the local file system.
///
/// File-backed layers open when the path part of their source exists. Relative
/// paths are resolved against `base_dir`, normally the project's directory.
/// Database and web layers cannot be probed offline and always open; layers
/// whose storage kind is not recognized never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLoader {
    base_dir: PathBuf,
}

impl ProjectLoader {
    /// Creates a loader resolving relative sources against `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Creates a loader for the project file at `project`.
    #[must_use]
    pub fn for_project(project: &Path) -> Self {
        let base_dir = project
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(base_dir)
    }

    /// The directory relative sources are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves the path part of a file-based data source.
    #[must_use]
    pub fn resolve(&self, data_source: &str) -> PathBuf {
        let path = Path::new(data_source.file_part());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Tries to open one layer.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] describing why the layer does not open.
    pub fn open<L: LayerDescription + ?Sized>(&self, layer: &L) -> Result<(), LoadError> {
        match classify_provider(layer) {
            ProviderKind::File => {
                let data_source = read_data_source(layer)
                    .filter(|source| !source.file_part().is_empty())
                    .ok_or(LoadError::MissingSource)?;
                let path = self.resolve(data_source);
                if path.exists() {
                    Ok(())
                } else {
                    Err(LoadError::SourceNotFound {
                        data_source: data_source.to_string(),
                        path,
                    })
                }
            },
            ProviderKind::Database | ProviderKind::Url => Ok(()),
            provider @ ProviderKind::Unknown => Err(LoadError::UnsupportedProvider { provider }),
        }
    }

    /// Returns the layers of `doc` that fail to open, in document order.
    pub fn find_bad_layers<'a>(&self, doc: &'a mut ProjectDocument) -> Vec<&'a mut Element> {
        let bad: Vec<&'a mut Element> = doc
            .layers_mut()
            .into_iter()
            .filter(|layer| match self.open(&**layer) {
                Ok(()) => false,
                Err(e) => {
                    debug!("Layer does not open: {e}");
                    true
                },
            })
            .collect();
        debug!("{} bad layer(s) under {}", bad.len(), self.base_dir.display());
        bad
    }
}

impl<L: LayerDescription + ?Sized> LayerReloader<L> for ProjectLoader {
    fn reload_layer(&mut self, layer: &L) -> Result<(), LoadError> {
        self.open(layer)
            .inspect_err(|e| debug!("Repaired layer still does not open: {e}"))
    }
}
