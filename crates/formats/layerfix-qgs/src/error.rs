use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing a project document.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// An underlying I/O failure occurred.
    #[error("Failed to {action} project '{path}': {source}")]
    Io {
        /// What was being done (`"read"` or `"write"`)
        action: &'static str,
        /// The project file
        path: PathBuf,
        /// The originating error
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("Failed to parse project at {}: {message}", position.map(|p| format!("byte {p}")).unwrap_or_else(|| "unknown position".to_string()))]
    Parse {
        /// Human readable description of the failure
        message: String,
        /// Byte offset where parsing failed, if known
        position: Option<u64>,
    },

    /// The document could not be serialized.
    #[error("Failed to serialize project: {message}")]
    Write {
        /// Human readable description of the failure
        message: String,
    },

    /// The document is XML but not a project.
    #[error("Document root is <{root}>, expected <qgis>")]
    NotAProject {
        /// The root element found
        root: String,
    },

    /// The document has no root element.
    #[error("Document has no root element")]
    Empty,
}

impl ProjectError {
    pub(crate) fn parse(message: impl Into<String>, position: Option<u64>) -> Self {
        ProjectError::Parse {
            message: message.into(),
            position,
        }
    }
}

/// Type alias for Results using `ProjectError`.
pub type Result<T> = std::result::Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_with_position() {
        let err = ProjectError::parse("unexpected end", Some(42));
        assert_eq!(
            err.to_string(),
            "Failed to parse project at byte 42: unexpected end"
        );
    }

    #[test]
    fn test_parse_display_without_position() {
        let err = ProjectError::parse("bad entity", None);
        assert_eq!(
            err.to_string(),
            "Failed to parse project at unknown position: bad entity"
        );
    }
}
