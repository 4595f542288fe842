//! Summaries of bad-layer batches.

use std::fmt;

use layerfix_core_common::{LAYER_NAME_FIELD, LayerDescription};
use log::info;
use serde::Serialize;

use crate::datasource::read_data_source;

/// Line shown for a layer that has no data source field.
pub const UNKNOWN_SOURCE: &str = "unknown source";

/// One bad layer as it appears in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadLayerEntry {
    /// The layer's display name, if the description carries one.
    pub name: Option<String>,
    /// The original data source, or [`UNKNOWN_SOURCE`].
    pub source: String,
}

/// Count and per-layer lines for a batch of bad layers, in batch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadLayerSummary {
    /// Number of layers in the batch.
    pub count: usize,
    /// One entry per layer.
    pub entries: Vec<BadLayerEntry>,
}

impl BadLayerSummary {
    /// The per-layer one-line descriptions.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.source.as_str())
    }
}

impl fmt::Display for BadLayerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bad layer(s):", self.count)?;
        for line in self.lines() {
            write!(f, "\n * {line}")?;
        }
        Ok(())
    }
}

/// Builds the summary of a batch without touching the descriptions.
///
/// # Examples
///
/// ```
/// use layerfix_core::LayerNode;
/// use layerfix_core::report::summarize;
///
/// let batch = vec![
///     LayerNode::new().with_field("datasource", "/data/old.tif"),
///     LayerNode::new(),
/// ];
/// let summary = summarize(&batch);
/// assert_eq!(summary.count, 2);
/// assert_eq!(summary.lines().collect::<Vec<_>>(), ["/data/old.tif", "unknown source"]);
/// ```
#[must_use]
pub fn summarize<L: LayerDescription>(batch: &[L]) -> BadLayerSummary {
    let entries = batch
        .iter()
        .map(|layer| BadLayerEntry {
            name: layer.child_text(LAYER_NAME_FIELD).map(str::to_owned),
            source: read_data_source(layer).unwrap_or(UNKNOWN_SOURCE).to_string(),
        })
        .collect();

    BadLayerSummary {
        count: batch.len(),
        entries,
    }
}

/// Summarizes a batch and writes the summary to the log.
pub fn log_summary<L: LayerDescription>(batch: &[L]) -> BadLayerSummary {
    let summary = summarize(batch);
    info!("{} bad layer(s):", summary.count);
    for line in summary.lines() {
        info!(" * {line}");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfix_core_common::{DATASOURCE_FIELD, LayerNode};

    #[test]
    fn test_summary_preserves_order_and_names() {
        let batch = vec![
            LayerNode::new()
                .with_field(LAYER_NAME_FIELD, "roads")
                .with_field(DATASOURCE_FIELD, "/data/roads.shp"),
            LayerNode::new().with_field(DATASOURCE_FIELD, ""),
            LayerNode::new().with_field(LAYER_NAME_FIELD, "dem"),
        ];

        let summary = summarize(&batch);
        assert_eq!(summary.count, 3);
        assert_eq!(
            summary.entries,
            vec![
                BadLayerEntry {
                    name: Some("roads".to_string()),
                    source: "/data/roads.shp".to_string(),
                },
                BadLayerEntry {
                    name: None,
                    source: String::new(),
                },
                BadLayerEntry {
                    name: Some("dem".to_string()),
                    source: UNKNOWN_SOURCE.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_summary_display() {
        let batch = vec![LayerNode::new().with_field(DATASOURCE_FIELD, "a.tif")];
        assert_eq!(
            log_summary(&batch).to_string(),
            "1 bad layer(s):\n * a.tif"
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch: Vec<LayerNode> = Vec::new();
        let summary = summarize(&batch);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.to_string(), "0 bad layer(s):");
    }
}
