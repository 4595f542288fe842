//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting project layers and repair results in a human-readable format.

use std::path::{Path, PathBuf};

use layerfix_core::classify::{classify_provider, classify_storage};
use layerfix_core::datasource::read_data_source;
use layerfix_core::filters::{FileFormat, format_for_path};
use layerfix_core::report::UNKNOWN_SOURCE;
use layerfix_core::types::RepairOutcome;
use layerfix_core::utils::DataSourceExt;
use layerfix_core_common::{LAYER_NAME_FIELD, LayerDescription};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Table row representation for displaying one project layer.
#[derive(Tabled)]
pub struct LayerRow {
    /// Layer name from the project.
    #[tabled(rename = "Layer")]
    pub name: String,
    /// Storage kind (`raster`, `vector` or `unknown`).
    #[tabled(rename = "Kind")]
    pub kind: String,
    /// Provider kind (`file`, `database`, `url` or `unknown`).
    #[tabled(rename = "Provider")]
    pub provider: String,
    /// File format guessed from the source's extension, for file-based layers.
    #[tabled(rename = "Format")]
    pub format: String,
    /// Whether the layer opens, or why not.
    #[tabled(rename = "Status")]
    pub status: String,
    /// The layer's data source.
    #[tabled(rename = "Source")]
    pub source: String,
}

impl LayerRow {
    /// Builds a row from a layer description and its load status.
    pub fn new<L: LayerDescription + ?Sized>(layer: &L, status: String) -> Self {
        let provider = classify_provider(layer);
        let source = read_data_source(layer);
        let format = source
            .filter(|_| provider.is_file_based())
            .and_then(|source| format_for_path(Path::new(source.file_part())))
            .map_or_else(String::new, |format| format.short_name.to_string());

        Self {
            name: layer_name(layer),
            kind: classify_storage(layer).to_string(),
            provider: provider.to_string(),
            format,
            status,
            source: source.unwrap_or(UNKNOWN_SOURCE).to_string(),
        }
    }
}

/// Table row representation for displaying a repair outcome.
#[derive(Tabled)]
pub struct OutcomeRow {
    /// Layer name from the project.
    #[tabled(rename = "Layer")]
    pub name: String,
    /// What happened to the layer.
    #[tabled(rename = "Outcome")]
    pub outcome: String,
    /// New source, provider kind, or nothing.
    #[tabled(rename = "Detail")]
    pub detail: String,
}

/// Table row representation for displaying a file format.
#[derive(Tabled)]
pub struct FormatRow {
    /// Short identifier for the format (e.g., `GTiff`).
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Raster or vector.
    #[tabled(rename = "Kind")]
    pub kind: String,
    /// Glob patterns offered in the picker filter.
    #[tabled(rename = "Extensions")]
    pub extensions: String,
}

impl From<&FileFormat> for FormatRow {
    fn from(format: &FileFormat) -> Self {
        Self {
            short_name: format.short_name.to_string(),
            long_name: format.long_name.to_string(),
            kind: format.kind.to_string(),
            extensions: format
                .extensions
                .iter()
                .map(|ext| format!("*.{ext}"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// One layer of a repair report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerOutcome {
    /// Layer name from the project.
    pub name: String,
    /// The layer's data source after repair.
    pub source: String,
    /// What happened to the layer; `None` if it was never processed.
    pub outcome: Option<RepairOutcome>,
}

/// Machine-readable result of the `repair` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// The project that was repaired.
    pub project: PathBuf,
    /// Where the repaired project was written, if anywhere.
    pub written: Option<PathBuf>,
    /// `true` if the user chose to continue without the missing layers.
    pub ignore_missing: bool,
    /// `true` if the user aborted the batch.
    pub aborted: bool,
    /// Number of layers never offered for repair.
    pub unprocessed: usize,
    /// One entry per bad layer, in project order.
    pub layers: Vec<LayerOutcome>,
}

impl RepairReport {
    /// Number of layers whose data source was rewritten.
    #[must_use]
    pub fn repaired_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|layer| layer.outcome.as_ref().is_some_and(RepairOutcome::is_repaired))
            .count()
    }
}

/// Pairs each bad layer with its outcome. Layers past the outcomes get `None`.
pub fn layer_outcomes<L: LayerDescription>(
    batch: &[L],
    outcomes: &[RepairOutcome],
) -> Vec<LayerOutcome> {
    batch
        .iter()
        .enumerate()
        .map(|(index, layer)| LayerOutcome {
            name: layer_name(layer),
            source: read_data_source(layer).unwrap_or(UNKNOWN_SOURCE).to_string(),
            outcome: outcomes.get(index).cloned(),
        })
        .collect()
}

/// Display the layers of a project in a formatted table.
pub fn display_layers(rows: Vec<LayerRow>) {
    println!("\nLayers ({} total):\n", rows.len());
    println!("{}", Table::new(rows));
}

/// Display a repair report in a formatted table.
pub fn display_repair_report(report: &RepairReport) {
    if report.aborted {
        println!("Repair aborted; {} was left unchanged.", report.project.display());
        return;
    }

    let rows: Vec<OutcomeRow> = report
        .layers
        .iter()
        .map(|layer| OutcomeRow {
            name: layer.name.clone(),
            outcome: layer
                .outcome
                .as_ref()
                .map_or("Unprocessed", RepairOutcome::label)
                .to_string(),
            detail: match &layer.outcome {
                Some(RepairOutcome::Repaired(path)) => path.clone(),
                Some(RepairOutcome::Unsupported(provider)) => format!("{provider} layer"),
                Some(RepairOutcome::Skipped) | None => String::new(),
            },
        })
        .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }

    println!(
        "\nRepaired {} of {} bad layer(s).",
        report.repaired_count(),
        report.layers.len()
    );
    if report.ignore_missing {
        println!("Continuing without the missing layers.");
    }
    if report.unprocessed > 0 {
        println!("{} layer(s) left unprocessed.", report.unprocessed);
    }
    match &report.written {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!("No layers were repaired; project not written."),
    }
}

/// Display file formats in a formatted table.
pub fn display_formats(formats: &[FileFormat]) {
    println!("\nFile Formats ({} total):\n", formats.len());
    let rows: Vec<FormatRow> = formats.iter().map(FormatRow::from).collect();
    println!("{}", Table::new(rows));
}

fn layer_name<L: LayerDescription + ?Sized>(layer: &L) -> String {
    layer.child_text(LAYER_NAME_FIELD).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfix_core::ProviderKind;
    use layerfix_core::StorageKind;
    use layerfix_core::filters::find_format;
    use layerfix_core_common::{DATASOURCE_FIELD, LayerNode, TYPE_ATTRIBUTE};

    fn node(name: &str, kind: &str, source: &str) -> LayerNode {
        LayerNode::new()
            .with_attribute(TYPE_ATTRIBUTE, kind)
            .with_field(LAYER_NAME_FIELD, name)
            .with_field(DATASOURCE_FIELD, source)
    }

    #[test]
    fn test_layer_row_creation() {
        let row = LayerRow::new(
            &node("parcels", "vector", "dbname='gis' table=parcels"),
            "OK".to_string(),
        );
        assert_eq!(row.name, "parcels");
        assert_eq!(row.kind, "vector");
        assert_eq!(row.provider, "database");
        assert_eq!(row.format, "");
        assert_eq!(row.status, "OK");

        let row = LayerRow::new(
            &node("roads", "vector", "/data/roads.gpkg|layername=roads"),
            "missing".to_string(),
        );
        assert_eq!(row.format, "GPKG");
        assert_eq!(row.source, "/data/roads.gpkg|layername=roads");
    }

    #[test]
    fn test_format_row_creation() {
        let gtiff = find_format("GTiff").unwrap();
        let row = FormatRow::from(&gtiff);
        assert_eq!(row.short_name, "GTiff");
        assert_eq!(row.kind, StorageKind::Raster.to_string());
        assert_eq!(row.extensions, "*.tif *.tiff");
    }

    #[test]
    fn test_layer_outcomes_marks_unprocessed() {
        let batch = vec![
            node("roads", "vector", "/old/roads.shp"),
            node("parcels", "vector", "dbname='gis'"),
            node("dem", "raster", "/old/dem.tif"),
        ];
        let outcomes = [
            RepairOutcome::Repaired("/new/roads.shp".to_string()),
            RepairOutcome::Unsupported(ProviderKind::Database),
        ];

        let layers = layer_outcomes(&batch, &outcomes);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].outcome, Some(outcomes[0].clone()));
        assert_eq!(layers[2].outcome, None);

        let report = RepairReport {
            project: PathBuf::from("city.qgs"),
            written: None,
            ignore_missing: false,
            aborted: false,
            unprocessed: 1,
            layers,
        };
        assert_eq!(report.repaired_count(), 1);
        display_repair_report(&report);
    }

    #[test]
    fn test_report_json_shape() {
        let report = RepairReport {
            project: PathBuf::from("city.qgs"),
            written: Some(PathBuf::from("fixed.qgs")),
            ignore_missing: false,
            aborted: false,
            unprocessed: 0,
            layers: vec![LayerOutcome {
                name: "dem".to_string(),
                source: "/new/dem.tif".to_string(),
                outcome: Some(RepairOutcome::Repaired("/new/dem.tif".to_string())),
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["written"], "fixed.qgs");
        assert_eq!(json["layers"][0]["outcome"]["outcome"], "repaired");
        assert_eq!(json["layers"][0]["outcome"]["detail"], "/new/dem.tif");
    }
}
