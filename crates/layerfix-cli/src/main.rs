//! Command-line interface for `layerfix`, a tool that finds and repairs broken
//! layer references in QGIS projects.
//!
//! This binary provides a CLI around the [`layerfix_core`] repair workflow and the
//! [`layerfix_qgs`] project adapter. It reads a `.qgs` project, determines which
//! layers cannot be opened and, on request, locates replacement files for them.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! Library crates log through the `log` facade, which is bridged into `tracing`. Interactive
//! prompts use `dialoguer`; non-interactive runs answer them from command-line policy and a
//! JSON replacement file.
//!
//! # Available Commands
//!
//! - `layers` - List every layer in a project with its load status
//! - `check` - Report the layers that cannot be opened
//! - `repair` - Locate replacements for the layers that cannot be opened
//! - `formats` - List the file formats offered when locating a layer

mod config;
mod display;
mod interactive;
mod replacements;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use layerfix_core::StorageKind;
use layerfix_core::error::{LayerFixError, WorkflowSignal};
use layerfix_core::filters::{formats_for, get_formats};
use layerfix_core::repair::{BadLayerHandler, RepairWorkflow};
use layerfix_core::report::log_summary;
use layerfix_core::types::LoadContext;
use layerfix_qgs::{ProjectDocument, ProjectLoader};

use crate::config::{Policy, RepairConfig};
use crate::display::{
    LayerRow, RepairReport, display_formats, display_layers, display_repair_report,
    layer_outcomes,
};

#[derive(Parser)]
#[command(
    name = "layerfix",
    version,
    about = "Find and repair broken layer references in QGIS projects",
    long_about = "layerfix checks which layers of a QGIS project point at data that can no longer\n\
                  be opened, and helps you point file-based layers at their new location."
)]
/// Command-line arguments and options for the `layerfix` CLI.
///
/// This struct defines the top-level CLI interface, including global flags for
/// logging verbosity and the subcommand to execute.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `layerfix` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Lists every layer in a project with its kind, provider and load status.
    Layers {
        /// Path to the QGIS project.
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },

    /// Reports the layers of a project that cannot be opened.
    ///
    /// Prints the number of bad layers followed by one line per layer. The
    /// exit status is zero whether or not bad layers were found.
    Check {
        /// Path to the QGIS project.
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Locates replacements for the layers of a project that cannot be opened.
    ///
    /// The project is only written when at least one layer was repaired and
    /// the batch was not aborted.
    Repair {
        /// Path to the QGIS project.
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// How to answer the batch prompt. Defaults to `locate` with
        /// `--replacements` and to `ask` otherwise.
        #[arg(long, value_enum)]
        policy: Option<Policy>,

        /// JSON object mapping original sources or file names to replacement paths.
        #[arg(long, value_name = "FILE")]
        replacements: Option<PathBuf>,

        /// Where to write the repaired project.
        #[arg(short, long, value_name = "PROJECT")]
        output: Option<PathBuf>,

        /// Overwrite the input project.
        #[arg(long)]
        in_place: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Lists the file formats offered when locating a layer.
    Formats {
        /// Only list formats holding this kind of data.
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
}

/// Storage kinds accepted by `formats --kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Raster,
    Vector,
}

impl From<KindArg> for StorageKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Raster => StorageKind::Raster,
            KindArg::Vector => StorageKind::Vector,
        }
    }
}

/// Entry point for the `layerfix` command-line interface.
///
/// This function parses command-line arguments, configures the logging system based on
/// verbosity flags, and dispatches to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    // Logs go to stderr so `--json` output stays parseable.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let result = match cli.command {
        Commands::Layers { project } => {
            info!("Listing layers of {}", project.display());
            handle_layers(&project)
        },
        Commands::Check { project, json } => {
            info!("Checking {}", project.display());
            handle_check(&project, json)
        },
        Commands::Repair {
            project,
            policy,
            replacements,
            output,
            in_place,
            json,
        } => {
            info!("Repairing {}", project.display());
            RepairConfig::new(policy, replacements, output, in_place)
                .map_err(|e| anyhow::Error::from(LayerFixError::from(e)))
                .and_then(|config| handle_repair(&project, &config, json))
        },
        Commands::Formats { kind } => {
            handle_formats(kind);
            Ok(())
        },
    };

    result.map_err(explain)
}

/// Replaces library errors with their user-facing message and recovery hint.
fn explain(err: anyhow::Error) -> anyhow::Error {
    let Some(e) = err.downcast_ref::<LayerFixError>() else {
        return err;
    };
    match e.recovery_suggestion().filter(|_| e.is_recoverable()) {
        Some(hint) => anyhow!("{}\n\nHint: {hint}", e.user_message()),
        None => anyhow!("{}", e.user_message()),
    }
}

fn handle_layers(project: &Path) -> Result<()> {
    let doc = ProjectDocument::read(project)?;
    let loader = ProjectLoader::for_project(project);

    let rows = doc
        .layers()
        .into_iter()
        .map(|layer| {
            let status = match loader.open(layer) {
                Ok(()) => "OK".to_string(),
                Err(e) => e.to_string(),
            };
            LayerRow::new(layer, status)
        })
        .collect();

    display_layers(rows);
    Ok(())
}

fn handle_check(project: &Path, json: bool) -> Result<()> {
    let mut doc = ProjectDocument::read(project)?;
    let loader = ProjectLoader::for_project(project);
    let bad = loader.find_bad_layers(&mut doc);
    let summary = log_summary(&bad);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.count == 0 {
        println!("No bad layers in {}.", project.display());
        return Ok(());
    }

    println!("{summary}");
    let rows = bad
        .iter()
        .map(|layer| {
            let status = loader
                .open(&**layer)
                .err()
                .map_or_else(|| "OK".to_string(), |e| e.to_string());
            LayerRow::new(&**layer, status)
        })
        .collect();
    display_layers(rows);
    Ok(())
}

fn handle_repair(project: &Path, config: &RepairConfig, json: bool) -> Result<()> {
    let mut doc = ProjectDocument::read(project)?;
    let loader = ProjectLoader::for_project(project);
    let picker = config.picker().map_err(LayerFixError::from)?;
    let mut workflow = RepairWorkflow::new(config.prompt(), picker, loader.clone());
    let mut ctx = LoadContext::default();

    let (outcome, layers) = {
        let mut bad = loader.find_bad_layers(&mut doc);
        let outcome = workflow.handle_bad_layers(&mut bad, &mut ctx);
        let layers = layer_outcomes(&bad, outcome.outcomes());
        (outcome, layers)
    };

    let mut report = RepairReport {
        project: project.to_path_buf(),
        written: None,
        ignore_missing: ctx.ignore_missing,
        aborted: outcome.is_cancelled(),
        unprocessed: outcome.unprocessed(),
        layers,
    };

    if !report.aborted && outcome.repaired_count() > 0 {
        let output = config.output_path(project);
        doc.write(&output)?;
        info!("Wrote repaired project to {}", output.display());
        report.written = Some(output);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_repair_report(&report);
    }

    match outcome.signal() {
        Some(signal @ WorkflowSignal::BatchAborted { .. }) => {
            Err(LayerFixError::from(signal).into())
        },
        _ => Ok(()),
    }
}

fn handle_formats(kind: Option<KindArg>) {
    let formats = match kind {
        Some(kind) => formats_for(kind.into()),
        None => get_formats(),
    };
    display_formats(&formats);
}
