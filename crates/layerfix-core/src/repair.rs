//! The bad-layer repair workflow.
//!
//! A project loader hands every layer it failed to open to a [`BadLayerHandler`]
//! exactly once per load attempt. [`RepairWorkflow`] asks a single batch-level
//! question (ignore, locate or abort) and, when asked to locate, walks the batch
//! in order offering a file picker for each file-based layer. A chosen file is
//! written into the layer's data source and the layer is handed back to the
//! loader for a reload.
//!
//! Processing is strictly sequential. The only suspension points are the batch
//! prompt and the file picker, both of which block until their collaborator
//! returns.
//!
//! # Examples
//!
//! ```
//! use layerfix_core::LayerNode;
//! use layerfix_core::error::LoadError;
//! use layerfix_core::repair::{
//!     BadLayerHandler, FilePicker, FixedChoice, LayerReloader, RepairWorkflow,
//! };
//! use layerfix_core::types::{BatchChoice, LoadContext, PickRequest, PickResult, RepairOutcome};
//!
//! struct Moved;
//!
//! impl FilePicker for Moved {
//!     fn pick_file(&mut self, request: &PickRequest) -> PickResult {
//!         PickResult::Selected(format!("/archive/{}", request.seed_filename))
//!     }
//! }
//!
//! struct Reload;
//!
//! impl LayerReloader<LayerNode> for Reload {
//!     fn reload_layer(&mut self, _layer: &LayerNode) -> Result<(), LoadError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut batch = vec![
//!     LayerNode::new()
//!         .with_attribute("type", "raster")
//!         .with_field("datasource", "/data/dem.tif"),
//! ];
//! let mut ctx = LoadContext::default();
//! let mut workflow = RepairWorkflow::new(FixedChoice(BatchChoice::Locate), Moved, Reload);
//!
//! let outcome = workflow.handle_bad_layers(&mut batch, &mut ctx);
//! assert_eq!(
//!     outcome.outcomes(),
//!     [RepairOutcome::Repaired("/archive/dem.tif".to_string())]
//! );
//! ```

use layerfix_core_common::{LayerDescription, StorageKind};
use log::{debug, info, warn};

use crate::classify::{classify_provider, classify_storage};
use crate::datasource::{read_data_source, write_data_source};
use crate::error::LoadError;
use crate::filters::{FILTER_SEPARATOR, file_filter};
use crate::report::{BadLayerSummary, log_summary};
use crate::types::{
    BatchChoice, BatchOutcome, LoadContext, PickRequest, PickResult, RepairOutcome,
};
use crate::utils::DataSourceExt;

/// Key under which pickers remember the last directory used for vector files.
pub const VECTOR_REMEMBER_KEY: &str = "lastVectorFileFilter";

/// Key under which pickers remember the last directory used for raster files.
pub const RASTER_REMEMBER_KEY: &str = "lastRasterFileFilter";

/// Explanation shown above the batch summary when asking how to proceed.
pub const BATCH_PROMPT_MESSAGE: &str = "Unable to open one or more project layers.\n\
     Choose ignore to continue loading without the missing layers. \
     Choose abort to return to your pre-project load state. \
     Choose locate to try to find the missing layers.";

/// Asks, once per batch, how to deal with the bad layers.
pub trait BatchPrompt {
    /// Presents `summary_text` and returns the chosen action.
    fn ask_batch_choice(&mut self, summary_text: &str) -> BatchChoice;
}

/// Answers the batch prompt without asking anyone.
///
/// Non-interactive callers use this with the choice their policy dictates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedChoice(pub BatchChoice);

impl BatchPrompt for FixedChoice {
    fn ask_batch_choice(&mut self, _summary_text: &str) -> BatchChoice {
        self.0
    }
}

impl<T: BatchPrompt + ?Sized> BatchPrompt for Box<T> {
    fn ask_batch_choice(&mut self, summary_text: &str) -> BatchChoice {
        (**self).ask_batch_choice(summary_text)
    }
}

/// Locates a replacement file for one layer.
pub trait FilePicker {
    /// Shows the request to whoever picks files and returns their answer.
    fn pick_file(&mut self, request: &PickRequest) -> PickResult;
}

impl<T: FilePicker + ?Sized> FilePicker for Box<T> {
    fn pick_file(&mut self, request: &PickRequest) -> PickResult {
        (**self).pick_file(request)
    }
}

/// The project loader's single-layer reload entry point.
pub trait LayerReloader<L: ?Sized> {
    /// Tries to open the layer again after its data source was rewritten.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the layer still cannot be opened.
    fn reload_layer(&mut self, layer: &L) -> Result<(), LoadError>;
}

/// Entry point the project loader calls with the layers it could not open.
pub trait BadLayerHandler<L: LayerDescription> {
    /// Handles one batch of bad layers. Called once per failed load attempt.
    fn handle_bad_layers(&mut self, batch: &mut [L], ctx: &mut LoadContext) -> BatchOutcome;
}

/// Handler that only logs the bad layers and skips all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DismissingHandler;

impl<L: LayerDescription> BadLayerHandler<L> for DismissingHandler {
    fn handle_bad_layers(&mut self, batch: &mut [L], _ctx: &mut LoadContext) -> BatchOutcome {
        log_summary(batch);
        info!("{} bad layers dismissed", batch.len());
        BatchOutcome::Done {
            outcomes: vec![RepairOutcome::Skipped; batch.len()],
            stopped_early: false,
            batch_len: batch.len(),
        }
    }
}

/// Builds the picker request for a layer.
///
/// Returns `None` when the layer's storage kind is bogus, since there is no
/// sensible filter to offer.
///
/// # Examples
///
/// ```
/// use layerfix_core::LayerNode;
/// use layerfix_core::repair::{VECTOR_REMEMBER_KEY, pick_request};
///
/// let layer = LayerNode::new()
///     .with_attribute("type", "vector")
///     .with_field("datasource", "/data/roads.gpkg|layername=roads");
///
/// let request = pick_request(&layer).unwrap();
/// assert_eq!(request.seed_filename, "roads.gpkg");
/// assert_eq!(request.remember_key, VECTOR_REMEMBER_KEY);
/// assert!(request.filter.starts_with("roads.gpkg;;"));
/// assert_eq!(
///     request.title,
///     "Where is 'roads.gpkg' (original location: /data/roads.gpkg)?"
/// );
/// ```
#[must_use]
pub fn pick_request<L: LayerDescription + ?Sized>(layer: &L) -> Option<PickRequest> {
    let kind = classify_storage(layer);
    let remember_key = match kind {
        StorageKind::Vector => VECTOR_REMEMBER_KEY,
        StorageKind::Raster => RASTER_REMEMBER_KEY,
        StorageKind::Bogus => {
            debug!("unable to determine data type");
            return None;
        },
    };

    let original = read_data_source(layer).unwrap_or_default();
    let seed_filename = original.file_name_hint();
    let formats = file_filter(kind);
    let filter = if seed_filename.is_empty() {
        formats
    } else {
        format!("{seed_filename}{FILTER_SEPARATOR}{formats}")
    };
    let title = format!(
        "Where is '{seed_filename}' (original location: {})?",
        original.absolute_file_path().display()
    );

    Some(PickRequest {
        filter,
        seed_filename,
        title,
        remember_key,
        original_source: original.to_string(),
    })
}

/// Text handed to the batch prompt: the explanation followed by the summary.
#[must_use]
pub fn batch_prompt_text(summary: &BadLayerSummary) -> String {
    format!("{BATCH_PROMPT_MESSAGE}\n\n{summary}")
}

/// Result of handling one layer inside the locate loop.
struct LayerStep {
    outcome: RepairOutcome,
    cancel_all: bool,
}

impl LayerStep {
    fn done(outcome: RepairOutcome) -> Self {
        Self {
            outcome,
            cancel_all: false,
        }
    }
}

/// Interactive or programmatic repair of a batch of bad layers.
///
/// The workflow holds no state across invocations; the only per-attempt state
/// lives in the caller's [`LoadContext`].
#[derive(Debug)]
pub struct RepairWorkflow<P, F, R> {
    prompt: P,
    picker: F,
    reloader: R,
}

impl<P, F, R> RepairWorkflow<P, F, R>
where
    P: BatchPrompt,
    F: FilePicker,
{
    /// Creates a workflow from its three collaborators.
    pub fn new(prompt: P, picker: F, reloader: R) -> Self {
        Self {
            prompt,
            picker,
            reloader,
        }
    }

    /// The batch prompt collaborator.
    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// The file picker collaborator.
    pub fn picker(&self) -> &F {
        &self.picker
    }

    /// The reload collaborator.
    pub fn reloader(&self) -> &R {
        &self.reloader
    }

    /// Walks the batch in order until it ends or the picker cancels the rest.
    fn locate_layers<L>(&mut self, batch: &mut [L]) -> BatchOutcome
    where
        L: LayerDescription,
        R: LayerReloader<L>,
    {
        let batch_len = batch.len();
        let mut outcomes = Vec::with_capacity(batch_len);
        let mut stopped_early = false;

        for layer in batch.iter_mut() {
            let step = self.find_layer(layer);
            outcomes.push(step.outcome);
            if step.cancel_all {
                stopped_early = outcomes.len() < batch_len;
                info!(
                    "search cancelled, {} layer(s) left unprocessed",
                    batch_len - outcomes.len()
                );
                break;
            }
        }

        BatchOutcome::Done {
            outcomes,
            stopped_early,
            batch_len,
        }
    }

    fn find_layer<L>(&mut self, layer: &mut L) -> LayerStep
    where
        L: LayerDescription,
        R: LayerReloader<L>,
    {
        let provider = classify_provider(layer);
        if !provider.is_file_based() {
            debug!("layer is {provider} based, no repair offered");
            return LayerStep::done(RepairOutcome::Unsupported(provider));
        }

        debug!("layer is file based");
        let Some(request) = pick_request(layer) else {
            return LayerStep::done(RepairOutcome::Skipped);
        };

        match self.picker.pick_file(&request) {
            PickResult::CancelAll => LayerStep {
                outcome: RepairOutcome::Skipped,
                cancel_all: true,
            },
            PickResult::None => LayerStep::done(RepairOutcome::Skipped),
            PickResult::Selected(path) if path.is_empty() => {
                LayerStep::done(RepairOutcome::Skipped)
            },
            PickResult::Selected(path) => LayerStep::done(self.apply_replacement(layer, path)),
        }
    }

    fn apply_replacement<L>(&mut self, layer: &mut L, path: String) -> RepairOutcome
    where
        L: LayerDescription,
        R: LayerReloader<L>,
    {
        if let Err(err) = write_data_source(layer, &path) {
            warn!("cannot point layer at '{path}': {err}");
            return RepairOutcome::Skipped;
        }

        // A failed reload is the loader's to report; the reference was still rewritten.
        if let Err(err) = self.reloader.reload_layer(layer) {
            warn!("unable to re-read layer from '{path}': {err}");
        }

        RepairOutcome::Repaired(path)
    }
}

impl<L, P, F, R> BadLayerHandler<L> for RepairWorkflow<P, F, R>
where
    L: LayerDescription,
    P: BatchPrompt,
    F: FilePicker,
    R: LayerReloader<L>,
{
    fn handle_bad_layers(&mut self, batch: &mut [L], ctx: &mut LoadContext) -> BatchOutcome {
        ctx.ignore_missing = false;
        let batch_len = batch.len();
        debug!("{batch_len} bad layers found");

        let summary = log_summary(batch);
        if batch.is_empty() {
            return BatchOutcome::Done {
                outcomes: Vec::new(),
                stopped_early: false,
                batch_len,
            };
        }

        match self.prompt.ask_batch_choice(&batch_prompt_text(&summary)) {
            BatchChoice::Abort => {
                info!("repair of {batch_len} bad layers aborted");
                BatchOutcome::CancelledAll { batch_len }
            },
            BatchChoice::Ignore => {
                info!("ignoring {batch_len} missing layers");
                ctx.ignore_missing = true;
                BatchOutcome::Done {
                    outcomes: vec![RepairOutcome::Skipped; batch_len],
                    stopped_early: false,
                    batch_len,
                }
            },
            BatchChoice::Locate => {
                debug!("want to find missing layers is true");
                self.locate_layers(batch)
            },
        }
    }
}
