//! Validated options for the `repair` command.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use layerfix_core::error::ConfigError;
use layerfix_core::repair::{BatchPrompt, FilePicker, FixedChoice};
use layerfix_core::types::{BatchChoice, NonInteractivePolicy};

use crate::interactive::{TerminalPicker, TerminalPrompt};
use crate::replacements::ReplacementMap;

/// How the batch prompt is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Ask in the terminal.
    Ask,
    /// Continue without the missing layers.
    Ignore,
    /// Search for every missing layer.
    Locate,
    /// Leave the project untouched and fail.
    Abort,
}

impl Policy {
    /// Returns the value as written on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Ask => "ask",
            Policy::Ignore => "ignore",
            Policy::Locate => "locate",
            Policy::Abort => "abort",
        }
    }
}

/// Where the repaired project is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Overwrite the input project.
    InPlace,
    /// Write to a separate file.
    File(PathBuf),
}

/// Options for one `repair` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairConfig {
    /// How the batch prompt is answered.
    pub policy: Policy,
    /// JSON file answering picker requests instead of the terminal.
    pub replacements: Option<PathBuf>,
    /// Where the repaired project goes.
    pub destination: Destination,
}

impl RepairConfig {
    /// Validates the raw command-line options.
    ///
    /// Without an explicit policy, a replacement file implies `locate` and
    /// anything else implies `ask`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the destination is missing or ambiguous,
    /// or when a replacement file is combined with a policy that never locates.
    pub fn new(
        policy: Option<Policy>,
        replacements: Option<PathBuf>,
        output: Option<PathBuf>,
        in_place: bool,
    ) -> Result<Self, ConfigError> {
        let destination = match (output, in_place) {
            (Some(_), true) => {
                return Err(ConfigError::ConflictingOptions {
                    options: "--output and --in-place".to_string(),
                });
            },
            (Some(path), false) => Destination::File(path),
            (None, true) => Destination::InPlace,
            (None, false) => {
                return Err(ConfigError::InvalidOption {
                    option: "output".to_string(),
                    message: "pass --output <PATH> or --in-place".to_string(),
                });
            },
        };

        let policy = policy.unwrap_or(if replacements.is_some() {
            Policy::Locate
        } else {
            Policy::Ask
        });

        if replacements.is_some() && matches!(policy, Policy::Ignore | Policy::Abort) {
            return Err(ConfigError::ConflictingOptions {
                options: format!("--replacements and --policy {}", policy.as_str()),
            });
        }

        Ok(Self {
            policy,
            replacements,
            destination,
        })
    }

    /// The batch prompt for this run.
    #[must_use]
    pub fn prompt(&self) -> Box<dyn BatchPrompt> {
        match self.policy {
            Policy::Ask => Box::new(TerminalPrompt),
            Policy::Ignore => Box::new(FixedChoice(NonInteractivePolicy::SkipAll.into())),
            Policy::Locate => Box::new(FixedChoice(BatchChoice::Locate)),
            Policy::Abort => Box::new(FixedChoice(NonInteractivePolicy::FailAll.into())),
        }
    }

    /// The file picker for this run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Replacements`] if the replacement file cannot be loaded.
    pub fn picker(&self) -> Result<Box<dyn FilePicker>, ConfigError> {
        let picker: Box<dyn FilePicker> = match &self.replacements {
            Some(path) => Box::new(ReplacementMap::load(path)?),
            None => Box::new(TerminalPicker::default()),
        };
        Ok(picker)
    }

    /// The file the repaired project is written to.
    #[must_use]
    pub fn output_path(&self, project: &Path) -> PathBuf {
        match &self.destination {
            Destination::InPlace => project.to_path_buf(),
            Destination::File(path) => path.clone(),
        }
    }
}
