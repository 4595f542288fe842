//! Interactive prompts for the `repair` command.
//!
//! Uses dialoguer for terminal-based selection and path entry. A prompt that
//! cannot be shown (no terminal, interrupted input) is treated as the most
//! conservative answer: abort for the batch prompt, cancel-all for the picker.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dialoguer::{Input, Select};
use layerfix_core::filters::FILTER_SEPARATOR;
use layerfix_core::repair::{BatchPrompt, FilePicker};
use layerfix_core::types::{BatchChoice, PickRequest, PickResult};
use layerfix_core::utils::DataSourceExt;
use tracing::{debug, warn};

/// Batch choices in the order they are offered.
const CHOICES: [BatchChoice; 3] = [BatchChoice::Locate, BatchChoice::Ignore, BatchChoice::Abort];

/// Per-layer actions in the order they are offered.
const LAYER_ACTIONS: [&str; 3] = [
    "Enter the new location",
    "Skip this layer",
    "Skip all remaining layers",
];

/// Asks the batch question in the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl BatchPrompt for TerminalPrompt {
    fn ask_batch_choice(&mut self, summary_text: &str) -> BatchChoice {
        eprintln!("\n{summary_text}\n");
        let labels: Vec<&str> = CHOICES.iter().map(BatchChoice::as_str).collect();

        match Select::new()
            .with_prompt("How do you want to proceed?")
            .items(&labels)
            .default(0)
            .interact()
        {
            Ok(index) => CHOICES.get(index).copied().unwrap_or(BatchChoice::Abort),
            Err(e) => {
                warn!("Cannot prompt for a choice ({e}), aborting");
                BatchChoice::Abort
            },
        }
    }
}

/// Asks for replacement files in the terminal.
///
/// The last directory chosen is remembered per remember key for the life of
/// the picker and pre-filled together with the missing file's name.
#[derive(Debug, Clone, Default)]
pub struct TerminalPicker {
    last_dirs: HashMap<&'static str, PathBuf>,
}

impl TerminalPicker {
    /// The path pre-filled for a request.
    #[must_use]
    pub fn initial_path(&self, request: &PickRequest) -> String {
        match self.last_dirs.get(request.remember_key) {
            Some(dir) => dir.join(&request.seed_filename).to_string_lossy().into_owned(),
            None => request.seed_filename.clone(),
        }
    }

    /// Records the directory of a chosen file under the request's remember key.
    pub fn remember(&mut self, request: &PickRequest, chosen: &str) {
        if let Some(dir) = Path::new(chosen)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            self.last_dirs.insert(request.remember_key, dir.to_path_buf());
        }
    }

    /// The path returned for a typed entry, made absolute against the current
    /// directory. `None` for an empty entry.
    #[must_use]
    pub fn chosen_path(input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Some(input.absolute_file_path().to_string_lossy().into_owned())
    }

    fn ask_path(initial: String) -> dialoguer::Result<String> {
        Input::<String>::new()
            .with_prompt("Path (empty to skip)")
            .with_initial_text(initial)
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                let input = input.trim();
                if input.is_empty() || Path::new(input).is_file() {
                    Ok(())
                } else {
                    Err(format!("{input} is not a file"))
                }
            })
            .interact_text()
    }
}

impl FilePicker for TerminalPicker {
    fn pick_file(&mut self, request: &PickRequest) -> PickResult {
        eprintln!("\n{}", request.title);
        for entry in request.filter.split(FILTER_SEPARATOR) {
            debug!("filter: {entry}");
        }

        let action = Select::new()
            .with_prompt("Locate layer")
            .items(&LAYER_ACTIONS)
            .default(0)
            .interact();
        match action {
            Ok(0) => {},
            Ok(1) => return PickResult::None,
            Ok(_) => return PickResult::CancelAll,
            Err(e) => {
                warn!("Cannot prompt for a file ({e}), skipping remaining layers");
                return PickResult::CancelAll;
            },
        }

        let entry = Self::ask_path(self.initial_path(request));
        match entry.map(|input| Self::chosen_path(&input)) {
            Ok(None) => PickResult::None,
            Ok(Some(path)) => {
                self.remember(request, &path);
                PickResult::Selected(path)
            },
            Err(e) => {
                warn!("Cannot read a path ({e}), skipping remaining layers");
                PickResult::CancelAll
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfix_core::repair::{RASTER_REMEMBER_KEY, VECTOR_REMEMBER_KEY};

    fn request(seed: &str, key: &'static str) -> PickRequest {
        PickRequest {
            filter: String::new(),
            seed_filename: seed.to_string(),
            title: String::new(),
            remember_key: key,
            original_source: String::new(),
        }
    }

    #[test]
    fn test_available_choices() {
        assert_eq!(CHOICES.len(), 3);
        assert_eq!(CHOICES[0], BatchChoice::Locate);
        assert_eq!(LAYER_ACTIONS.len(), 3);
    }

    #[test]
    fn test_initial_path_uses_remembered_dir_per_key() {
        let mut picker = TerminalPicker::default();
        let roads = request("roads.shp", VECTOR_REMEMBER_KEY);
        assert_eq!(picker.initial_path(&roads), "roads.shp");

        picker.remember(&roads, "/mnt/archive/vectors/roads.shp");
        let rivers = request("rivers.shp", VECTOR_REMEMBER_KEY);
        assert_eq!(
            picker.initial_path(&rivers),
            Path::new("/mnt/archive/vectors/rivers.shp").to_string_lossy()
        );

        let dem = request("dem.tif", RASTER_REMEMBER_KEY);
        assert_eq!(picker.initial_path(&dem), "dem.tif");
    }

    #[test]
    fn test_chosen_path_is_absolute() {
        assert_eq!(TerminalPicker::chosen_path(""), None);
        assert_eq!(TerminalPicker::chosen_path("   "), None);

        let cwd = std::env::current_dir().unwrap();
        let chosen = TerminalPicker::chosen_path(" maps/dem.tif ").unwrap();
        assert!(Path::new(&chosen).is_absolute());
        assert_eq!(Path::new(&chosen), cwd.join("maps/dem.tif"));

        let absolute = cwd.join("roads.shp");
        let chosen = TerminalPicker::chosen_path(&absolute.to_string_lossy()).unwrap();
        assert_eq!(Path::new(&chosen), absolute);
    }

    #[test]
    fn test_relative_entry_remembers_its_directory() {
        let mut picker = TerminalPicker::default();
        let dem = request("dem.tif", RASTER_REMEMBER_KEY);
        let chosen = TerminalPicker::chosen_path("maps/dem.tif").unwrap();
        picker.remember(&dem, &chosen);

        let slope = request("slope.tif", RASTER_REMEMBER_KEY);
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(Path::new(&picker.initial_path(&slope)), cwd.join("maps/slope.tif"));
    }

    #[test]
    fn test_bare_file_name_is_not_remembered() {
        let mut picker = TerminalPicker::default();
        let roads = request("roads.shp", VECTOR_REMEMBER_KEY);
        picker.remember(&roads, "roads.shp");
        assert!(picker.last_dirs.is_empty());
    }
}
