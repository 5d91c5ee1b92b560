//! Terminal stand-in for a browser file picker.

use dialoguer::Input;
use gallery_plus_core::{FilePicker, SourceError};
use std::path::PathBuf;

use super::theme::gallery_theme;

/// Prompts for files or a folder on stderr.
///
/// An empty answer, Esc or Ctrl+C cancels the pick.
pub struct PromptPicker;

impl FilePicker for PromptPicker {
    fn pick(&self) -> Result<Vec<PathBuf>, SourceError> {
        let answer = Input::<String>::with_theme(&gallery_theme())
            .with_prompt("Folder or files to open (comma separated)")
            .allow_empty(true)
            .interact_text();

        match answer {
            Ok(raw) => Ok(parse_selection(&raw)),
            Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
                Ok(vec![])
            }
            Err(e) => Err(SourceError::Picker(e.to_string())),
        }
    }
}

/// Split a comma-separated answer into tilde-expanded paths.
fn parse_selection(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| PathBuf::from(shellexpand::tilde(part).into_owned()))
        .collect()
}
