//! Dialoguer theme for the picker prompt.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// `ColorfulTheme` drawn on stderr so stdout stays clean JSON.
///
/// - Prompt prefix: cyan `?`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn gallery_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        hint_style: Style::new().for_stderr().dim(),
        ..ColorfulTheme::default()
    }
}
