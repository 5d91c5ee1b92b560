//! Command handlers and the shared host setup they use.

pub mod config;
pub mod get;
pub mod list;
pub mod permissions;
pub mod picker;
pub mod theme;
pub mod types;

use gallery_plus_core::{Config, Gallery, LibrarySource, OutputFormat, OutputWriter, PickerSource};
use std::io::{Stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Global flags that pick the source and shape the output.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub library: Option<PathBuf>,
    pub pick: bool,
    pub jsonl: bool,
    pub pretty: bool,
}

/// Gallery over the picker or the library, per `--pick` and `--library`.
pub fn gallery(mut config: Config, host: &HostOptions) -> Gallery {
    if host.pick {
        let source = PickerSource::new(Arc::new(picker::PromptPicker));
        return Gallery::new(config, Box::new(source));
    }
    if let Some(root) = &host.library {
        config.library.root = root.clone();
    }
    let source = LibrarySource::from_config(&config);
    tracing::debug!("Library root: {:?}", source.root());
    Gallery::new(config, Box::new(source))
}

/// Output format from `[output]`, overridden by `--jsonl` and `--pretty`.
pub fn output_format(config: &Config, host: &HostOptions) -> (OutputFormat, bool) {
    let format = if host.jsonl {
        OutputFormat::JsonLines
    } else {
        OutputFormat::parse(&config.output.format).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown output format {:?}, using json",
                config.output.format
            );
            OutputFormat::Json
        })
    };
    (format, host.pretty || config.output.pretty)
}

/// Writer over stdout.
pub fn stdout_writer(config: &Config, host: &HostOptions) -> OutputWriter<Stdout> {
    let (format, pretty) = output_format(config, host);
    OutputWriter::new(std::io::stdout(), format, pretty)
}

/// Flush and report how many records went out.
pub fn finish<W: Write>(mut writer: OutputWriter<W>) -> anyhow::Result<()> {
    writer.flush()?;
    tracing::debug!("Wrote {} records", writer.items_written());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_overrides() {
        let mut config = Config::default();
        let host = HostOptions::default();
        assert_eq!(output_format(&config, &host), (OutputFormat::Json, false));

        config.output.format = "jsonl".into();
        assert_eq!(output_format(&config, &host).0, OutputFormat::JsonLines);

        config.output.format = "json".into();
        let host = HostOptions {
            jsonl: true,
            pretty: true,
            ..HostOptions::default()
        };
        assert_eq!(output_format(&config, &host), (OutputFormat::JsonLines, true));
    }

    #[test]
    fn test_library_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let host = HostOptions {
            library: Some(dir.path().to_path_buf()),
            ..HostOptions::default()
        };
        let gallery = gallery(Config::default(), &host);
        assert_eq!(gallery.config().library.root, dir.path());
        assert_eq!(gallery.source().name(), "library");

        let picking = HostOptions {
            pick: true,
            ..HostOptions::default()
        };
        assert_eq!(gallery_for(&picking), "picker");
    }

    fn gallery_for(host: &HostOptions) -> String {
        gallery(Config::default(), host).source().name().to_string()
    }
}
