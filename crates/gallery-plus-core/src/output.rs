//! JSON and JSON Lines output of media records.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::MediaList;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes responses to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write one response object (an item, a permission status).
    pub fn write<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write a listing.
    ///
    /// JSON keeps the `{"media":[...]}` envelope; JSON Lines drops it and
    /// writes one item per line.
    pub fn write_list(&mut self, list: &MediaList) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write(list)?;
                // Count items, not the envelope
                self.items_written = self.items_written - 1 + list.media.len();
            }
            OutputFormat::JsonLines => {
                for item in &list.media {
                    self.write(item)?;
                }
            }
        }
        Ok(())
    }

    /// Number of records written so far.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
