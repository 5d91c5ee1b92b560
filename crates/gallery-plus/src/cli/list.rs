//! The `gallery-plus list` command.

use clap::Args;
use gallery_plus_core::{Config, MediaListOptions, Session};

use super::types::{Filter, MediaKind, Sort};
use super::HostOptions;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Media type to include
    #[arg(long = "type", value_enum, default_value_t)]
    pub kind: MediaKind,

    /// Page size (defaults to `listing.default_limit`)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Zero-based offset into the sorted listing
    #[arg(long, default_value_t = 0)]
    pub start_at: usize,

    /// Longest thumbnail edge in pixels (defaults to `listing.thumbnail_size`)
    #[arg(long)]
    pub thumbnail_size: Option<u32>,

    #[arg(long, value_enum, default_value_t)]
    pub sort: Sort,

    /// Restrict to one subtype
    #[arg(long, value_enum, default_value_t)]
    pub filter: Filter,

    /// Include width, height, orientation and color model
    #[arg(long)]
    pub details: bool,

    /// Include the averaged base color of images
    #[arg(long)]
    pub base_color: bool,

    /// Raw camelCase option bag, e.g. '{"type":"image","limit":20}'; replaces the flags
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,
}

impl ListArgs {
    /// Listing options, falling back to the `[listing]` config defaults.
    pub fn to_options(&self, config: &Config) -> anyhow::Result<MediaListOptions> {
        if let Some(raw) = &self.options {
            return Ok(serde_json::from_str(raw)?);
        }
        let defaults = MediaListOptions::from_config(&config.listing);
        Ok(MediaListOptions {
            media_type: self.kind.into(),
            limit: self.limit.unwrap_or(defaults.limit),
            start_at: self.start_at,
            thumbnail_size: self.thumbnail_size.unwrap_or(defaults.thumbnail_size),
            sort: self.sort.into(),
            include_details: self.details,
            include_base_color: self.base_color,
            filter: self.filter.into(),
        })
    }
}

pub async fn execute(args: ListArgs, config: Config, host: &HostOptions) -> anyhow::Result<()> {
    let options = args.to_options(&config)?;
    let mut writer = super::stdout_writer(&config, host);
    let gallery = super::gallery(config, host);

    let mut session = Session::new();
    let list = gallery.get_media_list(&mut session, &options).await?;
    tracing::info!(
        "Listed {} items (start {}, limit {})",
        list.media.len(),
        options.start_at,
        options.limit
    );

    writer.write_list(&list)?;
    super::finish(writer)
}
