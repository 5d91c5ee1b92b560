//! The `gallery-plus get` command.

use clap::Args;
use gallery_plus_core::{Config, MediaListOptions, MediaOptions, Session};

use super::HostOptions;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Item id as printed by `list`
    pub id: String,

    /// Include width, height, orientation and color model
    #[arg(long)]
    pub details: bool,

    /// Include the averaged base color
    #[arg(long)]
    pub base_color: bool,

    /// Materialize a readable file path
    #[arg(long)]
    pub path: bool,
}

impl GetArgs {
    pub fn to_options(&self) -> MediaOptions {
        MediaOptions {
            id: self.id.clone(),
            include_details: self.details,
            include_base_color: self.base_color,
            generate_path: self.path,
        }
    }
}

pub async fn execute(args: GetArgs, config: Config, host: &HostOptions) -> anyhow::Result<()> {
    let mut writer = super::stdout_writer(&config, host);
    let listing = MediaListOptions::from_config(&config.listing);
    let gallery = super::gallery(config, host);

    // Picked files can only be found through the session of a listing.
    let mut session = Session::new();
    if host.pick {
        let list = gallery.get_media_list(&mut session, &listing).await?;
        tracing::debug!("Session holds {} picked items", session.len());
        if list.media.is_empty() {
            tracing::warn!("Nothing was picked");
        }
    }

    let item = gallery.get_media(&session, &args.to_options()).await?;
    writer.write(&item)?;
    super::finish(writer)
}
