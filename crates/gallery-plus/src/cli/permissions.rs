//! The `gallery-plus permissions` command.

use clap::Args;
use gallery_plus_core::{Config, PermissionResponse};

use super::HostOptions;

#[derive(Args, Debug)]
pub struct PermissionsArgs {
    /// Ask for access instead of only reporting it
    #[arg(long)]
    pub request: bool,
}

pub async fn execute(args: PermissionsArgs, config: Config, host: &HostOptions) -> anyhow::Result<()> {
    let mut writer = super::stdout_writer(&config, host);
    let gallery = super::gallery(config, host);

    let status = if args.request {
        gallery.request_permissions().await
    } else {
        gallery.check_permissions().await
    };
    tracing::info!("{} access: {}", gallery.source().name(), status);

    writer.write(&PermissionResponse { status })?;
    super::finish(writer)
}
