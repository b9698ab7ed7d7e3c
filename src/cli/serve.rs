//! Handler for the `serve` command.

use std::sync::Arc;

use tracing::info;

use crate::app::{server, App};
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::Result;

/// Execute the serve command.
pub async fn execute(config: &Config, args: &ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or(config.server.bind);
    let app = Arc::new(App::from_config(config)?);

    info!(%bind, "surebet service starting");
    server::serve(app, bind).await?;
    info!("surebet service stopped");

    Ok(())
}
